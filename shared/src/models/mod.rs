//! Data models
//!
//! Definitions (categories, attribute groups, attributes) as supplied by the
//! definition service, the in-memory product attribute value state, and the
//! variant-agnostic wire shape used at load/submit boundaries.

pub mod attribute;
pub mod category;
pub mod product;
pub mod wire;

// Re-exports
pub use attribute::*;
pub use category::*;
pub use product::*;
pub use wire::*;
