//! Shared types for the rubric catalog tooling
//!
//! Data model for category-driven product attributes, the wire shape used
//! by the persistence target, and the unified error types used across the
//! engine and the definition-service client.

pub mod error;
pub mod models;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use types::{AttributeId, CategoryId, GroupId, Slug};
