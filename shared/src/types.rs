//! Common identifier types
//!
//! Identifiers are opaque strings assigned by the definition service.
//! Slugs are the stable identity of attributes and options; ids may be
//! reassigned between two AST fetches.

/// Category (rubric) id
pub type CategoryId = String;

/// Attribute group id
pub type GroupId = String;

/// Attribute id (not stable across AST regeneration)
pub type AttributeId = String;

/// Stable slug of an attribute or option
pub type Slug = String;
