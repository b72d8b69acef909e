//! Attribute schema reconciliation engine
//!
//! Keeps a product's attribute values consistent with the attribute
//! definitions implied by its category selection:
//!
//! - [`resolver`]: attribute variant to widget shape
//! - [`reconciler`]: value state against a freshly resolved AST
//! - [`validation`]: value state checks against an AST
//! - [`service`]: AST source seam and an in-memory catalogue source
//! - [`controller`]: selection-change cycles, edits, submit/load

pub mod controller;
pub mod error;
pub mod reconciler;
pub mod resolver;
pub mod service;
pub mod validation;

pub use controller::{
    ApplyOutcome, AttributeFormController, FetchCompletion, FormConfig, FormPhase, OrphanPolicy,
    PendingFetch, SelectionVersion,
};
pub use error::{EditError, FetchError};
pub use reconciler::{ReconcileStats, Reconciliation, ResetPolicy, reconcile, reconcile_with_stats};
pub use resolver::{
    ChoiceOption, DefinitionIntegrity, ValueArity, ValueRejection, WidgetKind, WidgetSpec, resolve,
};
pub use service::{AttributeDefinitionService, CatalogDefinitionService};
pub use validation::{Violation, ViolationKind, validate};
