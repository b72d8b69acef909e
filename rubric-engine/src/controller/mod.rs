//! AttributeFormController - selection changes, reconciliation and submit
//!
//! Owns the category selection, the current AST and the product's attribute
//! values. Each selection change is one explicit cycle:
//!
//! ```text
//! begin_selection_change(ids)      -> PendingFetch (version bumped)
//!     PendingFetch::run(&service)  -> FetchCompletion
//! complete(completion)
//!     ├─ stale version             -> Discarded (no state change)
//!     ├─ fetch error               -> Failed (values untouched)
//!     └─ AST                       -> reconcile, Applied
//! ```
//!
//! The version guard makes ordering depend on when a selection was made,
//! never on when its response arrives.

mod edit;
mod phase;
mod submit;

pub use phase::*;

use crate::error::FetchError;
use crate::reconciler::{ResetPolicy, reconcile_with_stats};
use crate::resolver::{WidgetSpec, resolve};
use crate::service::AttributeDefinitionService;
use serde::{Deserialize, Serialize};
use shared::models::{AttributeAst, AttributeValues};
use shared::types::{CategoryId, GroupId};
use std::collections::BTreeSet;

#[cfg(test)]
mod tests;

/// Which groups `submit()` emits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Only groups of the last applied AST; everything held until one is applied
    #[default]
    PruneOnSubmit,
    /// Every group held, including those of deselected categories
    Retain,
}

/// Controller behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub reset_policy: ResetPolicy,
    pub orphan_policy: OrphanPolicy,
}

impl FormConfig {
    pub fn with_reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }
}

/// Attribute form state of one product
pub struct AttributeFormController<S> {
    service: S,
    config: FormConfig,
    selection: BTreeSet<CategoryId>,
    version: SelectionVersion,
    phase: FormPhase,
    applied: Option<SelectionVersion>,
    ast: AttributeAst,
    values: AttributeValues,
}

impl<S> std::fmt::Debug for AttributeFormController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeFormController")
            .field("service", &"<AttributeDefinitionService>")
            .field("config", &self.config)
            .field("selection", &self.selection)
            .field("version", &self.version)
            .field("phase", &self.phase)
            .field("applied", &self.applied)
            .field("groups", &self.values.len())
            .finish()
    }
}

impl<S: AttributeDefinitionService> AttributeFormController<S> {
    /// Controller over existing values, with nothing selected yet
    pub fn new(service: S, config: FormConfig, values: AttributeValues) -> Self {
        Self {
            service,
            config,
            selection: BTreeSet::new(),
            version: SelectionVersion::default(),
            phase: FormPhase::Idle,
            applied: None,
            ast: AttributeAst::default(),
            values,
        }
    }

    // ==================== Accessors ====================

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn selection(&self) -> &BTreeSet<CategoryId> {
        &self.selection
    }

    /// Version of the latest selection change
    pub fn version(&self) -> SelectionVersion {
        self.version
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    /// Version of the last cycle whose AST was applied
    pub fn applied_version(&self) -> Option<SelectionVersion> {
        self.applied
    }

    /// AST of the last applied cycle
    pub fn ast(&self) -> &AttributeAst {
        &self.ast
    }

    pub fn values(&self) -> &AttributeValues {
        &self.values
    }

    /// Error of the current cycle, if its fetch failed
    pub fn last_error(&self) -> Option<&FetchError> {
        self.phase.error()
    }

    /// Widget for every AST attribute, in AST order, with its group id
    pub fn widgets(&self) -> Vec<(GroupId, WidgetSpec)> {
        self.ast
            .attributes()
            .map(|(group, attr)| (group.id.clone(), resolve(attr)))
            .collect()
    }

    // ==================== Selection cycle ====================

    /// Replace the selection and issue a fetch for it
    pub fn begin_selection_change<I, T>(&mut self, ids: I) -> PendingFetch
    where
        I: IntoIterator<Item = T>,
        T: Into<CategoryId>,
    {
        self.selection = ids.into_iter().map(Into::into).collect();
        self.issue_fetch()
    }

    /// Add or remove one category and issue a fetch for the new selection
    pub fn toggle_category(&mut self, id: impl Into<CategoryId>) -> PendingFetch {
        let id = id.into();
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
        self.issue_fetch()
    }

    /// Issue a new fetch for the unchanged selection
    pub fn begin_refresh(&mut self) -> PendingFetch {
        self.issue_fetch()
    }

    fn issue_fetch(&mut self) -> PendingFetch {
        self.version = self.version.next();
        self.phase = FormPhase::Fetching {
            version: self.version,
        };
        PendingFetch {
            version: self.version,
            selection: self.selection.clone(),
        }
    }

    /// Apply a finished fetch if it belongs to the current cycle
    pub fn complete(&mut self, completion: FetchCompletion) -> ApplyOutcome {
        let current = matches!(
            self.phase,
            FormPhase::Fetching { version } if version == completion.version
        );
        if !current {
            tracing::debug!(
                response_version = %completion.version,
                current_version = %self.version,
                "Discarding superseded attribute AST response"
            );
            return ApplyOutcome::Discarded;
        }

        let version = completion.version;
        match completion.result {
            Ok(ast) => {
                for (group, attr) in ast.attributes().filter(|(_, a)| a.is_missing_options()) {
                    tracing::warn!(
                        group_id = %group.id,
                        attribute_slug = %attr.slug,
                        variant = ?attr.variant,
                        "Choice attribute has no options group"
                    );
                }

                let result = reconcile_with_stats(&ast, &self.values, self.config.reset_policy);
                self.values = result.values;
                self.ast = ast;
                self.applied = Some(version);
                self.phase = FormPhase::Reconciled { version };

                tracing::info!(
                    version = %version,
                    categories = self.selection.len(),
                    groups = self.ast.groups.len(),
                    attributes = self.ast.attribute_count(),
                    "Attribute selection applied"
                );
                ApplyOutcome::Applied(result.stats)
            }
            Err(error) => {
                tracing::warn!(
                    version = %version,
                    error = %error,
                    category = error.category().name(),
                    retryable = error.is_retryable(),
                    "Attribute AST fetch failed, keeping current values"
                );
                self.phase = FormPhase::FetchFailed {
                    version,
                    error: error.clone(),
                };
                ApplyOutcome::Failed(error)
            }
        }
    }

    /// Replace the selection and run the whole cycle
    pub async fn select_categories<I, T>(&mut self, ids: I) -> ApplyOutcome
    where
        I: IntoIterator<Item = T>,
        T: Into<CategoryId>,
    {
        let pending = self.begin_selection_change(ids);
        let completion = pending.run(&self.service).await;
        self.complete(completion)
    }

    /// Re-fetch the AST for the current selection
    pub async fn refresh(&mut self) -> ApplyOutcome {
        let pending = self.begin_refresh();
        let completion = pending.run(&self.service).await;
        self.complete(completion)
    }

    /// Re-fetch after a failed cycle; `None` if the current cycle did not fail
    pub async fn retry(&mut self) -> Option<ApplyOutcome> {
        if self.last_error().is_none() {
            return None;
        }
        Some(self.refresh().await)
    }
}
