//! Submit and load at the persistence boundary

use super::{AttributeFormController, OrphanPolicy};
use crate::reconciler::{ReconcileStats, reconcile_with_stats};
use crate::service::AttributeDefinitionService;
use shared::models::{AttributeSubmission, AttributeValues, WireError};

impl<S: AttributeDefinitionService> AttributeFormController<S> {
    /// Serialize the value state to the wire shape
    ///
    /// Never blocked by fetch state: a form whose AST failed to load still
    /// submits whatever it holds. Pruning needs an applied AST to tell
    /// orphans apart, so before the first applied cycle every group is kept.
    pub fn submit(&self) -> AttributeSubmission {
        let prune = self.config.orphan_policy == OrphanPolicy::PruneOnSubmit
            && self.applied.is_some();
        let submission = if prune {
            AttributeSubmission::from_groups(
                self.values
                    .groups()
                    .filter(|g| self.ast.contains_group(&g.group_id)),
            )
        } else {
            AttributeSubmission::from_groups(self.values.groups())
        };

        tracing::debug!(
            groups = submission.groups.len(),
            attributes = submission.attributes.len(),
            policy = ?self.config.orphan_policy,
            pruned = prune,
            "Serialized attribute values"
        );
        submission
    }

    /// Replace the value state with a loaded product's attributes
    ///
    /// The payload is parsed against the current AST and reconciled with it,
    /// so coverage holds immediately.
    pub fn load_product(&mut self, submission: &AttributeSubmission) -> Result<ReconcileStats, WireError> {
        let loaded = AttributeValues::from_submission(submission, &self.ast)?;
        let result = reconcile_with_stats(&self.ast, &loaded, self.config.reset_policy);
        self.values = result.values;
        Ok(result.stats)
    }

    /// Take the value state out, leaving an empty form
    pub fn take_values(&mut self) -> AttributeValues {
        std::mem::take(&mut self.values)
    }
}
