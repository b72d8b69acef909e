//! Attribute Value Reconciler
//!
//! Brings a product's attribute value state in line with a freshly resolved
//! [`AttributeAst`]. For every group of the AST the result holds exactly one
//! entry per attribute; entries are looked up by group id and attribute slug,
//! never by position or attribute id.
//!
//! Groups absent from the AST are carried through untouched after the AST
//! groups, so deselecting and re-selecting a category restores prior input.
//! Reconciling an already reconciled state against the same AST returns an
//! equal state.

use crate::resolver::resolve;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shared::models::{
    AttributeAst, AttributeGroupDefinition, AttributeRef, AttributeValues,
    ProductAttributeGroupValue, ProductAttributeValue, default_attributes,
};
use shared::types::Slug;

#[cfg(test)]
mod properties;

/// What happens to a group whose stored entries do not line up with its definition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Patch each attribute in place: missing entries get defaults,
    /// degenerate references are repaired from the definition, and every
    /// other entry keeps its value.
    #[default]
    PerAttribute,
    /// Any missing or degenerate entry replaces the whole group's entries
    /// with defaults, discarding sibling values. A group with every entry
    /// present and intact keeps its values, but references are still
    /// refreshed from the definition and values trimmed to their arity.
    GroupWide,
}

/// Counters for one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Groups synthesized because they had no prior entry
    pub groups_created: usize,
    /// Groups whose entries were replaced wholesale (group-wide policy)
    pub groups_reset: usize,
    /// Default entries created for attributes without a prior entry
    pub defaults_inserted: usize,
    /// Degenerate entries whose reference was rebuilt from the definition
    pub refs_repaired: usize,
    /// Stored values trimmed to fit their attribute's arity
    pub values_normalized: usize,
    /// Entries with an empty key, dropped
    pub entries_dropped: usize,
    /// Groups outside the AST carried through unchanged
    pub orphan_groups: usize,
    /// Choice attributes declared without options
    pub integrity_defects: usize,
}

impl ReconcileStats {
    /// Nothing was created, repaired, trimmed or dropped
    pub fn is_noop(&self) -> bool {
        self.groups_created == 0
            && self.groups_reset == 0
            && self.defaults_inserted == 0
            && self.refs_repaired == 0
            && self.values_normalized == 0
            && self.entries_dropped == 0
    }
}

/// Result of a reconciliation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub values: AttributeValues,
    pub stats: ReconcileStats,
}

/// Reconcile `current` against `ast`
pub fn reconcile(ast: &AttributeAst, current: &AttributeValues, policy: ResetPolicy) -> AttributeValues {
    reconcile_with_stats(ast, current, policy).values
}

/// Reconcile `current` against `ast`, reporting what changed
pub fn reconcile_with_stats(
    ast: &AttributeAst,
    current: &AttributeValues,
    policy: ResetPolicy,
) -> Reconciliation {
    let mut stats = ReconcileStats::default();
    let mut next = AttributeValues::new();

    for def in &ast.groups {
        stats.integrity_defects += def.attributes.iter().filter(|a| a.is_missing_options()).count();

        let group = match current.group(&def.id) {
            None => {
                stats.groups_created += 1;
                stats.defaults_inserted += def.attributes.len();
                ProductAttributeGroupValue::defaults_for(def)
            }
            Some(existing) => match policy {
                ResetPolicy::PerAttribute => patch_group(def, existing, &mut stats),
                ResetPolicy::GroupWide => reset_or_keep_group(def, existing, &mut stats),
            },
        };
        next.insert_group(group);
    }

    for orphan in current.groups().filter(|g| !ast.contains_group(&g.group_id)) {
        stats.orphan_groups += 1;
        next.insert_group(orphan.clone());
    }

    tracing::debug!(
        ?policy,
        groups = ast.groups.len(),
        created = stats.groups_created,
        reset = stats.groups_reset,
        defaults = stats.defaults_inserted,
        repaired = stats.refs_repaired,
        normalized = stats.values_normalized,
        dropped = stats.entries_dropped,
        orphans = stats.orphan_groups,
        "Reconciled attribute values"
    );

    Reconciliation { values: next, stats }
}

/// Per-attribute policy for a group that already has entries
fn patch_group(
    def: &AttributeGroupDefinition,
    existing: &ProductAttributeGroupValue,
    stats: &mut ReconcileStats,
) -> ProductAttributeGroupValue {
    let mut attributes: IndexMap<Slug, ProductAttributeValue> = IndexMap::new();

    for attr in &def.attributes {
        let entry = match existing.get(&attr.slug) {
            Some(prior) => {
                let mut entry = prior.clone();
                if !prior.is_intact() {
                    stats.refs_repaired += 1;
                }
                // ids are not stable across AST fetches; the slug is
                entry.attribute = AttributeRef::for_definition(attr);
                normalize_entry(&mut entry, attr, stats);
                entry
            }
            None => {
                stats.defaults_inserted += 1;
                ProductAttributeValue::default_for(attr)
            }
        };
        attributes.insert(attr.slug.clone(), entry);
    }

    carry_extra_entries(existing, &mut attributes, stats);

    ProductAttributeGroupValue {
        group_id: existing.group_id.clone(),
        show_in_card: existing.show_in_card,
        attributes,
    }
}

/// Group-wide policy: keep every entry if all are present and intact,
/// otherwise start the group over from defaults
fn reset_or_keep_group(
    def: &AttributeGroupDefinition,
    existing: &ProductAttributeGroupValue,
    stats: &mut ReconcileStats,
) -> ProductAttributeGroupValue {
    let all_intact = def
        .attributes
        .iter()
        .all(|a| existing.get(&a.slug).is_some_and(ProductAttributeValue::is_intact));

    if !all_intact {
        stats.groups_reset += 1;
        stats.defaults_inserted += def.attributes.len();
        return ProductAttributeGroupValue {
            group_id: existing.group_id.clone(),
            show_in_card: existing.show_in_card,
            attributes: default_attributes(def),
        };
    }

    let mut attributes: IndexMap<Slug, ProductAttributeValue> = IndexMap::new();
    for attr in &def.attributes {
        if let Some(prior) = existing.get(&attr.slug) {
            let mut entry = prior.clone();
            entry.attribute = AttributeRef::for_definition(attr);
            normalize_entry(&mut entry, attr, stats);
            attributes.insert(attr.slug.clone(), entry);
        }
    }
    carry_extra_entries(existing, &mut attributes, stats);

    ProductAttributeGroupValue {
        group_id: existing.group_id.clone(),
        show_in_card: existing.show_in_card,
        attributes,
    }
}

fn normalize_entry(
    entry: &mut ProductAttributeValue,
    attr: &shared::models::AttributeDefinition,
    stats: &mut ReconcileStats,
) {
    let normalized = resolve(attr).normalize(&entry.value);
    if normalized != entry.value {
        stats.values_normalized += 1;
        entry.value = normalized;
    }
}

/// Entries for attributes no longer in the group definition stay after the
/// defined ones, in prior order; entries with an empty key cannot be matched
/// and are dropped.
fn carry_extra_entries(
    existing: &ProductAttributeGroupValue,
    attributes: &mut IndexMap<Slug, ProductAttributeValue>,
    stats: &mut ReconcileStats,
) {
    for (slug, entry) in &existing.attributes {
        if slug.is_empty() {
            stats.entries_dropped += 1;
            continue;
        }
        if !attributes.contains_key(slug) {
            attributes.insert(slug.clone(), entry.clone());
        }
    }
}
