//! Value state checks against an AST
//!
//! Reports every AST attribute whose entry is missing or whose value does
//! not fit its widget. Groups outside the AST are not checked.

use crate::resolver::{ValueRejection, resolve};
use shared::models::{AttributeAst, AttributeValues};
use shared::types::{GroupId, Slug};
use thiserror::Error;

/// What is wrong with one attribute entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationKind {
    #[error("no value entry")]
    MissingEntry,

    #[error(transparent)]
    Rejected(#[from] ValueRejection),
}

/// A failed check, located by group id and attribute slug
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{group_id}/{slug}: {kind}")]
pub struct Violation {
    pub group_id: GroupId,
    pub slug: Slug,
    pub kind: ViolationKind,
}

/// Check `values` against every attribute of `ast`, in AST order
pub fn validate(ast: &AttributeAst, values: &AttributeValues) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (group, attr) in ast.attributes() {
        let kind = match values.attribute(&group.id, &attr.slug) {
            None => Some(ViolationKind::MissingEntry),
            Some(entry) => resolve(attr).check(&entry.value).err().map(ViolationKind::from),
        };
        if let Some(kind) = kind {
            violations.push(Violation {
                group_id: group.id.clone(),
                slug: attr.slug.clone(),
                kind,
            });
        }
    }

    violations
}
