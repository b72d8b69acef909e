//! Attribute definition service
//!
//! [`AttributeDefinitionService`] is the seam to whatever resolves a
//! category selection into an [`AttributeAst`]. The HTTP implementation
//! lives in the client crate; [`CatalogDefinitionService`] resolves from
//! an in-memory catalogue snapshot.

use crate::error::FetchError;
use async_trait::async_trait;
use shared::error::AppError;
use shared::models::{AttributeAst, AttributeGroupDefinition, CategoryNode};
use shared::types::{CategoryId, GroupId, Slug};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Source of attribute ASTs
///
/// Implementations must be side-effect free: the controller re-issues the
/// same query on refresh and retry. An empty selection yields an empty AST.
#[async_trait]
pub trait AttributeDefinitionService: Send + Sync {
    async fn get_ast(&self, selected: &BTreeSet<CategoryId>) -> Result<AttributeAst, FetchError>;
}

#[async_trait]
impl<T: AttributeDefinitionService + ?Sized> AttributeDefinitionService for Arc<T> {
    async fn get_ast(&self, selected: &BTreeSet<CategoryId>) -> Result<AttributeAst, FetchError> {
        (**self).get_ast(selected).await
    }
}

/// Definition service over a catalogue snapshot
#[derive(Debug, Clone, Default)]
pub struct CatalogDefinitionService {
    categories: HashMap<CategoryId, CategoryNode>,
    groups: HashMap<GroupId, AttributeGroupDefinition>,
}

impl CatalogDefinitionService {
    pub fn new(
        categories: impl IntoIterator<Item = CategoryNode>,
        groups: impl IntoIterator<Item = AttributeGroupDefinition>,
    ) -> Self {
        Self {
            categories: categories.into_iter().map(|c| (c.id.clone(), c)).collect(),
            groups: groups.into_iter().map(|g| (g.id.clone(), g)).collect(),
        }
    }

    pub fn insert_category(&mut self, category: CategoryNode) {
        self.categories.insert(category.id.clone(), category);
    }

    pub fn insert_group(&mut self, group: AttributeGroupDefinition) {
        self.groups.insert(group.id.clone(), group);
    }

    pub fn category(&self, id: &str) -> Option<&CategoryNode> {
        self.categories.get(id)
    }

    fn selected_categories<'a>(
        &'a self,
        selected: &'a BTreeSet<CategoryId>,
    ) -> Result<Vec<&'a CategoryNode>, FetchError> {
        selected
            .iter()
            .map(|id| {
                self.categories
                    .get(id)
                    .ok_or_else(|| FetchError::Rejected(AppError::category_not_found(id.clone())))
            })
            .collect()
    }

    /// Union of the groups assigned to the selected categories
    ///
    /// Categories are visited in ascending id order and their assignments in
    /// declared order; a group reached twice keeps its first position.
    pub fn resolve_ast(&self, selected: &BTreeSet<CategoryId>) -> Result<AttributeAst, FetchError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut groups = Vec::new();

        for category in self.selected_categories(selected)? {
            for assignment in &category.groups {
                if !seen.insert(assignment.group_id.as_str()) {
                    continue;
                }
                match self.groups.get(&assignment.group_id) {
                    Some(group) => groups.push(group.clone()),
                    None => tracing::warn!(
                        category_id = %category.id,
                        group_id = %assignment.group_id,
                        "Category references unknown attribute group, skipping"
                    ),
                }
            }
        }

        Ok(AttributeAst::new(groups))
    }

    /// Attribute slugs exposed in the catalogue filter for the selection
    pub fn filter_attributes(&self, selected: &BTreeSet<CategoryId>) -> Result<Vec<Slug>, FetchError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut slugs = Vec::new();

        for category in self.selected_categories(selected)? {
            for slug in category.groups.iter().flat_map(|a| &a.filter_attributes) {
                if seen.insert(slug.as_str()) {
                    slugs.push(slug.clone());
                }
            }
        }

        Ok(slugs)
    }

    /// Parent chain of a category, nearest first
    ///
    /// Stops at a root, at an unknown parent, or when a cycle is detected.
    pub fn ancestors(&self, id: &str) -> Vec<CategoryId> {
        let mut chain = Vec::new();
        let mut visited: HashSet<&str> = HashSet::from([id]);
        let mut current = self.categories.get(id);

        while let Some(parent_id) = current.and_then(|c| c.parent_id.as_deref()) {
            if !visited.insert(parent_id) {
                tracing::warn!(category_id = %id, parent_id = %parent_id, "Category parent cycle");
                break;
            }
            chain.push(parent_id.to_string());
            current = self.categories.get(parent_id);
        }

        chain
    }
}

#[async_trait]
impl AttributeDefinitionService for CatalogDefinitionService {
    async fn get_ast(&self, selected: &BTreeSet<CategoryId>) -> Result<AttributeAst, FetchError> {
        self.resolve_ast(selected)
    }
}
