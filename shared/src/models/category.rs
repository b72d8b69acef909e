//! Category Model

use crate::types::{CategoryId, GroupId, Slug};
use serde::{Deserialize, Serialize};

/// Category (rubric) node of the product taxonomy
///
/// Immutable per fetch. Only the set of selected ids matters to the
/// attribute engine; the parent link is kept for breadcrumb display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: CategoryId,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// Attribute groups contributed by this category, in display order
    #[serde(default)]
    pub groups: Vec<AttributeGroupAssignment>,
}

impl CategoryNode {
    pub fn new(id: impl Into<CategoryId>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            groups: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<CategoryId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_group(mut self, assignment: AttributeGroupAssignment) -> Self {
        self.groups.push(assignment);
        self
    }
}

/// Binding of an attribute group to a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeGroupAssignment {
    pub group_id: GroupId,
    /// `true` if the category owns the group, `false` if inherited from a parent
    #[serde(default = "default_true")]
    pub is_own: bool,
    /// Attribute slugs exposed in the public catalogue filter
    #[serde(default)]
    pub filter_attributes: Vec<Slug>,
}

impl AttributeGroupAssignment {
    pub fn owned(group_id: impl Into<GroupId>) -> Self {
        Self {
            group_id: group_id.into(),
            is_own: true,
            filter_attributes: Vec::new(),
        }
    }

    pub fn inherited(group_id: impl Into<GroupId>) -> Self {
        Self {
            is_own: false,
            ..Self::owned(group_id)
        }
    }

    pub fn with_filter(mut self, slug: impl Into<Slug>) -> Self {
        self.filter_attributes.push(slug.into());
        self
    }
}

fn default_true() -> bool {
    true
}
