//! Attribute Definition Model
//!
//! Definitions are supplied by the definition service as an [`AttributeAst`]:
//! the de-duplicated union of attribute groups reachable from a category
//! selection. The engine never mutates them.

use crate::types::{AttributeId, GroupId, Slug};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multi-language display text, keyed by language code
///
/// Opaque to the attribute engine; carried through for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(pub BTreeMap<String, String>);

impl LocalizedText {
    pub fn single(lang: impl Into<String>, text: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(lang.into(), text.into());
        Self(map)
    }

    /// Text for `lang`, falling back to any available translation
    pub fn get_or_any(&self, lang: &str) -> Option<&str> {
        self.0
            .get(lang)
            .or_else(|| self.0.values().next())
            .map(String::as_str)
    }
}

/// Declared data kind of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeVariant {
    Text,
    Number,
    SingleChoice,
    MultiChoice,
}

impl AttributeVariant {
    /// Variants whose value carries at most one element
    pub fn is_single_valued(&self) -> bool {
        !matches!(self, Self::MultiChoice)
    }

    /// Variants that require an options group
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultiChoice)
    }
}

/// One selectable option of a choice attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOption {
    pub id: String,
    /// Stable option identifier stored in attribute values
    pub slug: Slug,
    #[serde(default)]
    pub display_name: LocalizedText,
    /// Swatch color (e.g. "#ff0000")
    #[serde(default)]
    pub color: Option<String>,
}

/// Ordered option list of a choice attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsGroup {
    pub id: String,
    #[serde(default)]
    pub options: Vec<AttributeOption>,
}

impl OptionsGroup {
    pub fn find(&self, slug: &str) -> Option<&AttributeOption> {
        self.options.iter().find(|o| o.slug == slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.find(slug).is_some()
    }
}

/// Attribute definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub id: AttributeId,
    /// Reconciliation key, stable across AST fetches
    pub slug: Slug,
    pub variant: AttributeVariant,
    #[serde(default)]
    pub display_name: LocalizedText,
    /// Display unit (e.g. "cm", "kg")
    #[serde(default)]
    pub metric: Option<String>,
    /// Required for single-choice and multi-choice variants
    #[serde(default)]
    pub options_group: Option<OptionsGroup>,
}

impl AttributeDefinition {
    pub fn new(id: impl Into<AttributeId>, slug: impl Into<Slug>, variant: AttributeVariant) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            variant,
            display_name: LocalizedText::default(),
            metric: None,
            options_group: None,
        }
    }

    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    pub fn with_options(mut self, options_group: OptionsGroup) -> Self {
        self.options_group = Some(options_group);
        self
    }

    /// Choice variant declared without an options group
    pub fn is_missing_options(&self) -> bool {
        self.variant.is_choice() && self.options_group.is_none()
    }
}

/// Attribute group definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeGroupDefinition {
    pub id: GroupId,
    #[serde(default)]
    pub display_name: LocalizedText,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
}

impl AttributeGroupDefinition {
    pub fn new(id: impl Into<GroupId>) -> Self {
        Self {
            id: id.into(),
            display_name: LocalizedText::default(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeDefinition) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, slug: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.slug == slug)
    }
}

/// Resolved attribute groups for a category selection
///
/// Recomputed on every selection change, never patched incrementally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeAst {
    pub groups: Vec<AttributeGroupDefinition>,
}

impl AttributeAst {
    pub fn new(groups: Vec<AttributeGroupDefinition>) -> Self {
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, id: &str) -> Option<&AttributeGroupDefinition> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn contains_group(&self, id: &str) -> bool {
        self.group(id).is_some()
    }

    /// Definition of `slug` inside group `group_id`
    pub fn attribute(&self, group_id: &str, slug: &str) -> Option<&AttributeDefinition> {
        self.group(group_id).and_then(|g| g.attribute(slug))
    }

    /// First definition of `slug` in any group
    pub fn find_attribute(&self, slug: &str) -> Option<&AttributeDefinition> {
        self.groups.iter().find_map(|g| g.attribute(slug))
    }

    /// Every (group, attribute) pair in AST order
    pub fn attributes(&self) -> impl Iterator<Item = (&AttributeGroupDefinition, &AttributeDefinition)> {
        self.groups
            .iter()
            .flat_map(|g| g.attributes.iter().map(move |a| (g, a)))
    }

    /// Total number of attribute definitions
    pub fn attribute_count(&self) -> usize {
        self.groups.iter().map(|g| g.attributes.len()).sum()
    }
}
