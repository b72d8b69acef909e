//! Product Attribute Value Model
//!
//! In-memory value state of a product form. Groups are keyed by group id,
//! attribute values by slug; both maps keep insertion order, which is the
//! order values are rendered and submitted in.

use crate::models::attribute::{AttributeDefinition, AttributeGroupDefinition, AttributeVariant};
use crate::types::{AttributeId, GroupId, Slug};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display hint for a value on the public product page
///
/// Orthogonal to [`AttributeVariant`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewVariant {
    #[default]
    List,
    Text,
    Tag,
    Icon,
    Rating,
}

/// One element of an attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeScalar {
    Text(String),
    Number(Decimal),
}

impl AttributeScalar {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn number(value: Decimal) -> Self {
        Self::Number(value)
    }

    /// Parse a wire string according to the declared variant
    ///
    /// Number-variant strings that parse as decimals become [`Self::Number`];
    /// everything else stays text.
    pub fn parse_for(variant: AttributeVariant, raw: &str) -> Self {
        if variant == AttributeVariant::Number
            && let Ok(n) = Decimal::from_str(raw.trim())
        {
            return Self::Number(n);
        }
        Self::Text(raw.to_string())
    }

    /// Wire representation (numbers are stringified)
    pub fn to_wire(&self) -> String {
        self.to_string()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Numeric reading; text is parsed leniently
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => Decimal::from_str(s.trim()).ok(),
        }
    }
}

impl fmt::Display for AttributeScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for AttributeScalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Decimal> for AttributeScalar {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

/// Reference from a value entry to its definition
///
/// `slug` is the reconciliation key. `id` is carried for the transport
/// and must not be trusted across AST regeneration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeRef {
    pub id: AttributeId,
    pub slug: Slug,
}

impl AttributeRef {
    pub fn new(id: impl Into<AttributeId>, slug: impl Into<Slug>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
        }
    }

    pub fn for_definition(def: &AttributeDefinition) -> Self {
        Self::new(def.id.clone(), def.slug.clone())
    }

    /// Both reference fields are populated
    pub fn is_intact(&self) -> bool {
        !self.id.is_empty() && !self.slug.is_empty()
    }
}

/// Value of one attribute on a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributeValue {
    pub attribute: AttributeRef,
    pub value: Vec<AttributeScalar>,
    #[serde(default)]
    pub view_variant: ViewVariant,
    pub show_in_card: bool,
}

impl ProductAttributeValue {
    /// Fresh entry for an attribute that just entered the AST
    pub fn default_for(def: &AttributeDefinition) -> Self {
        Self {
            attribute: AttributeRef::for_definition(def),
            value: Vec::new(),
            view_variant: ViewVariant::List,
            show_in_card: true,
        }
    }

    pub fn slug(&self) -> &str {
        &self.attribute.slug
    }

    pub fn is_intact(&self) -> bool {
        self.attribute.is_intact()
    }

    /// Nothing entered yet
    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }

    /// Wire strings of the value, in order
    pub fn wire_values(&self) -> Vec<String> {
        self.value.iter().map(AttributeScalar::to_wire).collect()
    }
}

/// Values of one attribute group on a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributeGroupValue {
    pub group_id: GroupId,
    pub show_in_card: bool,
    /// Keyed by attribute slug
    #[serde(default)]
    pub attributes: IndexMap<Slug, ProductAttributeValue>,
}

impl ProductAttributeGroupValue {
    pub fn new(group_id: impl Into<GroupId>) -> Self {
        Self {
            group_id: group_id.into(),
            show_in_card: true,
            attributes: IndexMap::new(),
        }
    }

    /// Default entry for every attribute of `def`
    pub fn defaults_for(def: &AttributeGroupDefinition) -> Self {
        let mut group = Self::new(def.id.clone());
        group.attributes = default_attributes(def);
        group
    }

    /// Insert keyed by the entry's slug, returning the replaced entry
    pub fn insert(&mut self, value: ProductAttributeValue) -> Option<ProductAttributeValue> {
        self.attributes.insert(value.attribute.slug.clone(), value)
    }

    pub fn get(&self, slug: &str) -> Option<&ProductAttributeValue> {
        self.attributes.get(slug)
    }

    pub fn get_mut(&mut self, slug: &str) -> Option<&mut ProductAttributeValue> {
        self.attributes.get_mut(slug)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &ProductAttributeValue> {
        self.attributes.values()
    }
}

/// Default entries for every attribute of a group definition, in order
pub fn default_attributes(def: &AttributeGroupDefinition) -> IndexMap<Slug, ProductAttributeValue> {
    def.attributes
        .iter()
        .map(|a| (a.slug.clone(), ProductAttributeValue::default_for(a)))
        .collect()
}

/// Complete attribute value state of a product form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeValues {
    groups: IndexMap<GroupId, ProductAttributeGroupValue>,
}

impl AttributeValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, group_id: &str) -> Option<&ProductAttributeGroupValue> {
        self.groups.get(group_id)
    }

    pub fn group_mut(&mut self, group_id: &str) -> Option<&mut ProductAttributeGroupValue> {
        self.groups.get_mut(group_id)
    }

    pub fn contains_group(&self, group_id: &str) -> bool {
        self.groups.contains_key(group_id)
    }

    /// Group `group_id`, created empty if absent
    pub fn group_or_insert(&mut self, group_id: &str) -> &mut ProductAttributeGroupValue {
        self.groups
            .entry(group_id.to_string())
            .or_insert_with(|| ProductAttributeGroupValue::new(group_id))
    }

    /// Insert keyed by the group's id, returning the replaced group
    pub fn insert_group(
        &mut self,
        group: ProductAttributeGroupValue,
    ) -> Option<ProductAttributeGroupValue> {
        self.groups.insert(group.group_id.clone(), group)
    }

    pub fn groups(&self) -> impl Iterator<Item = &ProductAttributeGroupValue> {
        self.groups.values()
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn attribute(&self, group_id: &str, slug: &str) -> Option<&ProductAttributeValue> {
        self.group(group_id).and_then(|g| g.get(slug))
    }

    pub fn attribute_mut(
        &mut self,
        group_id: &str,
        slug: &str,
    ) -> Option<&mut ProductAttributeValue> {
        self.group_mut(group_id).and_then(|g| g.get_mut(slug))
    }

    /// Same groups and entries in the same order
    ///
    /// `PartialEq` on the underlying maps ignores order; rendering and
    /// submission do not.
    pub fn same_layout(&self, other: &Self) -> bool {
        self == other
            && self.groups.keys().eq(other.groups.keys())
            && self
                .groups
                .values()
                .zip(other.groups.values())
                .all(|(a, b)| a.attributes.keys().eq(b.attributes.keys()))
    }
}

impl FromIterator<ProductAttributeGroupValue> for AttributeValues {
    fn from_iter<I: IntoIterator<Item = ProductAttributeGroupValue>>(iter: I) -> Self {
        let mut values = Self::new();
        for group in iter {
            values.insert_group(group);
        }
        values
    }
}
