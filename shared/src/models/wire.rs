//! Wire shape of product attribute values
//!
//! The transport schema is variant-agnostic: every value element travels
//! as a string, and group/attribute references are flattened to ids.

use crate::models::attribute::{AttributeAst, AttributeVariant};
use crate::models::product::{
    AttributeRef, AttributeScalar, AttributeValues, ProductAttributeGroupValue,
    ProductAttributeValue, ViewVariant,
};
use crate::types::{AttributeId, GroupId, Slug};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One attribute entry as exchanged with the persistence target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAttributeValue {
    pub group_id: GroupId,
    pub attribute_id: AttributeId,
    pub attribute_slug: Slug,
    #[serde(default)]
    pub value: Vec<String>,
    #[serde(default)]
    pub view_variant: ViewVariant,
    #[serde(default = "default_true")]
    pub show_in_card: bool,
}

/// Group-level card visibility flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGroupFlag {
    pub group_id: GroupId,
    pub show_in_card: bool,
}

/// Attribute payload of a product submit/load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSubmission {
    #[serde(default)]
    pub attributes: Vec<WireAttributeValue>,
    #[serde(default)]
    pub groups: Vec<WireGroupFlag>,
}

/// Inconsistent wire payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("Attribute {slug} has no group id")]
    MissingGroupId { slug: Slug },

    #[error("Attribute {slug} appears more than once in group {group_id}")]
    DuplicateAttribute { group_id: GroupId, slug: Slug },
}

fn default_true() -> bool {
    true
}

impl AttributeSubmission {
    /// Flatten groups into the wire shape, preserving group and entry order
    pub fn from_groups<'a>(groups: impl IntoIterator<Item = &'a ProductAttributeGroupValue>) -> Self {
        let mut submission = Self::default();
        for group in groups {
            submission.groups.push(WireGroupFlag {
                group_id: group.group_id.clone(),
                show_in_card: group.show_in_card,
            });
            submission
                .attributes
                .extend(group.values().map(|entry| WireAttributeValue {
                    group_id: group.group_id.clone(),
                    attribute_id: entry.attribute.id.clone(),
                    attribute_slug: entry.attribute.slug.clone(),
                    value: entry.wire_values(),
                    view_variant: entry.view_variant,
                    show_in_card: entry.show_in_card,
                }));
        }
        submission
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.groups.is_empty()
    }
}

impl AttributeValues {
    /// Rebuild in-memory state from flat wire entries alone
    ///
    /// Every group is created with `show_in_card = true`.
    pub fn from_wire(entries: &[WireAttributeValue], ast: &AttributeAst) -> Result<Self, WireError> {
        let submission = AttributeSubmission {
            attributes: entries.to_vec(),
            groups: Vec::new(),
        };
        Self::from_submission(&submission, ast)
    }

    /// Rebuild in-memory state from a loaded product
    ///
    /// Entries are grouped by `groupId` in first-seen order. Scalars are
    /// parsed against the definition found in `ast` (by group, then by
    /// slug anywhere); unknown attributes stay text. Groups listed only in
    /// `groups` are created empty so their card flag survives a round trip.
    /// Entries with an empty slug collapse into one; any other repeated
    /// slug within a group is an error.
    pub fn from_submission(
        submission: &AttributeSubmission,
        ast: &AttributeAst,
    ) -> Result<Self, WireError> {
        let mut values = AttributeValues::new();

        for flag in &submission.groups {
            let mut group = ProductAttributeGroupValue::new(flag.group_id.clone());
            group.show_in_card = flag.show_in_card;
            values.insert_group(group);
        }

        for wire in &submission.attributes {
            if wire.group_id.is_empty() {
                return Err(WireError::MissingGroupId {
                    slug: wire.attribute_slug.clone(),
                });
            }

            let variant = ast
                .attribute(&wire.group_id, &wire.attribute_slug)
                .or_else(|| ast.find_attribute(&wire.attribute_slug))
                .map(|def| def.variant)
                .unwrap_or(AttributeVariant::Text);

            let entry = ProductAttributeValue {
                attribute: AttributeRef::new(wire.attribute_id.clone(), wire.attribute_slug.clone()),
                value: wire
                    .value
                    .iter()
                    .map(|raw| AttributeScalar::parse_for(variant, raw))
                    .collect(),
                view_variant: wire.view_variant,
                show_in_card: wire.show_in_card,
            };

            if !values.contains_group(&wire.group_id) {
                values.insert_group(ProductAttributeGroupValue::new(wire.group_id.clone()));
            }
            let Some(group) = values.group_mut(&wire.group_id) else {
                continue;
            };
            // Entries never bound to an attribute share the empty slug; one
            // stands for all of them and reconciliation drops or resets it.
            if wire.attribute_slug.is_empty() && group.get("").is_some() {
                continue;
            }
            if group.insert(entry).is_some() {
                return Err(WireError::DuplicateAttribute {
                    group_id: wire.group_id.clone(),
                    slug: wire.attribute_slug.clone(),
                });
            }
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attribute::{AttributeDefinition, AttributeGroupDefinition};
    use rust_decimal::Decimal;

    fn ast() -> AttributeAst {
        AttributeAst::new(vec![
            AttributeGroupDefinition::new("g1")
                .with_attribute(AttributeDefinition::new("a1", "color", AttributeVariant::Text))
                .with_attribute(AttributeDefinition::new("a2", "weight", AttributeVariant::Number)),
        ])
    }

    fn wire(group: &str, id: &str, slug: &str, value: &[&str]) -> WireAttributeValue {
        WireAttributeValue {
            group_id: group.to_string(),
            attribute_id: id.to_string(),
            attribute_slug: slug.to_string(),
            value: value.iter().map(|v| v.to_string()).collect(),
            view_variant: ViewVariant::List,
            show_in_card: true,
        }
    }

    #[test]
    fn test_load_parses_numbers_per_variant() {
        let submission = AttributeSubmission {
            attributes: vec![
                wire("g1", "a1", "color", &["12"]),
                wire("g1", "a2", "weight", &["12"]),
                wire("g1", "a2x", "legacy", &["x"]),
            ],
            groups: vec![],
        };
        let values = AttributeValues::from_submission(&submission, &ast()).unwrap();
        assert_eq!(
            values.attribute("g1", "color").unwrap().value,
            vec![AttributeScalar::text("12")]
        );
        assert_eq!(
            values.attribute("g1", "weight").unwrap().value,
            vec![AttributeScalar::Number(Decimal::from(12))]
        );
        assert_eq!(
            values.attribute("g1", "legacy").unwrap().value,
            vec![AttributeScalar::text("x")]
        );
    }

    #[test]
    fn test_from_wire_groups_in_first_seen_order() {
        let entries = vec![
            wire("g2", "x1", "note", &["a"]),
            wire("g1", "a1", "color", &["Red"]),
            wire("g2", "x2", "extra", &[]),
        ];
        let values = AttributeValues::from_wire(&entries, &ast()).unwrap();
        assert_eq!(values.group_ids().collect::<Vec<_>>(), vec!["g2", "g1"]);
        assert_eq!(values.group("g2").unwrap().len(), 2);
        assert!(values.group("g1").unwrap().show_in_card);
    }

    #[test]
    fn test_load_keeps_group_flags() {
        let submission = AttributeSubmission {
            attributes: vec![wire("g1", "a1", "color", &[])],
            groups: vec![
                WireGroupFlag {
                    group_id: "g1".into(),
                    show_in_card: false,
                },
                WireGroupFlag {
                    group_id: "g9".into(),
                    show_in_card: false,
                },
            ],
        };
        let values = AttributeValues::from_submission(&submission, &ast()).unwrap();
        assert!(!values.group("g1").unwrap().show_in_card);
        assert!(values.group("g9").unwrap().is_empty());
        assert_eq!(values.group_ids().collect::<Vec<_>>(), vec!["g1", "g9"]);
    }

    #[test]
    fn test_load_rejects_duplicates_and_missing_group() {
        let dup = AttributeSubmission {
            attributes: vec![wire("g1", "a1", "color", &[]), wire("g1", "a1", "color", &[])],
            groups: vec![],
        };
        assert_eq!(
            AttributeValues::from_submission(&dup, &ast()).unwrap_err(),
            WireError::DuplicateAttribute {
                group_id: "g1".into(),
                slug: "color".into()
            }
        );

        let orphan = AttributeSubmission {
            attributes: vec![wire("", "a1", "color", &[])],
            groups: vec![],
        };
        assert!(matches!(
            AttributeValues::from_submission(&orphan, &ast()),
            Err(WireError::MissingGroupId { .. })
        ));
    }

    #[test]
    fn test_load_collapses_unbound_siblings() {
        let submission = AttributeSubmission {
            attributes: vec![
                wire("g1", "a1", "color", &["x"]),
                wire("g1", "", "", &[]),
                wire("g1", "", "", &[]),
            ],
            groups: vec![],
        };
        let values = AttributeValues::from_submission(&submission, &ast()).unwrap();
        let group = values.group("g1").unwrap();
        assert_eq!(group.len(), 2);
        assert!(!group.get("").unwrap().is_intact());
        assert_eq!(
            group.get("color").unwrap().value,
            vec![AttributeScalar::text("x")]
        );
    }

    #[test]
    fn test_flatten_stringifies_numbers() {
        let mut group = ProductAttributeGroupValue::new("g1");
        group.show_in_card = false;
        group.insert(ProductAttributeValue {
            attribute: AttributeRef::new("a2", "weight"),
            value: vec![AttributeScalar::Number(Decimal::new(25, 1))],
            view_variant: ViewVariant::Rating,
            show_in_card: false,
        });

        let submission = AttributeSubmission::from_groups([&group]);
        assert!(!submission.groups[0].show_in_card);
        let entry = &submission.attributes[0];
        assert_eq!(entry.group_id, "g1");
        assert_eq!(entry.attribute_id, "a2");
        assert_eq!(entry.value, vec!["2.5".to_string()]);
        assert_eq!(entry.view_variant, ViewVariant::Rating);
    }

    #[test]
    fn test_wire_json_is_camel_case() {
        let json = serde_json::to_value(wire("g1", "a1", "color", &["Red"])).unwrap();
        assert_eq!(json["groupId"], "g1");
        assert_eq!(json["attributeSlug"], "color");
        assert_eq!(json["viewVariant"], "list");
        assert_eq!(json["showInCard"], true);
    }
}
