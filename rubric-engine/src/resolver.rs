//! Variant Input Resolver
//!
//! Maps an attribute's declared variant to the value shape and widget class
//! needed to edit it. Pure: the same definition always yields the same
//! [`WidgetSpec`], and nothing is logged or cached here.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{AttributeDefinition, AttributeScalar, AttributeVariant, LocalizedText};
use std::collections::HashSet;
use thiserror::Error;

/// Widget class used to edit a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Single-slot free text editor
    TextInput,
    /// Single-slot numeric editor
    NumberInput,
    /// Single-slot chooser over the options
    Select,
    /// One membership toggle per option
    CheckboxGroup,
}

/// How many elements the value may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueArity {
    /// At most one element
    Single,
    /// Any subset of the option identifiers
    Set,
}

/// Whether the definition is usable as declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionIntegrity {
    Ok,
    /// Choice variant declared without an options group; rendered with no options
    MissingOptions,
}

/// Option as presented by a chooser widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub slug: String,
    pub label: LocalizedText,
    pub color: Option<String>,
}

/// Everything a renderer needs to edit one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetSpec {
    pub attribute_id: String,
    pub attribute_slug: String,
    pub kind: WidgetKind,
    pub arity: ValueArity,
    pub options: Vec<ChoiceOption>,
    pub metric: Option<String>,
    /// Lower bound for numeric input
    pub min: Option<Decimal>,
    pub integrity: DefinitionIntegrity,
}

/// Why a candidate value does not fit its widget
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueRejection {
    #[error("at most {max} value(s) allowed, got {got}")]
    TooManyValues { max: usize, got: usize },

    #[error("'{0}' is not an option of this attribute")]
    NotAnOption(String),

    #[error("option '{0}' selected more than once")]
    DuplicateOption(String),

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("{value} is below the minimum of {min}")]
    BelowMinimum { value: Decimal, min: Decimal },
}

/// Resolve the widget for an attribute definition
///
/// A choice variant without an options group resolves to a widget with no
/// options and [`DefinitionIntegrity::MissingOptions`]; the defect belongs
/// to the definition source and is not treated as a failure here.
pub fn resolve(attr: &AttributeDefinition) -> WidgetSpec {
    let (kind, arity) = match attr.variant {
        AttributeVariant::Text => (WidgetKind::TextInput, ValueArity::Single),
        AttributeVariant::Number => (WidgetKind::NumberInput, ValueArity::Single),
        AttributeVariant::SingleChoice => (WidgetKind::Select, ValueArity::Single),
        AttributeVariant::MultiChoice => (WidgetKind::CheckboxGroup, ValueArity::Set),
    };

    let options = match (&attr.options_group, attr.variant.is_choice()) {
        (Some(group), true) => group
            .options
            .iter()
            .map(|o| ChoiceOption {
                slug: o.slug.clone(),
                label: o.display_name.clone(),
                color: o.color.clone(),
            })
            .collect(),
        _ => Vec::new(),
    };

    let integrity = if attr.is_missing_options() {
        DefinitionIntegrity::MissingOptions
    } else {
        DefinitionIntegrity::Ok
    };

    WidgetSpec {
        attribute_id: attr.id.clone(),
        attribute_slug: attr.slug.clone(),
        kind,
        arity,
        options,
        metric: attr.metric.clone(),
        min: (attr.variant == AttributeVariant::Number).then_some(Decimal::ZERO),
        integrity,
    }
}

impl WidgetSpec {
    pub fn is_choice(&self) -> bool {
        matches!(self.kind, WidgetKind::Select | WidgetKind::CheckboxGroup)
    }

    pub fn has_option(&self, slug: &str) -> bool {
        self.options.iter().any(|o| o.slug == slug)
    }

    /// Option membership is only enforced when the definition carries options
    fn enforces_options(&self) -> bool {
        self.is_choice() && self.integrity == DefinitionIntegrity::Ok
    }

    /// Check a candidate value as entered by the user
    pub fn check(&self, value: &[AttributeScalar]) -> Result<(), ValueRejection> {
        if self.arity == ValueArity::Single && value.len() > 1 {
            return Err(ValueRejection::TooManyValues {
                max: 1,
                got: value.len(),
            });
        }

        match self.kind {
            WidgetKind::TextInput => Ok(()),
            WidgetKind::NumberInput => {
                for scalar in value {
                    let n = scalar
                        .as_decimal()
                        .ok_or_else(|| ValueRejection::NotANumber(scalar.to_wire()))?;
                    if let Some(min) = self.min
                        && n < min
                    {
                        return Err(ValueRejection::BelowMinimum { value: n, min });
                    }
                }
                Ok(())
            }
            WidgetKind::Select | WidgetKind::CheckboxGroup => {
                let mut seen = HashSet::new();
                for scalar in value {
                    let slug = scalar.to_wire();
                    if self.enforces_options() && !self.has_option(&slug) {
                        return Err(ValueRejection::NotAnOption(slug));
                    }
                    if !seen.insert(slug.clone()) {
                        return Err(ValueRejection::DuplicateOption(slug));
                    }
                }
                Ok(())
            }
        }
    }

    /// Bring a stored value into the widget's arity
    ///
    /// Single-valued widgets keep the first element; a select drops a
    /// value that is not one of its options. Checkbox groups drop
    /// duplicates and, when options are known, keep members in option
    /// order. Numbers are never rewritten. Idempotent.
    pub fn normalize(&self, value: &[AttributeScalar]) -> Vec<AttributeScalar> {
        match self.arity {
            ValueArity::Single => {
                let Some(first) = value.first() else {
                    return Vec::new();
                };
                if self.enforces_options() && !self.has_option(&first.to_wire()) {
                    return Vec::new();
                }
                vec![first.clone()]
            }
            ValueArity::Set if self.enforces_options() => {
                let present: HashSet<String> = value.iter().map(AttributeScalar::to_wire).collect();
                self.options
                    .iter()
                    .filter(|o| present.contains(&o.slug))
                    .map(|o| AttributeScalar::Text(o.slug.clone()))
                    .collect()
            }
            ValueArity::Set => {
                let mut seen = HashSet::new();
                value
                    .iter()
                    .filter(|s| seen.insert(s.to_wire()))
                    .cloned()
                    .collect()
            }
        }
    }
}
