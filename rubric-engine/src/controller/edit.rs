//! User edits on attribute values
//!
//! Only attributes of the current AST are editable; entries of deselected
//! categories are kept read-only until their category comes back.

use super::AttributeFormController;
use crate::error::EditError;
use crate::resolver::resolve;
use crate::service::AttributeDefinitionService;
use rust_decimal::Decimal;
use shared::models::{
    AttributeAst, AttributeDefinition, AttributeScalar, AttributeValues,
    ProductAttributeGroupValue, ProductAttributeValue, ViewVariant,
};

fn find_definition<'a>(
    ast: &'a AttributeAst,
    group_id: &str,
    slug: &str,
) -> Result<&'a AttributeDefinition, EditError> {
    let group = ast
        .group(group_id)
        .ok_or_else(|| EditError::UnknownGroup(group_id.to_string()))?;
    group.attribute(slug).ok_or_else(|| EditError::UnknownAttribute {
        group_id: group_id.to_string(),
        slug: slug.to_string(),
    })
}

/// Entry for `def` in `group_id`, created with defaults if an edit races
/// ahead of reconciliation
fn entry_for<'a>(
    values: &'a mut AttributeValues,
    group_id: &str,
    def: &AttributeDefinition,
) -> &'a mut ProductAttributeValue {
    values
        .group_or_insert(group_id)
        .attributes
        .entry(def.slug.clone())
        .or_insert_with(|| ProductAttributeValue::default_for(def))
}

impl<S: AttributeDefinitionService> AttributeFormController<S> {
    /// Replace an attribute's value
    ///
    /// The value is checked against the attribute's widget and stored in
    /// normalized form (multi-choice members in option order).
    pub fn set_value(
        &mut self,
        group_id: &str,
        slug: &str,
        value: Vec<AttributeScalar>,
    ) -> Result<(), EditError> {
        let def = find_definition(&self.ast, group_id, slug)?;
        let spec = resolve(def);
        spec.check(&value).map_err(|reason| EditError::Rejected {
            slug: slug.to_string(),
            reason,
        })?;

        let entry = entry_for(&mut self.values, group_id, def);
        entry.value = spec.normalize(&value);
        tracing::trace!(group_id, slug, values = entry.value.len(), "Attribute value set");
        Ok(())
    }

    /// Set a text or numeric attribute from raw input; blank input clears it
    pub fn set_text(&mut self, group_id: &str, slug: &str, raw: &str) -> Result<(), EditError> {
        let variant = find_definition(&self.ast, group_id, slug)?.variant;
        let value = if raw.trim().is_empty() {
            Vec::new()
        } else {
            vec![AttributeScalar::parse_for(variant, raw)]
        };
        self.set_value(group_id, slug, value)
    }

    pub fn set_number(
        &mut self,
        group_id: &str,
        slug: &str,
        number: Option<Decimal>,
    ) -> Result<(), EditError> {
        self.set_value(group_id, slug, number.map(AttributeScalar::Number).into_iter().collect())
    }

    /// Select one option by slug, or clear the selection
    pub fn choose_option(
        &mut self,
        group_id: &str,
        slug: &str,
        option: Option<&str>,
    ) -> Result<(), EditError> {
        self.set_value(group_id, slug, option.map(AttributeScalar::text).into_iter().collect())
    }

    /// Flip one option's membership; returns whether it is now selected
    pub fn toggle_option(
        &mut self,
        group_id: &str,
        slug: &str,
        option: &str,
    ) -> Result<bool, EditError> {
        let def = find_definition(&self.ast, group_id, slug)?;
        let mut value = self
            .values
            .attribute(group_id, slug)
            .map(|entry| entry.value.clone())
            .unwrap_or_default();

        let before = value.len();
        value.retain(|scalar| scalar.to_wire() != option);
        let selected = value.len() == before;
        if selected {
            value.push(AttributeScalar::text(option));
        }

        // Single-valued widgets swap rather than accumulate
        if selected && def.variant.is_single_valued() {
            value = vec![AttributeScalar::text(option)];
        }

        self.set_value(group_id, slug, value)?;
        Ok(selected)
    }

    pub fn set_view_variant(
        &mut self,
        group_id: &str,
        slug: &str,
        view_variant: ViewVariant,
    ) -> Result<(), EditError> {
        let def = find_definition(&self.ast, group_id, slug)?;
        entry_for(&mut self.values, group_id, def).view_variant = view_variant;
        Ok(())
    }

    pub fn set_attribute_show_in_card(
        &mut self,
        group_id: &str,
        slug: &str,
        show: bool,
    ) -> Result<(), EditError> {
        let def = find_definition(&self.ast, group_id, slug)?;
        entry_for(&mut self.values, group_id, def).show_in_card = show;
        Ok(())
    }

    pub fn set_group_show_in_card(&mut self, group_id: &str, show: bool) -> Result<(), EditError> {
        let def = self
            .ast
            .group(group_id)
            .ok_or_else(|| EditError::UnknownGroup(group_id.to_string()))?;
        if !self.values.contains_group(group_id) {
            self.values
                .insert_group(ProductAttributeGroupValue::defaults_for(def));
        }
        if let Some(group) = self.values.group_mut(group_id) {
            group.show_in_card = show;
        }
        Ok(())
    }
}
