use super::*;
use crate::resolver::resolve;
use crate::validation::{ViolationKind, validate};
use std::collections::HashSet;
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use proptest::sample::{select, subsequence};
use rust_decimal::Decimal;
use shared::models::{
    AttributeDefinition, AttributeOption, AttributeScalar, AttributeVariant, LocalizedText,
    OptionsGroup, ViewVariant,
};

const GROUPS: &[&str] = &["g0", "g1", "g2", "g3", "legacy"];
const SLUGS: &[&str] = &["color", "size", "weight", "material", "fit", "note"];
const OPTIONS: &[&str] = &["a", "b", "c", "d"];

// ========================================================================
// Strategies
// ========================================================================

fn variant() -> impl Strategy<Value = AttributeVariant> {
    prop_oneof![
        Just(AttributeVariant::Text),
        Just(AttributeVariant::Number),
        Just(AttributeVariant::SingleChoice),
        Just(AttributeVariant::MultiChoice),
    ]
}

fn options_group() -> impl Strategy<Value = Option<OptionsGroup>> {
    proptest::option::of(subsequence(OPTIONS.to_vec(), 1..=OPTIONS.len()).prop_map(|slugs| {
        OptionsGroup {
            id: "og".to_string(),
            options: slugs
                .into_iter()
                .map(|s| AttributeOption {
                    id: format!("opt-{}", s),
                    slug: s.to_string(),
                    display_name: LocalizedText::default(),
                    color: None,
                })
                .collect(),
        }
    }))
}

fn group_def(id: &'static str) -> impl Strategy<Value = AttributeGroupDefinition> {
    (
        btree_set(0..SLUGS.len(), 0..=4),
        vec((variant(), options_group()), SLUGS.len()),
    )
        .prop_map(move |(picked, shapes)| {
            let mut group = AttributeGroupDefinition::new(id);
            for i in picked {
                let (variant, options) = shapes[i].clone();
                let mut def = AttributeDefinition::new(format!("{}-{}", id, SLUGS[i]), SLUGS[i], variant);
                if let Some(options) = options {
                    def = def.with_options(options);
                }
                group = group.with_attribute(def);
            }
            group
        })
}

fn arb_ast() -> impl Strategy<Value = AttributeAst> {
    // "legacy" never appears in an AST so orphans always have a source
    subsequence(GROUPS[..4].to_vec(), 0..=4)
        .prop_flat_map(|ids| ids.into_iter().map(group_def).collect::<Vec<_>>())
        .prop_map(AttributeAst::new)
}

fn scalar() -> impl Strategy<Value = AttributeScalar> {
    prop_oneof![
        select(OPTIONS.to_vec()).prop_map(|s| AttributeScalar::text(s)),
        "[a-z]{1,4}".prop_map(AttributeScalar::Text),
        (-5i64..1000).prop_map(|n| AttributeScalar::Number(Decimal::from(n))),
    ]
}

fn entry() -> impl Strategy<Value = ProductAttributeValue> {
    (
        select(SLUGS.to_vec()),
        prop_oneof![Just(String::new()), "[a-z]{1,3}"],
        vec(scalar(), 0..4),
        select(vec![ViewVariant::List, ViewVariant::Tag, ViewVariant::Rating]),
        any::<bool>(),
    )
        .prop_map(|(slug, id, value, view_variant, show_in_card)| ProductAttributeValue {
            attribute: AttributeRef::new(id, slug),
            value,
            view_variant,
            show_in_card,
        })
}

fn prior_group() -> impl Strategy<Value = ProductAttributeGroupValue> {
    (select(GROUPS.to_vec()), any::<bool>(), vec(entry(), 0..5)).prop_map(
        |(id, show_in_card, entries)| {
            let mut group = ProductAttributeGroupValue::new(id);
            group.show_in_card = show_in_card;
            for entry in entries {
                group.insert(entry);
            }
            group
        },
    )
}

fn arb_prior_state() -> impl Strategy<Value = AttributeValues> {
    vec(prior_group(), 0..5).prop_map(|groups| groups.into_iter().collect())
}

fn arb_policy() -> impl Strategy<Value = ResetPolicy> {
    prop_oneof![Just(ResetPolicy::PerAttribute), Just(ResetPolicy::GroupWide)]
}

// ========================================================================
// Properties
// ========================================================================

proptest! {
    #[test]
    fn every_defined_attribute_has_one_entry(ast in arb_ast(), prior in arb_prior_state(), policy in arb_policy()) {
        let values = reconcile(&ast, &prior, policy);
        for (group, def) in ast.attributes() {
            let entry = values.attribute(&group.id, &def.slug);
            prop_assert!(entry.is_some(), "{}/{} missing", group.id, def.slug);
            let entry = entry.unwrap();
            prop_assert_eq!(&entry.attribute.slug, &def.slug);
            prop_assert_eq!(&entry.attribute.id, &def.id);
        }
    }

    #[test]
    fn ast_groups_lead_and_orphans_follow(ast in arb_ast(), prior in arb_prior_state(), policy in arb_policy()) {
        let values = reconcile(&ast, &prior, policy);
        let expected: Vec<&str> = ast
            .groups
            .iter()
            .map(|g| g.id.as_str())
            .chain(prior.group_ids().filter(|id| !ast.contains_group(id)))
            .collect();
        prop_assert_eq!(values.group_ids().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn orphan_groups_are_untouched(ast in arb_ast(), prior in arb_prior_state(), policy in arb_policy()) {
        let values = reconcile(&ast, &prior, policy);
        for orphan in prior.groups().filter(|g| !ast.contains_group(&g.group_id)) {
            prop_assert_eq!(values.group(&orphan.group_id), Some(orphan));
        }
    }

    #[test]
    fn reconciling_twice_changes_nothing(ast in arb_ast(), prior in arb_prior_state(), policy in arb_policy()) {
        let once = reconcile(&ast, &prior, policy);
        let twice = reconcile_with_stats(&ast, &once, policy);
        prop_assert!(twice.values.same_layout(&once));
        prop_assert!(twice.stats.is_noop(), "{:?}", twice.stats);
    }

    #[test]
    fn per_attribute_preserves_matching_entries(ast in arb_ast(), prior in arb_prior_state()) {
        let values = reconcile(&ast, &prior, ResetPolicy::PerAttribute);
        for (group, def) in ast.attributes() {
            let Some(before) = prior.attribute(&group.id, &def.slug) else {
                continue;
            };
            let after = values.attribute(&group.id, &def.slug).unwrap();
            prop_assert_eq!(&after.value, &resolve(def).normalize(&before.value));
            prop_assert_eq!(after.view_variant, before.view_variant);
            prop_assert_eq!(after.show_in_card, before.show_in_card);
        }
    }

    #[test]
    fn group_card_flag_survives(ast in arb_ast(), prior in arb_prior_state(), policy in arb_policy()) {
        let values = reconcile(&ast, &prior, policy);
        for before in prior.groups() {
            let after = values.group(&before.group_id).unwrap();
            prop_assert_eq!(after.show_in_card, before.show_in_card);
        }
    }

    #[test]
    fn single_valued_attributes_hold_at_most_one(ast in arb_ast(), prior in arb_prior_state(), policy in arb_policy()) {
        let values = reconcile(&ast, &prior, policy);
        for (group, def) in ast.attributes().filter(|(_, d)| d.variant.is_single_valued()) {
            let entry = values.attribute(&group.id, &def.slug).unwrap();
            prop_assert!(entry.value.len() <= 1);
        }
    }

    #[test]
    fn multi_choice_values_are_distinct_options(ast in arb_ast(), prior in arb_prior_state(), policy in arb_policy()) {
        let values = reconcile(&ast, &prior, policy);
        for (group, def) in ast.attributes() {
            if def.variant != AttributeVariant::MultiChoice {
                continue;
            }
            let Some(options) = &def.options_group else {
                continue;
            };
            let entry = values.attribute(&group.id, &def.slug).unwrap();
            let mut seen = HashSet::new();
            for scalar in &entry.value {
                let slug = scalar.to_wire();
                prop_assert!(options.options.iter().any(|o| o.slug == slug), "{} not an option", slug);
                prop_assert!(seen.insert(slug.clone()), "{} repeated", slug);
            }
        }
    }

    #[test]
    fn reconciled_choices_pass_validation(ast in arb_ast(), prior in arb_prior_state(), policy in arb_policy()) {
        let values = reconcile(&ast, &prior, policy);
        for violation in validate(&ast, &values) {
            // Stored numbers are never rewritten, so only number attributes may still fail
            prop_assert!(matches!(violation.kind, ViolationKind::Rejected(_)), "{}", violation);
            let def = ast.attribute(&violation.group_id, &violation.slug).unwrap();
            prop_assert_eq!(def.variant, AttributeVariant::Number, "{}", violation);
        }
    }
}
