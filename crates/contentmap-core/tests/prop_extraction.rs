//! Property-based tests for coercion and cardinality invariants

use contentmap_core::coerce::{parse_bool, parse_number};
use contentmap_core::types::{Field, Keyword};
use contentmap_core::{
    apply_cardinality, EnumType, ExtractionContext, FieldExtractor, PropertyBinding,
    PropertyBuilder, PropertyValue,
};
use proptest::prelude::*;

use test_support::{factory, sample_registry};

proptest! {
    #[test]
    fn prop_true_in_any_case_parses_true(
        upper in proptest::collection::vec(any::<bool>(), 4),
        left in "[ \t]{0,3}",
        right in "[ \t]{0,3}",
    ) {
        let word: String = "true"
            .chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect();
        let input = format!("{}{}{}", left, word, right);
        prop_assert!(parse_bool(&input));
    }

    #[test]
    fn prop_anything_else_parses_false(raw in ".{0,12}") {
        prop_assume!(raw.trim().to_lowercase() != "true");
        prop_assert!(!parse_bool(&raw));
    }

    #[test]
    fn prop_finite_numbers_round_trip(n in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
        prop_assert_eq!(parse_number(&n.to_string()), n);
    }

    #[test]
    fn prop_non_numeric_keys_become_zero(key in "[a-zA-Z_][a-zA-Z_ ]{0,10}") {
        let factory = factory(sample_registry());
        let property = PropertyBuilder::new("n")
            .field("n", FieldExtractor::NumericKeywordKey)
            .build()
            .unwrap();
        let resolver = contentmap_core::LinkResolver::new("https://example.com/").unwrap();
        let ctx = ExtractionContext::new(
            &property,
            &factory,
            &contentmap_core::PassthroughRenderer,
            &resolver,
        );
        let field = Field::new("n", [Keyword::new("k", key, "K")]);

        let values = FieldExtractor::NumericKeywordKey.extract(&field, &ctx).unwrap();
        prop_assert_eq!(values, vec![PropertyValue::Number(0.0)]);
    }

    #[test]
    fn prop_cardinality(texts in proptest::collection::vec("[a-z]{1,5}", 0..8)) {
        let values: Vec<PropertyValue> = texts.iter().cloned().map(PropertyValue::Text).collect();

        match apply_cardinality(values.clone(), false) {
            PropertyBinding::Single(first) => prop_assert_eq!(first, values.first().cloned()),
            other => prop_assert!(false, "unexpected binding {:?}", other),
        }
        prop_assert_eq!(apply_cardinality(values.clone(), true), PropertyBinding::Multiple(values));
    }

    #[test]
    fn prop_enum_keeps_valid_entries_in_order(
        raw in proptest::collection::vec(prop_oneof![Just("A"), Just("B"), Just("bogus"), Just("a")], 0..10)
    ) {
        let factory = factory(sample_registry());
        let property = PropertyBuilder::new("e")
            .field("e", FieldExtractor::Enum)
            .enum_type(EnumType::new("AB", ["A", "B"]))
            .multiple()
            .build()
            .unwrap();
        let resolver = contentmap_core::LinkResolver::new("https://example.com/").unwrap();
        let ctx = ExtractionContext::new(
            &property,
            &factory,
            &contentmap_core::PassthroughRenderer,
            &resolver,
        );
        let field = Field::new("e", raw.iter().copied());

        let parsed: Vec<String> = FieldExtractor::Enum
            .extract(&field, &ctx)
            .unwrap()
            .iter()
            .filter_map(PropertyValue::as_enum)
            .map(|e| e.variant.clone())
            .collect();
        let expected: Vec<String> = raw
            .iter()
            .filter(|r| **r == "A" || **r == "B")
            .map(|r| r.to_string())
            .collect();
        prop_assert_eq!(parsed, expected);
    }
}
