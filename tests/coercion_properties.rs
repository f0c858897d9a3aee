//! Property tests for the field-level utilities every parser is built on.

use feedcraft::feeds::rss;
use feedcraft::namespaces::itunes;
use feedcraft::tree::{read_tree, Value};
use feedcraft::util::{
    decode_text, generate_cdata_string, parse_array_of, parse_number, parse_string,
    trim_array, trim_object,
};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (-1.0e9f64..1.0e9).prop_map(Value::Number),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::Text),
    ]
}

proptest! {
    #[test]
    fn prop_single_value_and_one_element_list_parse_alike(value in scalar()) {
        let list = Value::List(vec![value.clone()]);
        prop_assert_eq!(
            parse_array_of(Some(&value), parse_string),
            parse_array_of(Some(&list), parse_string)
        );
    }

    #[test]
    fn prop_trim_array_is_idempotent(items in proptest::collection::vec(proptest::option::of(0u8..10), 0..8)) {
        let once = trim_array(items);
        let twice = once.clone().and_then(|v| trim_array(v.into_iter().map(Some)));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_trim_object_is_idempotent(
        title in proptest::option::of("[a-z]{0,4}"),
        description in proptest::option::of("[a-z]{0,4}"),
        duration in proptest::option::of(0.0f64..7200.0),
    ) {
        let item = rss::Item {
            title,
            description,
            itunes: duration.map(|duration| itunes::Item {
                duration: Some(duration),
                ..Default::default()
            }),
            ..Default::default()
        };
        let once = trim_object(item.clone());
        prop_assert_eq!(once.is_none(), item == rss::Item::default());

        let twice = once.clone().and_then(trim_object);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_parse_string_is_trimmed_and_non_empty(text in "\\PC{0,40}") {
        if let Some(parsed) = parse_string(&Value::Text(text)) {
            prop_assert!(!parsed.is_empty());
            prop_assert_eq!(parsed.trim(), parsed.as_str());
        }
    }

    #[test]
    fn prop_parse_number_round_trips_integers(n in -1_000_000i64..1_000_000) {
        prop_assert_eq!(parse_number(&Value::Text(n.to_string())), Some(n as f64));
    }

    #[test]
    fn prop_cdata_output_reads_back_unchanged(text in "[a-z<>& ]{1,30}") {
        prop_assume!(!text.trim().is_empty());
        let generated = generate_cdata_string(Some(text.as_str())).unwrap();
        let wrapped = match generated {
            Value::Text(plain) => plain,
            Value::Node(_) => format!("<![CDATA[{text}]]>"),
            other => panic!("unexpected {other:?}"),
        };
        prop_assert_eq!(decode_text(&wrapped), text.trim());
    }

    #[test]
    fn prop_reader_never_panics(text in "\\PC{0,200}") {
        let _ = read_tree(&text, &[]);
    }
}
