//! Per-field generation helpers.
//!
//! Each helper turns an optional typed value into an optional tree value;
//! `None` means "omit the field", so absent data never reaches the writer
//! as an empty element.

use std::collections::BTreeSet;

use crate::namespaces::NamespaceTable;
use crate::tree::{Node, Value, ATTRIBUTE_PREFIX, CDATA_KEY, TEXT_KEY};

/// Characters that force a CDATA section.
const MARKUP_CHARS: [char; 3] = ['<', '>', '&'];

fn needs_cdata(text: &str) -> bool {
    text.contains(MARKUP_CHARS)
}

/// A string as-is, or `None` when empty or whitespace-only.
pub fn generate_plain_string(value: Option<&str>) -> Option<Value> {
    let value = value?;
    if value.trim().is_empty() {
        None
    } else {
        Some(Value::Text(value.to_string()))
    }
}

/// A string as plain text, or wrapped for CDATA output when it contains
/// `<`, `>` or `&`. Empty and whitespace-only strings give `None`.
///
/// # Examples
///
/// ```
/// use feedcraft::tree::Value;
/// use feedcraft::util::generate_cdata_string;
///
/// assert_eq!(generate_cdata_string(Some("plain text")), Some(Value::from("plain text")));
/// assert!(matches!(generate_cdata_string(Some("a & b")), Some(Value::Node(_))));
/// assert_eq!(generate_cdata_string(Some("")), None);
/// ```
pub fn generate_cdata_string(value: Option<&str>) -> Option<Value> {
    let value = value?;
    if value.trim().is_empty() {
        return None;
    }
    if needs_cdata(value) {
        Some(Node::new().with(CDATA_KEY, Some(value)).into())
    } else {
        Some(Value::Text(value.to_string()))
    }
}

/// The same decision as [`generate_cdata_string`], returned as a keyed
/// entry for elements that carry attributes next to their text, e.g.
/// `<acast:signature key="..">text</acast:signature>`.
pub fn generate_text_or_cdata_string(value: Option<&str>) -> Option<(&'static str, Value)> {
    let value = value?;
    if value.trim().is_empty() {
        return None;
    }
    let key = if needs_cdata(value) { CDATA_KEY } else { TEXT_KEY };
    Some((key, Value::Text(value.to_string())))
}

/// Finite numbers only.
pub fn generate_number(value: Option<f64>) -> Option<Value> {
    value.filter(|n| n.is_finite()).map(Value::Number)
}

pub fn generate_boolean(value: Option<bool>) -> Option<Value> {
    value.map(Value::Bool)
}

/// `yes` / `no`, as the podcast namespaces expect.
pub fn generate_yes_no_boolean(value: Option<bool>) -> Option<Value> {
    value.map(|b| Value::from(if b { "yes" } else { "no" }))
}

/// Joins non-empty items with commas.
pub fn generate_csv_of<T: ToString>(values: Option<&[T]>) -> Option<Value> {
    let joined = values?
        .iter()
        .map(ToString::to_string)
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    generate_plain_string(Some(&joined))
}

/// Generates every element of a list; `None` when nothing survives.
pub fn generate_array_of<T>(
    values: Option<&[T]>,
    generate: impl Fn(&T) -> Option<Value>,
) -> Option<Value> {
    let items = values?.iter().filter_map(generate).collect::<Vec<_>>();
    if items.is_empty() {
        None
    } else {
        Some(Value::List(items))
    }
}

/// `xmlns:prefix` declarations for every known prefix used anywhere in a
/// generated tree, in prefix order.
pub fn generate_namespace_attrs(node: &Node, table: &NamespaceTable) -> Option<Node> {
    let mut prefixes = BTreeSet::new();
    collect_prefixes(node, &mut prefixes);

    let mut attrs = Node::new();
    for prefix in prefixes {
        if let Some(namespace) = table.get(&prefix) {
            if let Some(uri) = namespace.uris.first() {
                attrs.insert(format!("@xmlns:{prefix}"), Value::from(uri.as_str()));
            }
        }
    }
    attrs.trimmed()
}

fn collect_prefixes(node: &Node, prefixes: &mut BTreeSet<String>) {
    for (key, value) in node.entries() {
        let name = key.strip_prefix(ATTRIBUTE_PREFIX).unwrap_or(key);
        if !name.starts_with("xmlns") {
            if let Some((prefix, _)) = name.split_once(':') {
                prefixes.insert(prefix.to_string());
            }
        }
        for item in value.iter_items() {
            if let Value::Node(child) = item {
                collect_prefixes(child, prefixes);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_cdata_string_plain() {
        assert_eq!(
            generate_cdata_string(Some("plain text")),
            Some(Value::from("plain text"))
        );
    }

    #[test]
    fn test_generate_cdata_string_wraps_markup() {
        for input in ["a & b", "<p>x</p>", "1 > 0"] {
            let expected = Node::new().with(CDATA_KEY, Some(input));
            assert_eq!(
                generate_cdata_string(Some(input)),
                Some(Value::Node(expected)),
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_generate_cdata_string_empty() {
        assert_eq!(generate_cdata_string(Some("")), None);
        assert_eq!(generate_cdata_string(Some("  \n ")), None);
        assert_eq!(generate_cdata_string(None), None);
    }

    #[test]
    fn test_generate_text_or_cdata_string() {
        assert_eq!(
            generate_text_or_cdata_string(Some("abc")),
            Some((TEXT_KEY, Value::from("abc")))
        );
        assert_eq!(
            generate_text_or_cdata_string(Some("a<b")),
            Some((CDATA_KEY, Value::from("a<b")))
        );
        assert_eq!(generate_text_or_cdata_string(Some(" ")), None);
    }

    #[test]
    fn test_generate_scalars() {
        assert_eq!(generate_number(Some(f64::NAN)), None);
        assert_eq!(generate_number(Some(3.0)), Some(Value::Number(3.0)));
        assert_eq!(generate_boolean(Some(false)), Some(Value::Bool(false)));
        assert_eq!(generate_yes_no_boolean(Some(true)), Some(Value::from("yes")));
        assert_eq!(generate_yes_no_boolean(Some(false)), Some(Value::from("no")));
        assert_eq!(generate_plain_string(Some(" ")), None);
    }

    #[test]
    fn test_generate_csv_of() {
        let keywords = vec!["a".to_string(), " ".to_string(), "b".to_string()];
        assert_eq!(
            generate_csv_of(Some(keywords.as_slice())),
            Some(Value::from("a,b"))
        );
        assert_eq!(generate_csv_of(Some(&[1.0, 2.5][..])), Some(Value::from("1,2.5")));
        assert_eq!(generate_csv_of::<String>(Some(&[][..])), None);
    }

    #[test]
    fn test_generate_namespace_attrs_collects_nested_prefixes() {
        let item = Node::new()
            .with("dc:creator", Some("x"))
            .with("unknown:thing", Some("y"));
        let channel = Node::new()
            .with("itunes:author", Some("a"))
            .with("item", Some(Value::List(vec![Value::Node(item)])));

        let attrs = generate_namespace_attrs(&channel, NamespaceTable::standard())
            .expect("known prefixes should produce declarations");
        assert_eq!(
            attrs.keys().collect::<Vec<_>>(),
            vec!["@xmlns:dc", "@xmlns:itunes"]
        );
        assert_eq!(
            attrs.get("@xmlns:itunes"),
            Some(&Value::from("http://www.itunes.com/dtds/podcast-1.0.dtd"))
        );
    }
}
