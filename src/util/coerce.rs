//! Field-level coercion from untyped tree values.
//!
//! Every function here returns `None` instead of failing: a malformed field
//! is dropped from the result and never aborts a whole-document parse.

use std::collections::BTreeSet;

use crate::tree::{format_number, Node, Value, ATTRIBUTE_PREFIX, TEXT_KEY};
use crate::util::text::decode_text;

/// Coerces a scalar to a non-empty trimmed string.
///
/// Text has CDATA unwrapped and entities decoded. Numbers and booleans are
/// stringified. Nodes, lists and whitespace-only text give `None`.
pub fn parse_string(value: &Value) -> Option<String> {
    match value {
        Value::Text(raw) => {
            let text = decode_text(raw);
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        Value::Number(n) if n.is_finite() => Some(format_number(*n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerces a number or numeric string. Rejects `NaN`, infinities and
/// anything that is not entirely numeric after trimming.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => *n,
        Value::Text(_) => parse_string(value)?.parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Accepts real booleans and the strings `true`/`false` in any case.
pub fn parse_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Text(_) => {
            let text = parse_string(value)?;
            if text.eq_ignore_ascii_case("true") {
                Some(true)
            } else if text.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Like [`parse_boolean`] but also accepts `yes`/`no`, the encoding used by
/// the iTunes and related podcast namespaces.
pub fn parse_yes_no_boolean(value: &Value) -> Option<bool> {
    if let Some(b) = parse_boolean(value) {
        return Some(b);
    }
    let text = parse_string(value)?;
    if text.eq_ignore_ascii_case("yes") {
        Some(true)
    } else if text.eq_ignore_ascii_case("no") {
        Some(false)
    } else {
        None
    }
}

/// The text-bearing part of a value: `#text` of an element that also has
/// attributes or children, otherwise the value itself.
pub fn retrieve_text(value: &Value) -> Option<&Value> {
    match value {
        Value::Node(node) => node.get(TEXT_KEY),
        Value::Null => None,
        other => Some(other),
    }
}

pub fn parse_text_string(value: &Value) -> Option<String> {
    retrieve_text(value).and_then(parse_string)
}

pub fn parse_text_number(value: &Value) -> Option<f64> {
    retrieve_text(value).and_then(parse_number)
}

/// Splits a comma-separated text value and coerces each piece.
pub fn parse_csv_of<T>(value: &Value, parse: impl Fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    let text = parse_text_string(value)?;
    let items = text
        .split(',')
        .filter_map(|piece| parse(&Value::Text(piece.to_string())))
        .collect::<Vec<_>>();
    trim_array(items.into_iter().map(Some))
}

/// `None` when the value equals its type's default, i.e. every optional
/// field ended up absent.
pub fn trim_object<T: Default + PartialEq>(value: T) -> Option<T> {
    if value == T::default() {
        None
    } else {
        Some(value)
    }
}

/// Drops absent entries; `None` instead of an empty list.
pub fn trim_array<T>(values: impl IntoIterator<Item = Option<T>>) -> Option<Vec<T>> {
    let items = values.into_iter().flatten().collect::<Vec<_>>();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Canonical namespace prefixes used by a node's element and attribute keys.
///
/// Run on a normalized tree, so `xmlns` declarations are skipped and only
/// prefixes that survived normalization are reported.
pub fn detect_namespaces(node: &Node) -> BTreeSet<String> {
    node.keys()
        .filter(|key| !key.starts_with("@xmlns"))
        .filter_map(|key| {
            let name = key.strip_prefix(ATTRIBUTE_PREFIX).unwrap_or(key);
            name.split_once(':').map(|(prefix, _)| prefix.to_string())
        })
        .collect()
}
