//! Singular/array reconciliation.
//!
//! A child element that appears once in the source is a bare value in the
//! tree; one that repeats is a [`Value::List`]. These helpers accept either
//! shape so extractors never have to care.

use crate::tree::Value;

/// Applies `parse` to every element, wrapping a bare value as a one-element
/// list. Elements that fail to parse are dropped; `None` when nothing is left.
pub fn parse_array_of<T>(
    value: Option<&Value>,
    parse: impl Fn(&Value) -> Option<T>,
) -> Option<Vec<T>> {
    parse_array_of_limited(value, parse, None)
}

/// [`parse_array_of`] keeping at most `limit` parsed elements.
///
/// `Some(0)` yields `None` without parsing anything.
pub fn parse_array_of_limited<T>(
    value: Option<&Value>,
    parse: impl Fn(&Value) -> Option<T>,
    limit: Option<usize>,
) -> Option<Vec<T>> {
    let value = value?;
    let limit = limit.unwrap_or(usize::MAX);
    if limit == 0 {
        return None;
    }

    let items = value
        .iter_items()
        .filter_map(parse)
        .take(limit)
        .collect::<Vec<_>>();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Applies `parse` to the first element of a list, or to a bare value.
///
/// Singular elements duplicated in the wild resolve to the first one.
pub fn parse_singular_of<T>(value: Option<&Value>, parse: impl Fn(&Value) -> Option<T>) -> Option<T> {
    value.and_then(Value::first).and_then(parse)
}
