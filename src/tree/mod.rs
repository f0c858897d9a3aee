//! Untyped document tree shared by every format.
//!
//! The XML reader and the JSON conversion both produce a [`Value`]; every
//! extractor consumes it and every generator produces one for the writer.
//!
//! Key conventions inside a [`Node`]:
//!
//! - `@name` - an attribute
//! - `#text` - text content of an element that also has attributes or children
//! - `#cdata` - generation-side marker asking the writer for a CDATA section
//! - anything else - a child element (or JSON object member)
//!
//! A repeated child element is stored once as a [`Value::List`]. The same
//! element appearing only once is stored bare, so consumers have to accept
//! both shapes (see [`crate::util::parse_array_of`]).

mod json;
mod reader;
mod writer;

pub use json::format_number;
pub use reader::{read_tree, read_tree_with, MAX_TREE_DEPTH};
pub use writer::write_document;

/// Key holding element text content.
pub const TEXT_KEY: &str = "#text";
/// Key marking a value the writer must emit as CDATA.
pub const CDATA_KEY: &str = "#cdata";
/// Prefix that distinguishes attribute keys from child element keys.
pub const ATTRIBUTE_PREFIX: char = '@';

/// A single slot in the tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Node(Node),
    List(Vec<Value>),
}

impl Value {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Iterates a slot as a list: a bare value yields itself once, a list
    /// yields its elements and `Null` yields nothing.
    pub fn iter_items(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Value::Null => Box::new(std::iter::empty()),
            Value::List(items) => Box::new(items.iter()),
            other => Box::new(std::iter::once(other)),
        }
    }

    /// First element of a list, or the value itself.
    pub fn first(&self) -> Option<&Value> {
        match self {
            Value::Null => None,
            Value::List(items) => items.first(),
            other => Some(other),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// An element or object: insertion-ordered key/value entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    entries: Vec<(String, Value)>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Adds a value under `key`. A key that is already present becomes a
    /// list holding the previous value(s) followed by the new one.
    pub fn append(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => match existing {
                Value::List(items) => items.push(value),
                _ => {
                    let previous = std::mem::take(existing);
                    *existing = Value::List(vec![previous, value]);
                }
            },
            None => self.entries.push((key, value)),
        }
    }

    /// Sets `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style insert that skips absent values.
    pub fn with<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(key, value.into());
        }
        self
    }

    /// Builder-style insert of a pre-keyed entry such as the result of
    /// [`crate::util::generate_text_or_cdata_string`].
    pub fn with_entry(mut self, entry: Option<(&str, Value)>) -> Self {
        if let Some((key, value)) = entry {
            self.insert(key, value);
        }
        self
    }

    /// Spreads another node's entries into this one, in order.
    pub fn merge(mut self, other: Option<Node>) -> Self {
        if let Some(other) = other {
            for (key, value) in other.entries {
                self.insert(key, value);
            }
        }
        self
    }

    /// The node itself, or `None` when it ended up without entries.
    pub fn trimmed(self) -> Option<Node> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Like [`Node::trimmed`] but wrapped as a [`Value`].
    pub fn into_value(self) -> Option<Value> {
        self.trimmed().map(Value::Node)
    }
}

impl FromIterator<(String, Value)> for Node {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut node = Node::new();
        for (key, value) in iter {
            node.append(key, value);
        }
        node
    }
}

impl IntoIterator for Node {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Read-only view over a [`Node`] that resolves keys without regard to
/// ASCII case. An exact match wins over a case-folded one.
///
/// Used for JSON-shaped documents, which unlike XML trees are not
/// lower-cased by namespace normalization.
#[derive(Debug, Clone, Copy)]
pub struct CaseInsensitive<'a> {
    node: &'a Node,
}

impl<'a> CaseInsensitive<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self { node }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.node.get(key).or_else(|| {
            self.node
                .entries
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_promotes_repeated_key_to_list() {
        let mut node = Node::new();
        node.append("item", Value::from("a"));
        node.append("item", Value::from("b"));
        node.append("item", Value::from("c"));

        assert_eq!(node.len(), 1);
        assert_eq!(
            node.get("item"),
            Some(&Value::List(vec!["a".into(), "b".into(), "c".into()]))
        );
    }

    #[test]
    fn test_iter_items_treats_bare_value_as_single_item() {
        let bare = Value::from("x");
        assert_eq!(bare.iter_items().count(), 1);
        assert_eq!(Value::Null.iter_items().count(), 0);
        assert_eq!(Value::List(vec![]).iter_items().count(), 0);
    }

    #[test]
    fn test_with_skips_none() {
        let node = Node::new()
            .with("title", Some("T"))
            .with::<&str>("link", None);
        assert_eq!(node.keys().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_trimmed_empty_node_is_none() {
        assert!(Node::new().trimmed().is_none());
        assert!(Node::new().into_value().is_none());
    }

    #[test]
    fn test_case_insensitive_prefers_exact_match() {
        let mut node = Node::new();
        node.append("StartTime", Value::Number(1.0));
        node.append("startTime", Value::Number(2.0));
        let view = CaseInsensitive::new(&node);

        assert_eq!(view.get("startTime"), Some(&Value::Number(2.0)));
        assert_eq!(view.get("STARTTIME"), Some(&Value::Number(1.0)));
        assert_eq!(view.get("missing"), None);
    }
}
