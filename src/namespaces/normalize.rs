use std::borrow::Cow;
use std::collections::HashMap;

use super::{Namespace, NamespaceTable};
use crate::tree::{Node, Value, ATTRIBUTE_PREFIX};

/// In-scope prefix declarations: document prefix → canonical prefix.
type Scope = HashMap<String, String>;

/// Rewrites a raw tree into its normalized form.
///
/// For every element and attribute key:
///
/// 1. The whole key is lower-cased.
/// 2. A prefix bound by an in-scope `xmlns:prefix="uri"` declaration to a
///    known URI becomes that namespace's canonical prefix. This makes any
///    made-up alias for a known URI normalize identically.
/// 3. Otherwise the prefix is matched case-insensitively against the
///    canonical and alternate prefixes in the table.
/// 4. Unknown prefixes are kept (lower-cased) so unrecognized extensions
///    survive for pass-through.
///
/// Unprefixed keys are only lower-cased; a default `xmlns` does not move
/// them into a namespace. Declarations themselves are rewritten as well,
/// `@xmlns:podcastz` bound to the iTunes URI becomes `@xmlns:itunes`.
///
/// With a restriction, only prefixes resolving to that one namespace are
/// rewritten.
#[derive(Debug, Clone, Copy)]
pub struct NamespaceNormalizer<'t> {
    table: &'t NamespaceTable,
    restrict: Restrict<'t>,
}

/// Which namespaces get their prefixes rewritten.
#[derive(Debug, Clone, Copy)]
enum Restrict<'t> {
    All,
    Only(&'t Namespace),
    /// The restriction named a namespace the table does not know.
    Nothing,
}

impl<'t> NamespaceNormalizer<'t> {
    pub fn new(table: &'t NamespaceTable) -> Self {
        Self {
            table,
            restrict: Restrict::All,
        }
    }

    /// A normalizer that only rewrites prefixes of the namespace whose
    /// canonical prefix is `prefix`. An unknown `prefix` yields a normalizer
    /// that rewrites nothing but case.
    pub fn restricted(table: &'t NamespaceTable, prefix: &str) -> Self {
        let restrict = match table.get(prefix) {
            Some(namespace) => Restrict::Only(namespace),
            None => Restrict::Nothing,
        };
        Self { table, restrict }
    }

    /// Normalizes a whole document or subtree.
    pub fn normalize(&self, node: &Node) -> Node {
        self.normalize_node(node, &Scope::new())
    }

    pub fn normalize_value(&self, value: &Value) -> Value {
        match value {
            Value::Node(node) => Value::Node(self.normalize(node)),
            Value::List(items) => {
                Value::List(items.iter().map(|item| self.normalize_value(item)).collect())
            }
            other => other.clone(),
        }
    }

    fn normalize_node(&self, node: &Node, scope: &Scope) -> Node {
        let mut out = Node::new();
        for (key, value) in node.entries() {
            if let Some(attribute) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                let name = self.rename_attribute(attribute, value, scope);
                out.insert(format!("{ATTRIBUTE_PREFIX}{name}"), value.clone());
                continue;
            }
            if key.starts_with('#') {
                out.append(key, value.clone());
                continue;
            }

            // Each repeated element may carry its own declarations.
            for item in value.iter_items() {
                match item {
                    Value::Node(child) => {
                        let child_scope = self.scope_for(child, scope);
                        let name = self.rename(key, &child_scope);
                        out.append(name, Value::Node(self.normalize_node(child, &child_scope)));
                    }
                    other => out.append(self.rename(key, scope), other.clone()),
                }
            }
        }
        out
    }

    fn scope_for<'s>(&self, node: &Node, parent: &'s Scope) -> Cow<'s, Scope> {
        let declarations = node
            .entries()
            .filter_map(|(key, value)| {
                let declared = key.strip_prefix("@xmlns:")?;
                let namespace = self.table.resolve_uri(value.as_str()?)?;
                Some((declared.to_ascii_lowercase(), namespace.prefix.clone()))
            })
            .collect::<Vec<_>>();

        if declarations.is_empty() {
            return Cow::Borrowed(parent);
        }
        let mut scope = parent.clone();
        scope.extend(declarations);
        Cow::Owned(scope)
    }

    fn rename_attribute(&self, attribute: &str, value: &Value, scope: &Scope) -> String {
        let lower = attribute.to_ascii_lowercase();
        if let Some(declared) = lower.strip_prefix("xmlns:") {
            let canonical = value
                .as_str()
                .and_then(|uri| self.table.resolve_uri(uri))
                .filter(|namespace| self.allows(namespace));
            return match canonical {
                Some(namespace) => format!("xmlns:{}", namespace.prefix),
                None => format!("xmlns:{declared}"),
            };
        }
        self.rename(&lower, scope)
    }

    fn rename(&self, key: &str, scope: &Scope) -> String {
        let lower = key.to_ascii_lowercase();
        let Some((prefix, local)) = lower.split_once(':') else {
            return lower;
        };

        let canonical = match scope.get(prefix) {
            Some(canonical) => self.table.get(canonical),
            None => self.table.resolve_prefix(prefix),
        };
        match canonical.filter(|namespace| self.allows(namespace)) {
            Some(namespace) => format!("{}:{}", namespace.prefix, local),
            None => lower,
        }
    }

    fn allows(&self, namespace: &Namespace) -> bool {
        match self.restrict {
            Restrict::All => true,
            Restrict::Only(only) => only.prefix == namespace.prefix,
            Restrict::Nothing => false,
        }
    }
}

/// Function-style constructor: returns a closure mapping a raw tree to its
/// normalized form, optionally restricted to one namespace.
pub fn create_namespace_normalizator<'t>(
    table: &'t NamespaceTable,
    restrict_to: Option<&str>,
) -> impl Fn(&Value) -> Value + 't {
    let normalizer = match restrict_to {
        Some(prefix) => NamespaceNormalizer::restricted(table, prefix),
        None => NamespaceNormalizer::new(table),
    };
    move |tree: &Value| normalizer.normalize_value(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::read_tree;
    use pretty_assertions::assert_eq;

    fn normalize(xml: &str) -> Node {
        let raw = read_tree(xml, &[]).expect("Failed to read test document");
        NamespaceNormalizer::new(NamespaceTable::standard()).normalize(&raw)
    }

    fn channel(doc: &Node) -> &Node {
        doc.get("rss")
            .and_then(Value::as_node)
            .and_then(|rss| rss.get("channel"))
            .and_then(Value::as_node)
            .expect("document should have rss.channel")
    }

    #[test]
    fn test_lowercases_all_keys() {
        let doc = normalize(r#"<RSS Version="2.0"><Channel><Title>T</Title></Channel></RSS>"#);
        let rss = doc.get("rss").and_then(Value::as_node).unwrap();
        assert_eq!(rss.get("@version"), Some(&Value::from("2.0")));
        assert_eq!(channel(&doc).get("title"), Some(&Value::from("T")));
    }

    #[test]
    fn test_alias_invariance_by_declared_uri() {
        let conventional = normalize(
            r#"<rss xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd"><channel><itunes:author>A</itunes:author></channel></rss>"#,
        );
        let unconventional = normalize(
            r#"<rss xmlns:podcastz="http://www.itunes.com/dtds/podcast-1.0.dtd"><channel><podcastz:author>A</podcastz:author></channel></rss>"#,
        );
        assert_eq!(conventional, unconventional);
        assert_eq!(channel(&conventional).get("itunes:author"), Some(&Value::from("A")));
    }

    #[test]
    fn test_known_alias_without_declaration() {
        let doc = normalize(r#"<rss><channel><a10:link href="x"/><ITUNES:Author>A</ITUNES:Author></channel></rss>"#);
        let channel = channel(&doc);
        assert!(channel.contains_key("atom:link"));
        assert!(channel.contains_key("itunes:author"));
    }

    #[test]
    fn test_unknown_prefix_kept_lowercased() {
        let doc = normalize(r#"<rss><channel><Custom:Thing>x</Custom:Thing></channel></rss>"#);
        assert_eq!(channel(&doc).get("custom:thing"), Some(&Value::from("x")));
    }

    #[test]
    fn test_attributes_renamed_independently() {
        let doc = normalize(
            r#"<rss xmlns:m="http://search.yahoo.com/mrss/"><channel><item><link M:Rel="x" Href="y">z</link></item></channel></rss>"#,
        );
        let link = channel(&doc)
            .get("item")
            .and_then(Value::as_node)
            .and_then(|item| item.get("link"))
            .and_then(Value::as_node)
            .unwrap();
        assert_eq!(link.get("@media:rel"), Some(&Value::from("x")));
        assert_eq!(link.get("@href"), Some(&Value::from("y")));
    }

    #[test]
    fn test_declaration_scoped_to_element() {
        let doc = normalize(
            r#"<rss><channel><x:author xmlns:x="http://purl.org/dc/elements/1.1/">A</x:author><x:other>B</x:other></channel></rss>"#,
        );
        let channel = channel(&doc);
        assert!(channel.contains_key("dc:author"));
        assert!(channel.contains_key("x:other"));
    }

    #[test]
    fn test_collision_after_rewrite_merges_into_list() {
        let doc = normalize(
            r#"<rss xmlns:a="http://purl.org/dc/elements/1.1/"><channel><dc:creator>A</dc:creator><a:creator>B</a:creator></channel></rss>"#,
        );
        assert_eq!(
            channel(&doc).get("dc:creator"),
            Some(&Value::List(vec!["A".into(), "B".into()]))
        );
    }

    #[test]
    fn test_restricted_normalizer_only_touches_one_namespace() {
        let raw = read_tree(
            r#"<rss><channel><a10:link/><ITUNES:author>A</ITUNES:author></channel></rss>"#,
            &[],
        )
        .unwrap();
        let normalize = create_namespace_normalizator(NamespaceTable::standard(), Some("itunes"));
        let doc = normalize(&Value::Node(raw));
        let channel = doc
            .as_node()
            .and_then(|d| d.get("rss"))
            .and_then(Value::as_node)
            .and_then(|rss| rss.get("channel"))
            .and_then(Value::as_node)
            .unwrap();
        assert!(channel.contains_key("itunes:author"));
        assert!(channel.contains_key("a10:link"));
    }

    #[test]
    fn test_unknown_restriction_only_lowercases() {
        let raw = read_tree(
            r#"<rss xmlns:x="http://purl.org/dc/elements/1.1/"><channel><a10:link/><ITUNES:author>A</ITUNES:author><x:creator>C</x:creator></channel></rss>"#,
            &[],
        )
        .unwrap();
        let normalize = create_namespace_normalizator(NamespaceTable::standard(), Some("bogus"));
        let doc = normalize(&Value::Node(raw));
        let rss = doc
            .as_node()
            .and_then(|d| d.get("rss"))
            .and_then(Value::as_node)
            .unwrap();
        assert_eq!(rss.get("@xmlns:x"), Some(&Value::from("http://purl.org/dc/elements/1.1/")));
        let channel = rss.get("channel").and_then(Value::as_node).unwrap();
        assert_eq!(
            channel.keys().collect::<Vec<_>>(),
            vec!["a10:link", "itunes:author", "x:creator"]
        );
    }
}
