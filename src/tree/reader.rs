use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Node, Value, ATTRIBUTE_PREFIX, TEXT_KEY};
use crate::error::FeedError;

/// SEC-003: Maximum allowed element nesting depth.
/// Prevents stack exhaustion from maliciously crafted deeply nested documents.
pub const MAX_TREE_DEPTH: usize = 64;

/// An element whose start tag has been read but not its end tag.
struct Frame {
    name: String,
    path: String,
    node: Node,
    text: String,
    /// `xmlns:prefix` declarations made on this element, prefix lower-cased.
    bindings: Vec<(String, String)>,
}

/// Tokenizes markup into a raw [`Node`] tree.
///
/// The returned node is the document itself: its entries are the top-level
/// elements (normally exactly one). Element and attribute names keep their
/// source spelling; lower-casing and prefix rewriting happen later in
/// namespace normalization.
///
/// Text and attribute values are kept raw. Entity references are not decoded
/// here and CDATA sections are preserved as literal `<![CDATA[...]]>`
/// segments, so later coercion can tell the two apart. Whitespace-only text
/// is dropped. An element carrying nothing but text collapses to a bare
/// [`Value::Text`].
///
/// `stop_nodes` lists lower-case dotted element paths (for example
/// `rss.channel.item.description`) whose inner markup is captured verbatim
/// as text instead of being decomposed further. Path segments are the
/// lower-cased element names as written; use [`read_tree_with`] to compare
/// them in another spelling.
///
/// # Errors
///
/// - [`FeedError::Xml`] for malformed markup, mismatched or missing end tags
/// - [`FeedError::MaxDepthExceeded`] when nesting passes [`MAX_TREE_DEPTH`]
///
/// # Security
///
/// SEC-002: quick-xml (0.37) never parses `<!ENTITY>` declarations from the
/// DOCTYPE and this reader never unescapes, so `&xxe;` style references stay
/// literal text all the way through.
pub fn read_tree(xml: &str, stop_nodes: &[&str]) -> Result<Node, FeedError> {
    read_tree_with(xml, stop_nodes, |name, _| name.to_ascii_lowercase())
}

/// Like [`read_tree`], but each stop-node path segment is produced by
/// `segment(name, uri)`, where `uri` is the in-scope `xmlns:` binding of the
/// element's prefix, if any. The tree itself keeps source spelling.
pub fn read_tree_with<F>(xml: &str, stop_nodes: &[&str], segment: F) -> Result<Node, FeedError>
where
    F: Fn(&str, Option<&str>) -> String,
{
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut document = Node::new();
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                // SEC-003: Reject excessively nested documents
                if stack.len() >= MAX_TREE_DEPTH {
                    return Err(FeedError::MaxDepthExceeded(MAX_TREE_DEPTH));
                }

                let name = element_name(&e);
                let node = read_attributes(&e);
                let bindings = prefix_bindings(&node);
                let uri = bound_uri(&name, &bindings, &stack);
                let step = segment(&name, uri);
                let path = match stack.last() {
                    Some(parent) => format!("{}.{}", parent.path, step),
                    None => step,
                };

                if stop_nodes.iter().any(|stop| *stop == path) {
                    let span = reader.read_to_end(e.name())?;
                    let raw = xml
                        .get(span.start as usize..span.end as usize)
                        .unwrap_or_default();
                    let value = finish_element(node, raw.to_string());
                    attach(&mut stack, &mut document, name, value);
                } else {
                    stack.push(Frame {
                        name,
                        path,
                        node,
                        text: String::new(),
                        bindings,
                    });
                }
            }
            Ok(Event::Empty(e)) => {
                if stack.len() >= MAX_TREE_DEPTH {
                    return Err(FeedError::MaxDepthExceeded(MAX_TREE_DEPTH));
                }
                let name = element_name(&e);
                let value = finish_element(read_attributes(&e), String::new());
                attach(&mut stack, &mut document, name, value);
            }
            Ok(Event::Text(t)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str("<![CDATA[");
                    frame.text.push_str(&String::from_utf8_lossy(&c));
                    frame.text.push_str("]]>");
                }
            }
            Ok(Event::End(_)) => {
                // quick-xml has already verified the end tag matches the open element.
                if let Some(frame) = stack.pop() {
                    let value = finish_element(frame.node, frame.text);
                    attach(&mut stack, &mut document, frame.name, value);
                }
            }
            Ok(Event::Eof) => {
                if let Some(open) = stack.last() {
                    return Err(FeedError::Xml(format!(
                        "unexpected end of document inside <{}>",
                        open.name
                    )));
                }
                break;
            }
            Err(e) => return Err(FeedError::Xml(e.to_string())),
            // Declarations, processing instructions, comments and DOCTYPE carry no content
            Ok(_) => {}
        }
    }

    Ok(document)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn read_attributes(e: &BytesStart<'_>) -> Node {
    let mut node = Node::new();
    for attr_result in e.attributes().with_checks(false) {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed attribute");
                continue;
            }
        };
        let key = String::from_utf8_lossy(attr.key.as_ref());
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        node.insert(format!("{ATTRIBUTE_PREFIX}{key}"), Value::Text(value));
    }
    node
}

fn prefix_bindings(node: &Node) -> Vec<(String, String)> {
    node.entries()
        .filter_map(|(key, value)| {
            let prefix = key.strip_prefix("@xmlns:")?;
            Some((prefix.to_ascii_lowercase(), value.as_str()?.to_string()))
        })
        .collect()
}

/// The URI bound to `name`'s prefix, searching the element's own
/// declarations before its ancestors'.
fn bound_uri<'a>(
    name: &str,
    own: &'a [(String, String)],
    stack: &'a [Frame],
) -> Option<&'a str> {
    let (prefix, _) = name.split_once(':')?;
    let prefix = prefix.to_ascii_lowercase();
    std::iter::once(own)
        .chain(stack.iter().rev().map(|frame| frame.bindings.as_slice()))
        .flat_map(|bindings| bindings.iter())
        .find(|(declared, _)| *declared == prefix)
        .map(|(_, uri)| uri.as_str())
}

fn finish_element(mut node: Node, text: String) -> Value {
    if !text.trim().is_empty() {
        if node.is_empty() {
            return Value::Text(text);
        }
        node.append(TEXT_KEY, Value::Text(text));
    }
    if node.is_empty() {
        Value::Text(String::new())
    } else {
        Value::Node(node)
    }
}

fn attach(stack: &mut [Frame], document: &mut Node, name: String, value: Value) {
    match stack.last_mut() {
        Some(parent) => parent.node.append(name, value),
        None => document.append(name, value),
    }
}
