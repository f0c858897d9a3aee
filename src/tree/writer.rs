use std::io::Cursor;

use quick_xml::escape::escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{format_number, Node, Value, ATTRIBUTE_PREFIX, CDATA_KEY, TEXT_KEY};
use crate::config::{GenerateOptions, Stylesheet};
use crate::error::FeedError;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Serializes a generated tree to an XML document string.
///
/// `root` holds the top-level element(s), normally a single entry such as
/// `rss` or `opml`. Mapping rules:
///
/// - `@name` entries become attributes of the enclosing element
/// - `#text` becomes escaped text content
/// - `#cdata` becomes a CDATA section (`]]>` inside is split across sections)
/// - a [`Value::List`] becomes repeated sibling elements with the same name
/// - a node with no content becomes a self-closing tag
/// - [`Value::Null`] is skipped
///
/// The output starts with an XML declaration followed by one
/// `xml-stylesheet` processing instruction per configured stylesheet.
pub fn write_document(root: &Node, options: &GenerateOptions) -> Result<String, FeedError> {
    let mut writer = if options.pretty {
        Writer::new_with_indent(Cursor::new(Vec::new()), b' ', options.indent)
    } else {
        Writer::new(Cursor::new(Vec::new()))
    };

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;

    for stylesheet in &options.stylesheets {
        let content = stylesheet_instruction(stylesheet);
        emit(&mut writer, Event::PI(BytesPI::new(content.as_str())))?;
    }

    for (name, value) in root.entries() {
        write_element(&mut writer, name, value)?;
    }

    let result = writer.into_inner().into_inner();
    String::from_utf8(result)
        .map_err(|e| FeedError::Write(format!("generated document is not UTF-8: {e}")))
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), FeedError> {
    writer
        .write_event(event)
        .map_err(|e| FeedError::Write(e.to_string()))
}

fn stylesheet_instruction(stylesheet: &Stylesheet) -> String {
    let mut content = format!(
        "xml-stylesheet type=\"{}\" href=\"{}\"",
        escape(stylesheet.kind.as_str()),
        escape(stylesheet.href.as_str())
    );
    if let Some(title) = &stylesheet.title {
        content.push_str(&format!(" title=\"{}\"", escape(title.as_str())));
    }
    if let Some(media) = &stylesheet.media {
        content.push_str(&format!(" media=\"{}\"", escape(media.as_str())));
    }
    content
}

fn write_element(writer: &mut XmlWriter, name: &str, value: &Value) -> Result<(), FeedError> {
    match value {
        Value::Null => Ok(()),
        Value::List(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        Value::Node(node) => write_node(writer, name, node),
        scalar => {
            let text = scalar_text(scalar).unwrap_or_default();
            if text.is_empty() {
                return emit(writer, Event::Empty(BytesStart::new(name)));
            }
            emit(writer, Event::Start(BytesStart::new(name)))?;
            emit(writer, Event::Text(BytesText::new(&text)))?;
            emit(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

fn write_node(writer: &mut XmlWriter, name: &str, node: &Node) -> Result<(), FeedError> {
    let mut start = BytesStart::new(name);
    for (key, value) in node.entries() {
        if let Some(attribute) = key.strip_prefix(ATTRIBUTE_PREFIX) {
            if let Some(text) = scalar_text(value) {
                start.push_attribute((attribute, text.as_str()));
            }
        }
    }

    let has_content = node
        .entries()
        .any(|(key, value)| !key.starts_with(ATTRIBUTE_PREFIX) && !value.is_null());
    if !has_content {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for (key, value) in node.entries() {
        if key.starts_with(ATTRIBUTE_PREFIX) {
            continue;
        }
        match key {
            TEXT_KEY => {
                if let Some(text) = scalar_text(value) {
                    emit(writer, Event::Text(BytesText::new(&text)))?;
                }
            }
            CDATA_KEY => {
                if let Some(text) = scalar_text(value) {
                    // A literal "]]>" would close the section early.
                    let split = text.replace("]]>", "]]]]><![CDATA[>");
                    emit(writer, Event::CData(BytesCData::new(split)))?;
                }
            }
            _ => write_element(writer, key, value)?,
        }
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Number(n) => Some(format_number(*n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact() -> GenerateOptions {
        GenerateOptions {
            pretty: false,
            ..GenerateOptions::default()
        }
    }

    fn cdata(text: &str) -> Value {
        Node::new().with(CDATA_KEY, Some(text)).into()
    }

    #[test]
    fn test_writes_attributes_text_and_children() {
        let channel = Node::new()
            .with("title", Some("A & B"))
            .with("ttl", Some(60.0));
        let rss = Node::new()
            .with("@version", Some("2.0"))
            .with("channel", Some(channel));
        let root = Node::new().with("rss", Some(rss));

        let xml = write_document(&root, &compact()).expect("Failed to write document");
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="utf-8"?><rss version="2.0"><channel><title>A &amp; B</title><ttl>60</ttl></channel></rss>"#
        );
    }

    #[test]
    fn test_list_becomes_repeated_elements() {
        let root = Node::new().with(
            "a",
            Some(Node::new().with("b", Some(Value::List(vec!["1".into(), "2".into()])))),
        );
        let xml = write_document(&root, &compact()).unwrap();
        assert!(xml.ends_with("<a><b>1</b><b>2</b></a>"), "{xml}");
    }

    #[test]
    fn test_cdata_marker_and_split() {
        let root = Node::new().with(
            "a",
            Some(
                Node::new()
                    .with("b", Some(cdata("<p>x</p>")))
                    .with("c", Some(cdata("a]]>b"))),
            ),
        );
        let xml = write_document(&root, &compact()).unwrap();
        assert!(xml.contains("<b><![CDATA[<p>x</p>]]></b>"), "{xml}");
        assert!(xml.contains("<c><![CDATA[a]]]]><![CDATA[>b]]></c>"), "{xml}");
    }

    #[test]
    fn test_attribute_only_node_self_closes() {
        let root = Node::new().with(
            "a",
            Some(Node::new().with("enclosure", Some(Node::new().with("@url", Some("u"))))),
        );
        let xml = write_document(&root, &compact()).unwrap();
        assert!(xml.contains(r#"<enclosure url="u"/>"#), "{xml}");
    }

    #[test]
    fn test_stylesheet_instructions() {
        let options = GenerateOptions {
            stylesheets: vec![Stylesheet {
                kind: "text/xsl".to_string(),
                href: "/style.xsl?a=1&b=2".to_string(),
                title: None,
                media: None,
            }],
            ..compact()
        };
        let root = Node::new().with("rss", Some(""));
        let xml = write_document(&root, &options).unwrap();
        assert!(
            xml.contains(r#"<?xml-stylesheet type="text/xsl" href="/style.xsl?a=1&amp;b=2"?>"#),
            "{xml}"
        );
    }

    #[test]
    fn test_pretty_output_keeps_text_inline() {
        let root = Node::new().with("a", Some(Node::new().with("b", Some("x"))));
        let xml = write_document(&root, &GenerateOptions::default()).unwrap();
        assert!(xml.contains("\n  <b>x</b>\n"), "{xml}");
    }
}
