use super::{Body, Head, Opml, Outline};
use crate::config::GenerateOptions;
use crate::error::{FeedError, Format};
use crate::tree::{write_document, Node, Value};
use crate::util::{
    generate_array_of, generate_boolean, generate_cdata_string, generate_csv_of, generate_number,
    generate_plain_string, generate_rfc822_date,
};

/// Exports an outline document as OPML 2.0.
///
/// Dates are written as RFC 822. Outline attributes use their canonical
/// camelCase spelling (`xmlUrl`, `isComment`); extras named in
/// [`GenerateOptions::extra_outline_attributes`] are emitted verbatim.
///
/// # Errors
///
/// - [`FeedError::MissingField`] when strict and the body has no outlines or
///   an outline at any depth lacks `text`
/// - [`FeedError::InvalidInput`] when no body can be generated, even when
///   lenient
/// - [`FeedError::Write`] when serialization fails
pub fn generate(opml: &Opml, options: &GenerateOptions) -> Result<String, FeedError> {
    if !options.lenient {
        validate(opml)?;
    }

    let generator = OutlineGenerator { options };
    let body = opml
        .body
        .as_ref()
        .and_then(|body| generator.generate_body(body))
        .ok_or(FeedError::InvalidInput(Format::Opml))?;

    let document = Node::new()
        .with("@version", Some("2.0"))
        .with("head", opml.head.as_ref().and_then(generate_head))
        .with("body", Some(body));

    write_document(&Node::new().with("opml", Some(document)), options)
}

fn missing(field: &'static str) -> FeedError {
    FeedError::MissingField {
        format: Format::Opml,
        field,
    }
}

fn validate(opml: &Opml) -> Result<(), FeedError> {
    let outlines = opml
        .body
        .as_ref()
        .and_then(|body| body.outlines.as_deref())
        .filter(|outlines| !outlines.is_empty())
        .ok_or_else(|| missing("body.outlines"))?;
    validate_outlines(outlines)
}

fn validate_outlines(outlines: &[Outline]) -> Result<(), FeedError> {
    for outline in outlines {
        if outline.text.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(missing("outline.text"));
        }
        if let Some(children) = outline.outlines.as_deref() {
            validate_outlines(children)?;
        }
    }
    Ok(())
}

fn generate_head(head: &Head) -> Option<Value> {
    let cdata = |value: &Option<String>| generate_cdata_string(value.as_deref());

    Node::new()
        .with("title", cdata(&head.title))
        .with("dateCreated", generate_rfc822_date(head.date_created.as_ref()))
        .with("dateModified", generate_rfc822_date(head.date_modified.as_ref()))
        .with("ownerName", cdata(&head.owner_name))
        .with("ownerEmail", cdata(&head.owner_email))
        .with("ownerId", cdata(&head.owner_id))
        .with("docs", cdata(&head.docs))
        .with("expansionState", generate_csv_of(head.expansion_state.as_deref()))
        .with("vertScrollState", generate_number(head.vert_scroll_state))
        .with("windowTop", generate_number(head.window_top))
        .with("windowLeft", generate_number(head.window_left))
        .with("windowBottom", generate_number(head.window_bottom))
        .with("windowRight", generate_number(head.window_right))
        .into_value()
}

struct OutlineGenerator<'o> {
    options: &'o GenerateOptions,
}

impl OutlineGenerator<'_> {
    fn generate_body(&self, body: &Body) -> Option<Node> {
        Node::new()
            .with(
                "outline",
                generate_array_of(body.outlines.as_deref(), |o| self.generate_outline(o)),
            )
            .trimmed()
    }

    fn generate_outline(&self, outline: &Outline) -> Option<Value> {
        let plain = |value: &Option<String>| generate_plain_string(value.as_deref());

        let mut node = Node::new()
            .with("@text", plain(&outline.text))
            .with("@type", plain(&outline.kind))
            .with("@isComment", generate_boolean(outline.is_comment))
            .with("@isBreakpoint", generate_boolean(outline.is_breakpoint))
            .with("@created", generate_rfc822_date(outline.created.as_ref()))
            .with("@category", plain(&outline.category))
            .with("@description", plain(&outline.description))
            .with("@xmlUrl", plain(&outline.xml_url))
            .with("@htmlUrl", plain(&outline.html_url))
            .with("@language", plain(&outline.language))
            .with("@title", plain(&outline.title))
            .with("@version", plain(&outline.version))
            .with("@url", plain(&outline.url));

        for name in &self.options.extra_outline_attributes {
            let value = outline.extras.get(name).map(String::as_str);
            node = node.with(&format!("@{name}"), generate_plain_string(value));
        }

        node.with(
            "outline",
            generate_array_of(outline.outlines.as_deref(), |o| self.generate_outline(o)),
        )
        .into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;
    use crate::opml::parse;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn outline(text: &str, xml_url: &str) -> Outline {
        Outline {
            text: Some(text.to_string()),
            kind: Some("rss".to_string()),
            xml_url: Some(xml_url.to_string()),
            ..Default::default()
        }
    }

    fn sample() -> Opml {
        Opml {
            head: Some(Head {
                title: Some("Subscriptions".to_string()),
                date_created: Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()),
                expansion_state: Some(vec![1.0, 3.0]),
                ..Default::default()
            }),
            body: Some(Body {
                outlines: Some(vec![
                    outline("Example Blog", "https://example.com/feed.xml"),
                    Outline {
                        text: Some("Folder".to_string()),
                        outlines: Some(vec![outline("Tom & Jerry", "https://tj.example/rss")]),
                        ..Default::default()
                    },
                ]),
            }),
        }
    }

    #[test]
    fn test_generate_document_shape() {
        let xml = generate(&sample(), &GenerateOptions::default()).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(r#"<opml version="2.0">"#));
        assert!(xml.contains("<dateCreated>Fri, 01 Mar 2024 08:00:00 GMT</dateCreated>"));
        assert!(xml.contains("<expansionState>1,3</expansionState>"));
        assert!(xml.contains(
            r#"<outline text="Example Blog" type="rss" xmlUrl="https://example.com/feed.xml"/>"#
        ));
        assert!(xml.contains(r#"text="Tom &amp; Jerry""#));
    }

    #[test]
    fn test_round_trip() {
        let opml = sample();
        let xml = generate(&opml, &GenerateOptions::default()).unwrap();
        let parsed = parse(&xml, &ParseOptions::default()).unwrap();
        assert_eq!(parsed, opml);
    }

    #[test]
    fn test_extra_outline_attributes_round_trip() {
        let mut opml = sample();
        if let Some(outlines) = opml.body.as_mut().and_then(|b| b.outlines.as_mut()) {
            outlines[0].extras = BTreeMap::from([("customAttr".to_string(), "v".to_string())]);
        }
        let generate_options = GenerateOptions {
            extra_outline_attributes: vec!["customAttr".to_string()],
            ..Default::default()
        };
        let xml = generate(&opml, &generate_options).unwrap();
        assert!(xml.contains(r#"customAttr="v""#));

        let parse_options = ParseOptions {
            extra_outline_attributes: vec!["customAttr".to_string()],
            ..Default::default()
        };
        assert_eq!(parse(&xml, &parse_options).unwrap(), opml);
    }

    #[test]
    fn test_strict_requires_outline_text_at_any_depth() {
        let mut opml = sample();
        if let Some(outlines) = opml.body.as_mut().and_then(|b| b.outlines.as_mut()) {
            outlines[1].outlines = Some(vec![Outline {
                xml_url: Some("https://no-text.example".to_string()),
                ..Default::default()
            }]);
        }
        assert!(matches!(
            generate(&opml, &GenerateOptions::default()),
            Err(FeedError::MissingField { field: "outline.text", .. })
        ));

        let lenient = GenerateOptions {
            lenient: true,
            ..Default::default()
        };
        assert!(generate(&opml, &lenient).is_ok());
    }

    #[test]
    fn test_missing_body() {
        let opml = Opml {
            head: sample().head,
            body: None,
        };
        assert!(matches!(
            generate(&opml, &GenerateOptions::default()),
            Err(FeedError::MissingField { field: "body.outlines", .. })
        ));

        let lenient = GenerateOptions {
            lenient: true,
            ..Default::default()
        };
        assert!(matches!(
            generate(&opml, &lenient),
            Err(FeedError::InvalidInput(Format::Opml))
        ));
    }
}
