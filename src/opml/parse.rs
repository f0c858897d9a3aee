use std::collections::BTreeMap;

use super::{Body, Head, Opml, Outline};
use crate::config::ParseOptions;
use crate::error::{FeedError, Format};
use crate::namespaces::{NamespaceNormalizer, NamespaceTable};
use crate::tree::{read_tree, CaseInsensitive, Value};
use crate::util::{
    parse_array_of, parse_array_of_limited, parse_boolean, parse_csv_of, parse_date_value,
    parse_number, parse_singular_of, parse_string, parse_text_number, parse_text_string,
    trim_object,
};

const STOP_NODES: &[&str] = &[
    "opml.head.title",
    "opml.head.ownername",
    "opml.head.owneremail",
    "opml.head.ownerid",
    "opml.head.docs",
];

/// Parses an OPML document.
///
/// Outline attributes are matched case-insensitively, so `xmlUrl`,
/// `xmlurl` and `XMLURL` are all read as [`Outline::xml_url`]. Attributes
/// named in [`ParseOptions::extra_outline_attributes`] land in
/// [`Outline::extras`]. `max_items` caps the top-level outlines only.
///
/// # Errors
///
/// - [`FeedError::InvalidInput`] when there is no `opml` root or no `body`
/// - [`FeedError::Xml`] for malformed markup
/// - [`FeedError::MaxDepthExceeded`] for outlines nested past the safety
///   limit
///
/// # Security
///
/// Entity references are never expanded from a DTD, so XXE payloads stay
/// inert text.
pub fn parse(xml: &str, options: &ParseOptions) -> Result<Opml, FeedError> {
    let raw = read_tree(xml, STOP_NODES)?;
    let document = NamespaceNormalizer::new(NamespaceTable::standard()).normalize(&raw);

    let root = document
        .get("opml")
        .and_then(Value::first)
        .and_then(Value::as_node)
        .ok_or(FeedError::InvalidInput(Format::Opml))?;
    let body = root
        .get("body")
        .and_then(Value::first)
        .ok_or(FeedError::InvalidInput(Format::Opml))?;

    let parser = OutlineParser { options };
    let opml = Opml {
        head: parse_singular_of(root.get("head"), parse_head),
        body: parser.parse_body(body),
    };
    tracing::debug!(
        outlines = opml.body.as_ref().and_then(|b| b.outlines.as_ref()).map_or(0, Vec::len),
        "Parsed OPML document"
    );

    trim_object(opml).ok_or(FeedError::InvalidInput(Format::Opml))
}

fn parse_head(value: &Value) -> Option<Head> {
    let node = value.as_node()?;
    let get = CaseInsensitive::new(node);
    let text = |key: &str| parse_singular_of(get.get(key), parse_text_string);
    let number = |key: &str| parse_singular_of(get.get(key), parse_text_number);

    trim_object(Head {
        title: text("title"),
        date_created: parse_singular_of(get.get("dateCreated"), parse_date_value),
        date_modified: parse_singular_of(get.get("dateModified"), parse_date_value),
        owner_name: text("ownerName"),
        owner_email: text("ownerEmail"),
        owner_id: text("ownerId"),
        docs: text("docs"),
        expansion_state: parse_singular_of(get.get("expansionState"), |value| {
            parse_csv_of(value, parse_number)
        }),
        vert_scroll_state: number("vertScrollState"),
        window_top: number("windowTop"),
        window_left: number("windowLeft"),
        window_bottom: number("windowBottom"),
        window_right: number("windowRight"),
    })
}

struct OutlineParser<'o> {
    options: &'o ParseOptions,
}

impl OutlineParser<'_> {
    fn parse_body(&self, value: &Value) -> Option<Body> {
        let node = value.as_node()?;
        trim_object(Body {
            outlines: parse_array_of_limited(
                node.get("outline"),
                |outline| self.parse_outline(outline),
                self.options.max_items,
            ),
        })
    }

    fn parse_outline(&self, value: &Value) -> Option<Outline> {
        let node = value.as_node()?;
        let get = CaseInsensitive::new(node);
        let attr = |name: &str| get.get(&format!("@{name}")).and_then(parse_string);
        let flag = |name: &str| get.get(&format!("@{name}")).and_then(parse_boolean);

        let extras = self
            .options
            .extra_outline_attributes
            .iter()
            .filter_map(|name| attr(name).map(|value| (name.clone(), value)))
            .collect::<BTreeMap<_, _>>();

        trim_object(Outline {
            text: attr("text"),
            kind: attr("type"),
            is_comment: flag("isComment"),
            is_breakpoint: flag("isBreakpoint"),
            created: get.get("@created").and_then(parse_date_value),
            category: attr("category"),
            description: attr("description"),
            xml_url: attr("xmlUrl"),
            html_url: attr("htmlUrl"),
            language: attr("language"),
            title: attr("title"),
            version: attr("version"),
            url: attr("url"),
            outlines: parse_array_of(node.get("outline"), |child| self.parse_outline(child)),
            extras,
        })
    }
}
