use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::{Category, Dialect, Entry, Feed, Generator, Link, Person, Source};
use crate::config::ParseOptions;
use crate::detect::detect_atom_text;
use crate::error::{FeedError, Format};
use crate::namespaces::{
    dc, georss, itunes, media, podcast, slash, sy, NamespaceNormalizer, NamespaceTable,
};
use crate::tree::{read_tree_with, Node, Value};
use crate::util::{
    detect_namespaces, parse_array_of, parse_array_of_limited, parse_date_value, parse_number,
    parse_singular_of, parse_string, parse_text_string, trim_object,
};

/// Text constructs whose inner markup (`type="xhtml"`) is kept verbatim.
/// Segments use canonical prefixes, so any prefix bound to the Atom URI
/// matches the `atom:` entries.
const STOP_NODES: &[&str] = &[
    "feed.title",
    "feed.subtitle",
    "feed.rights",
    "feed.entry.title",
    "feed.entry.summary",
    "feed.entry.content",
    "feed.entry.rights",
    "atom:feed.atom:title",
    "atom:feed.atom:subtitle",
    "atom:feed.atom:rights",
    "atom:feed.atom:entry.atom:title",
    "atom:feed.atom:entry.atom:summary",
    "atom:feed.atom:entry.atom:content",
    "atom:feed.atom:entry.atom:rights",
];

/// Parses an Atom document.
///
/// The root may be an unprefixed `<feed>` or a prefixed one (`atom:feed`,
/// `a10:feed`, ...) once namespace normalization has run. Atom 0.3 element
/// names are accepted as fallbacks: `issued`/`created` for `published`,
/// `modified` for `updated`, `tagline` for `subtitle`, `copyright` for
/// `rights` and `url` for a person's `uri`.
///
/// # Errors
///
/// - [`FeedError::InvalidInput`] when the text is not recognized as Atom or
///   the feed yields no fields at all
/// - [`FeedError::Xml`] / [`FeedError::MaxDepthExceeded`] from the tokenizer
pub fn parse(xml: &str, options: &ParseOptions) -> Result<Feed, FeedError> {
    if !detect_atom_text(xml) {
        return Err(FeedError::InvalidInput(Format::Atom));
    }

    let table = NamespaceTable::standard();
    let raw = read_tree_with(xml, STOP_NODES, |name, uri| table.canonical_name(name, uri))?;
    let document = NamespaceNormalizer::new(table).normalize(&raw);

    let (root, dialect) = match document.get("feed") {
        Some(root) => (root, Dialect::STANDALONE),
        None => (
            document
                .get("atom:feed")
                .ok_or(FeedError::InvalidInput(Format::Atom))?,
            Dialect::PREFIXED_STANDALONE,
        ),
    };
    let root = root
        .first()
        .and_then(Value::as_node)
        .ok_or(FeedError::InvalidInput(Format::Atom))?;

    parse_feed_fields(root, dialect, options.max_items).ok_or(FeedError::InvalidInput(Format::Atom))
}

pub(crate) fn parse_feed_fields(
    node: &Node,
    dialect: Dialect,
    max_items: Option<usize>,
) -> Option<Feed> {
    let get = |name: &str| node.get(&dialect.key(name));
    let text = |name: &str| parse_singular_of(get(name), parse_text_string);
    let namespaces = extension_namespaces(node, dialect);

    trim_object(Feed {
        authors: parse_array_of(get("author"), |v| parse_person(v, dialect)),
        categories: parse_array_of(get("category"), parse_category),
        contributors: parse_array_of(get("contributor"), |v| parse_person(v, dialect)),
        generator: parse_singular_of(get("generator"), parse_generator),
        icon: text("icon"),
        id: text("id"),
        links: parse_array_of(get("link"), parse_link),
        logo: text("logo"),
        rights: text("rights").or_else(|| text("copyright")),
        subtitle: text("subtitle").or_else(|| text("tagline")),
        title: text("title"),
        updated: retrieve_updated(node, dialect),
        entries: if dialect.standalone {
            parse_array_of_limited(
                get("entry"),
                |v| v.as_node().and_then(|entry| parse_entry_fields(entry, dialect)),
                max_items,
            )
        } else {
            None
        },
        dc: namespaces
            .contains("dc")
            .then(|| dc::retrieve_item_or_feed(node))
            .flatten(),
        sy: namespaces
            .contains("sy")
            .then(|| sy::retrieve_feed(node))
            .flatten(),
        itunes: namespaces
            .contains("itunes")
            .then(|| itunes::retrieve_feed(node))
            .flatten(),
        podcast: namespaces
            .contains("podcast")
            .then(|| podcast::retrieve_feed(node))
            .flatten(),
        media: namespaces
            .contains("media")
            .then(|| media::retrieve_item_or_feed(node))
            .flatten(),
        georss: namespaces
            .contains("georss")
            .then(|| georss::retrieve_item_or_feed(node))
            .flatten(),
    })
}

pub(crate) fn parse_entry_fields(node: &Node, dialect: Dialect) -> Option<Entry> {
    let get = |name: &str| node.get(&dialect.key(name));
    let text = |name: &str| parse_singular_of(get(name), parse_text_string);
    let namespaces = extension_namespaces(node, dialect);

    trim_object(Entry {
        authors: parse_array_of(get("author"), |v| parse_person(v, dialect)),
        categories: parse_array_of(get("category"), parse_category),
        content: text("content"),
        contributors: parse_array_of(get("contributor"), |v| parse_person(v, dialect)),
        id: text("id"),
        links: parse_array_of(get("link"), parse_link),
        published: retrieve_published(node, dialect),
        rights: text("rights").or_else(|| text("copyright")),
        source: parse_singular_of(get("source"), |v| parse_source(v, dialect)),
        summary: text("summary"),
        title: text("title"),
        updated: retrieve_updated(node, dialect),
        dc: namespaces
            .contains("dc")
            .then(|| dc::retrieve_item_or_feed(node))
            .flatten(),
        slash: namespaces
            .contains("slash")
            .then(|| slash::retrieve_item(node))
            .flatten(),
        itunes: namespaces
            .contains("itunes")
            .then(|| itunes::retrieve_item(node))
            .flatten(),
        podcast: namespaces
            .contains("podcast")
            .then(|| podcast::retrieve_item(node))
            .flatten(),
        media: namespaces
            .contains("media")
            .then(|| media::retrieve_item_or_feed(node))
            .flatten(),
        georss: namespaces
            .contains("georss")
            .then(|| georss::retrieve_item_or_feed(node))
            .flatten(),
    })
}

/// Other namespaces are only read when Atom is the document format; inside
/// RSS they belong to the host item.
fn extension_namespaces(node: &Node, dialect: Dialect) -> BTreeSet<String> {
    if dialect.standalone {
        detect_namespaces(node)
    } else {
        BTreeSet::new()
    }
}

fn attribute(node: &Node, name: &str) -> Option<String> {
    node.get(name).and_then(parse_string)
}

/// `<link href="..."/>`, tolerating the RSS-style `<link>url</link>`.
fn parse_link(value: &Value) -> Option<Link> {
    let Some(node) = value.as_node() else {
        return trim_object(Link {
            href: parse_string(value),
            ..Default::default()
        });
    };
    trim_object(Link {
        href: attribute(node, "@href").or_else(|| parse_text_string(value)),
        rel: attribute(node, "@rel"),
        kind: attribute(node, "@type"),
        hreflang: attribute(node, "@hreflang"),
        title: attribute(node, "@title"),
        length: node.get("@length").and_then(parse_number),
    })
}

fn parse_person(value: &Value, dialect: Dialect) -> Option<Person> {
    let Some(node) = value.as_node() else {
        // Bare `<author>Name</author>`.
        return trim_object(Person {
            name: parse_string(value),
            ..Default::default()
        });
    };
    let text = |name: &str| parse_singular_of(node.get(&dialect.key(name)), parse_text_string);
    trim_object(Person {
        name: text("name"),
        uri: text("uri").or_else(|| text("url")),
        email: text("email"),
    })
}

fn parse_category(value: &Value) -> Option<Category> {
    let node = value.as_node()?;
    trim_object(Category {
        term: attribute(node, "@term"),
        scheme: attribute(node, "@scheme"),
        label: attribute(node, "@label"),
    })
}

fn parse_generator(value: &Value) -> Option<Generator> {
    let attrs = value.as_node();
    let attr = |name: &str| attrs.and_then(|node| attribute(node, name));
    trim_object(Generator {
        text: parse_text_string(value),
        uri: attr("@uri").or_else(|| attr("@url")),
        version: attr("@version"),
    })
}

fn parse_source(value: &Value, dialect: Dialect) -> Option<Source> {
    let node = value.as_node()?;
    let get = |name: &str| node.get(&dialect.key(name));
    let text = |name: &str| parse_singular_of(get(name), parse_text_string);

    trim_object(Source {
        authors: parse_array_of(get("author"), |v| parse_person(v, dialect)),
        categories: parse_array_of(get("category"), parse_category),
        contributors: parse_array_of(get("contributor"), |v| parse_person(v, dialect)),
        generator: parse_singular_of(get("generator"), parse_generator),
        icon: text("icon"),
        id: text("id"),
        links: parse_array_of(get("link"), parse_link),
        logo: text("logo"),
        rights: text("rights"),
        subtitle: text("subtitle"),
        title: text("title"),
        updated: retrieve_updated(node, dialect),
    })
}

fn retrieve_date(node: &Node, dialect: Dialect, names: &[&str]) -> Option<DateTime<Utc>> {
    names
        .iter()
        .find_map(|name| parse_singular_of(node.get(&dialect.key(name)), parse_date_value))
}

fn retrieve_published(node: &Node, dialect: Dialect) -> Option<DateTime<Utc>> {
    retrieve_date(node, dialect, &["published", "issued", "created"])
}

fn retrieve_updated(node: &Node, dialect: Dialect) -> Option<DateTime<Utc>> {
    retrieve_date(node, dialect, &["updated", "modified"])
}
