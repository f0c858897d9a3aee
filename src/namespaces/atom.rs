//! Atom elements embedded in RSS and RDF under the `atom:` prefix, most
//! commonly `<atom:link rel="self"/>`.
//!
//! Legacy prefixes such as `a10:` are rewritten to `atom:` by normalization
//! before these extractors run.

use crate::feeds::atom::{
    generate_entry_fields, generate_feed_fields, parse_entry_fields, parse_feed_fields, Dialect,
    Entry, Feed,
};
use crate::tree::Node;

pub fn retrieve_feed(node: &Node) -> Option<Feed> {
    parse_feed_fields(node, Dialect::EMBEDDED, None)
}

pub fn retrieve_entry(node: &Node) -> Option<Entry> {
    parse_entry_fields(node, Dialect::EMBEDDED)
}

pub fn generate_feed(feed: &Feed) -> Option<Node> {
    generate_feed_fields(feed, Dialect::EMBEDDED)
}

pub fn generate_entry(entry: &Entry) -> Option<Node> {
    generate_entry_fields(entry, Dialect::EMBEDDED)
}
