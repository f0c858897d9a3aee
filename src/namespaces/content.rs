//! `content:encoded`, the full HTML body of an RSS or RDF item.

use serde::{Deserialize, Serialize};

use crate::tree::Node;
use crate::util::{generate_cdata_string, parse_singular_of, parse_text_string, trim_object};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoded: Option<String>,
}

pub fn retrieve_item(node: &Node) -> Option<Item> {
    trim_object(Item {
        encoded: parse_singular_of(node.get("content:encoded"), parse_text_string),
    })
}

pub fn generate_item(item: &Item) -> Option<Node> {
    Node::new()
        .with("content:encoded", generate_cdata_string(item.encoded.as_deref()))
        .trimmed()
}
