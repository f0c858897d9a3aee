//! Acast hosting tags (`acast:`).
//!
//! `signature` and `network` carry attributes next to inline text, so they
//! generate through [`generate_text_or_cdata_string`].

use serde::{Deserialize, Serialize};

use crate::tree::{Node, Value};
use crate::util::{
    generate_cdata_string, generate_plain_string, generate_text_or_cdata_string,
    parse_singular_of, parse_string, parse_text_string, trim_object,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_feed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<String>,
}

fn attribute(value: &Value, name: &str) -> Option<String> {
    value.as_node()?.get(name).and_then(parse_string)
}

fn parse_signature(value: &Value) -> Option<Signature> {
    trim_object(Signature {
        key: attribute(value, "@key"),
        algorithm: attribute(value, "@algorithm"),
        value: parse_text_string(value),
    })
}

fn parse_network(value: &Value) -> Option<Network> {
    trim_object(Network {
        id: attribute(value, "@id"),
        slug: attribute(value, "@slug"),
        value: parse_text_string(value),
    })
}

pub fn retrieve_feed(node: &Node) -> Option<Feed> {
    let text = |key: &str| parse_singular_of(node.get(key), parse_text_string);

    trim_object(Feed {
        show_id: text("acast:showid"),
        show_url: text("acast:showurl"),
        signature: parse_singular_of(node.get("acast:signature"), parse_signature),
        settings: text("acast:settings"),
        network: parse_singular_of(node.get("acast:network"), parse_network),
        imported_feed: text("acast:importedfeed"),
    })
}

pub fn retrieve_item(node: &Node) -> Option<Item> {
    let text = |key: &str| parse_singular_of(node.get(key), parse_text_string);

    trim_object(Item {
        episode_id: text("acast:episodeid"),
        show_id: text("acast:showid"),
        episode_url: text("acast:episodeurl"),
        settings: text("acast:settings"),
    })
}

fn generate_signature(signature: Option<&Signature>) -> Option<Value> {
    let signature = signature?;
    Node::new()
        .with("@key", generate_plain_string(signature.key.as_deref()))
        .with("@algorithm", generate_plain_string(signature.algorithm.as_deref()))
        .with_entry(generate_text_or_cdata_string(signature.value.as_deref()))
        .into_value()
}

fn generate_network(network: Option<&Network>) -> Option<Value> {
    let network = network?;
    Node::new()
        .with("@id", generate_plain_string(network.id.as_deref()))
        .with("@slug", generate_plain_string(network.slug.as_deref()))
        .with_entry(generate_text_or_cdata_string(network.value.as_deref()))
        .into_value()
}

pub fn generate_feed(feed: &Feed) -> Option<Node> {
    Node::new()
        .with("acast:showId", generate_plain_string(feed.show_id.as_deref()))
        .with("acast:showUrl", generate_plain_string(feed.show_url.as_deref()))
        .with("acast:signature", generate_signature(feed.signature.as_ref()))
        .with("acast:settings", generate_cdata_string(feed.settings.as_deref()))
        .with("acast:network", generate_network(feed.network.as_ref()))
        .with("acast:importedFeed", generate_plain_string(feed.imported_feed.as_deref()))
        .trimmed()
}

pub fn generate_item(item: &Item) -> Option<Node> {
    Node::new()
        .with("acast:episodeId", generate_plain_string(item.episode_id.as_deref()))
        .with("acast:showId", generate_plain_string(item.show_id.as_deref()))
        .with("acast:episodeUrl", generate_plain_string(item.episode_url.as_deref()))
        .with("acast:settings", generate_cdata_string(item.settings.as_deref()))
        .trimmed()
}
