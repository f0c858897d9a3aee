//! RDF Site Summary (RSS 1.0 and RSS 0.90). Parse only.

use serde::{Deserialize, Serialize};

use crate::feeds::atom;
use crate::namespaces::{content, dc, slash, sy};

mod parse;

pub use parse::parse;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<content::Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atom: Option<atom::Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc: Option<dc::ItemOrFeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slash: Option<slash::Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_input: Option<TextInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atom: Option<atom::Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc: Option<dc::ItemOrFeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sy: Option<sy::Feed>,
}
