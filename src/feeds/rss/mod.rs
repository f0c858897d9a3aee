//! RSS 2.0 (and the 0.9x dialects it grew out of).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feeds::atom;
use crate::namespaces::{acast, content, dc, georss, itunes, media, podcast, slash, sy};

mod generate;
mod parse;

pub use generate::generate;
pub use parse::parse;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// `<cloud>`: an rssCloud endpoint for update notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cloud {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_procedure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
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
pub struct Enclosure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_perma_link: Option<bool>,
}

/// `<source url="...">title</source>`: the channel an item came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enclosures: Option<Vec<Enclosure>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<Guid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<content::Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atom: Option<atom::Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc: Option<dc::ItemOrFeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slash: Option<slash::Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itunes: Option<itunes::Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podcast: Option<podcast::Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<media::ItemOrFeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub georss: Option<georss::ItemOrFeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acast: Option<acast::Item>,
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
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managing_editor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_master: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_build_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud: Option<Cloud>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_input: Option<TextInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_hours: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_days: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atom: Option<atom::Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc: Option<dc::ItemOrFeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sy: Option<sy::Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itunes: Option<itunes::Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podcast: Option<podcast::Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<media::ItemOrFeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub georss: Option<georss::ItemOrFeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acast: Option<acast::Feed>,
}
