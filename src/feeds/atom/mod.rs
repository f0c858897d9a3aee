//! Atom 1.0 feeds, with Atom 0.3 fallbacks on parse.
//!
//! The same extractors and generators also serve the `atom:` namespace
//! embedded in RSS and RDF documents; see [`crate::namespaces::atom`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::namespaces::{dc, georss, itunes, media, podcast, slash, sy};

mod generate;
mod parse;

pub use generate::generate;
pub(crate) use generate::{generate_entry_fields, generate_feed_fields};
pub use parse::parse;
pub(crate) use parse::{parse_entry_fields, parse_feed_fields};

/// Default namespace declared on generated `<feed>` roots.
pub const ATOM_NAMESPACE_URI: &str = "http://www.w3.org/2005/Atom";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Metadata of the feed an entry was copied from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Person>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<Person>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<Generator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Person>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<Person>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
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
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Person>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<Person>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<Generator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Entry>>,
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
}

/// How the Atom vocabulary is being read or written: as the document
/// itself, or embedded in another format under the `atom:` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Dialect {
    /// Key prefix, `""` or `"atom:"`.
    pub prefix: &'static str,
    /// Standalone documents also carry other namespaces and entries.
    pub standalone: bool,
}

impl Dialect {
    pub const STANDALONE: Dialect = Dialect {
        prefix: "",
        standalone: true,
    };

    pub const PREFIXED_STANDALONE: Dialect = Dialect {
        prefix: "atom:",
        standalone: true,
    };

    pub const EMBEDDED: Dialect = Dialect {
        prefix: "atom:",
        standalone: false,
    };

    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}
