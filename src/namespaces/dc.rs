//! Dublin Core elements (`dc:`), valid on feeds and items alike.
//!
//! Every element is repeatable in the vocabulary, so every field is a list.
//! Dates use W3C-DTF and are generated as RFC 3339.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tree::{Node, Value};
use crate::util::{
    generate_array_of, generate_cdata_string, generate_rfc3339_date, parse_array_of,
    parse_date_value, parse_text_string, trim_object,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOrFeed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creators: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publishers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights: Option<Vec<String>>,
}

/// Text-valued elements, in generation order, paired with their field.
fn text_fields(value: &ItemOrFeed) -> [(&'static str, &Option<Vec<String>>); 14] {
    [
        ("dc:title", &value.titles),
        ("dc:creator", &value.creators),
        ("dc:subject", &value.subjects),
        ("dc:description", &value.descriptions),
        ("dc:publisher", &value.publishers),
        ("dc:contributor", &value.contributors),
        ("dc:type", &value.types),
        ("dc:format", &value.formats),
        ("dc:identifier", &value.identifiers),
        ("dc:source", &value.sources),
        ("dc:language", &value.languages),
        ("dc:relation", &value.relations),
        ("dc:coverage", &value.coverages),
        ("dc:rights", &value.rights),
    ]
}

pub fn retrieve_item_or_feed(node: &Node) -> Option<ItemOrFeed> {
    let texts = |key: &str| parse_array_of(node.get(key), parse_text_string);

    trim_object(ItemOrFeed {
        titles: texts("dc:title"),
        creators: texts("dc:creator"),
        subjects: texts("dc:subject"),
        descriptions: texts("dc:description"),
        publishers: texts("dc:publisher"),
        contributors: texts("dc:contributor"),
        dates: parse_array_of(node.get("dc:date"), parse_date_value),
        types: texts("dc:type"),
        formats: texts("dc:format"),
        identifiers: texts("dc:identifier"),
        sources: texts("dc:source"),
        languages: texts("dc:language"),
        relations: texts("dc:relation"),
        coverages: texts("dc:coverage"),
        rights: texts("dc:rights"),
    })
}

pub fn generate_item_or_feed(value: &ItemOrFeed) -> Option<Node> {
    let mut node = Node::new();
    for (key, field) in text_fields(value) {
        let generated = generate_array_of(field.as_deref(), |text: &String| {
            generate_cdata_string(Some(text.as_str()))
        });
        node = node.with(key, generated);
    }
    let dates = generate_array_of(value.dates.as_deref(), |date| {
        generate_rfc3339_date(Some(date)).map(Value::from)
    });
    node.with("dc:date", dates).trimmed()
}
