//! OPML 2.0 outline documents, most often used for feed subscription lists.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod generate;
mod parse;

pub use generate::generate;
pub use parse::parse;

/// One `<outline>` element. Outlines nest arbitrarily deep.
///
/// `extras` holds the attributes requested through
/// `extra_outline_attributes`, keyed by the spelling the caller asked for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_comment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_breakpoint: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlines: Option<Vec<Outline>>,
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Head {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansion_state: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vert_scroll_state: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_right: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlines: Option<Vec<Outline>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Opml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Head>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

/// A feed subscription: an outline carrying an `xmlUrl`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    /// Sourced from `title`, falling back to `text`, then to the feed URL.
    pub title: String,
    pub xml_url: String,
    pub html_url: Option<String>,
}

impl Opml {
    /// Every outline with an `xmlUrl`, at any depth, in document order.
    ///
    /// Folder outlines (those without `xmlUrl`) are traversed but not
    /// returned themselves.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        let mut found = Vec::new();
        if let Some(outlines) = self.body.as_ref().and_then(|b| b.outlines.as_deref()) {
            collect_subscriptions(outlines, &mut found);
        }
        found
    }
}

fn collect_subscriptions(outlines: &[Outline], found: &mut Vec<Subscription>) {
    for outline in outlines {
        if let Some(xml_url) = &outline.xml_url {
            found.push(Subscription {
                title: outline
                    .title
                    .clone()
                    .or_else(|| outline.text.clone())
                    .unwrap_or_else(|| xml_url.clone()),
                xml_url: xml_url.clone(),
                html_url: outline.html_url.clone(),
            });
        }
        if let Some(children) = outline.outlines.as_deref() {
            collect_subscriptions(children, found);
        }
    }
}
