//! Podcasting 2.0 tags (`podcast:`).
//!
//! Attributes are matched lower-case (`@starttime`) and generated in the
//! namespace's documented camelCase (`@startTime`). Elements missing the
//! attributes the vocabulary requires are dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tree::{Node, Value, TEXT_KEY};
use crate::util::{
    generate_array_of, generate_boolean, generate_cdata_string, generate_number,
    generate_plain_string, generate_rfc3339_date, generate_rfc822_date,
    generate_text_or_cdata_string, generate_yes_no_boolean, parse_array_of, parse_boolean,
    parse_date_value, parse_number, parse_singular_of, parse_string, parse_text_number,
    parse_text_string, parse_yes_no_boolean, retrieve_text, trim_object,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Locked {
    pub value: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Funding {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chapters {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Soundbite {
    pub start_time: f64,
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osm: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub number: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub number: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trailer {
    pub display: String,
    pub url: String,
    pub pub_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Integrity {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlternateEnclosure {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codecs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity: Option<Integrity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRecipient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_value: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
    pub split: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItem {
    pub feed_guid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueTimeSplit {
    pub start_time: f64,
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_item: Option<RemoteItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_recipients: Option<Vec<ValueRecipient>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_recipients: Option<Vec<ValueRecipient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_time_splits: Option<Vec<ValueTimeSplit>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Images {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srcset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialInteract {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub value: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Txt {
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Podroll {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_items: Option<Vec<RemoteItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFrequency {
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtstart: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Podping {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses_podping: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentLink {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// Episode-level tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcripts: Option<Vec<Transcript>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Chapters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soundbites: Option<Vec<Soundbite>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persons: Option<Vec<Person>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<Episode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_enclosures: Option<Vec<AlternateEnclosure>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Images>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_interacts: Option<Vec<SocialInteract>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txts: Option<Vec<Txt>>,
}

/// `<podcast:liveItem>`: an episode plus its broadcast window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveItem {
    #[serde(flatten)]
    pub item: Item,
    pub status: String,
    pub start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_links: Option<Vec<ContentLink>>,
}

/// Show-level tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<Locked>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fundings: Option<Vec<Funding>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persons: Option<Vec<Person>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailers: Option<Vec<Trailer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Images>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_items: Option<Vec<LiveItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txts: Option<Vec<Txt>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_items: Option<Vec<RemoteItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podroll: Option<Podroll>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_frequency: Option<UpdateFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podping: Option<Podping>,
}

/// An attribute of an element; bare text elements have none.
fn attr<T>(value: &Value, name: &str, parse: impl Fn(&Value) -> Option<T>) -> Option<T> {
    value.as_node()?.get(name).and_then(parse)
}

fn parse_transcript(value: &Value) -> Option<Transcript> {
    Some(Transcript {
        url: attr(value, "@url", parse_string)?,
        kind: attr(value, "@type", parse_string)?,
        language: attr(value, "@language", parse_string),
        rel: attr(value, "@rel", parse_string),
    })
}

fn parse_locked(value: &Value) -> Option<Locked> {
    Some(Locked {
        value: retrieve_text(value).and_then(parse_yes_no_boolean)?,
        owner: attr(value, "@owner", parse_string),
    })
}

fn parse_funding(value: &Value) -> Option<Funding> {
    Some(Funding {
        url: attr(value, "@url", parse_string)?,
        display: parse_text_string(value),
    })
}

fn parse_chapters(value: &Value) -> Option<Chapters> {
    Some(Chapters {
        url: attr(value, "@url", parse_string)?,
        kind: attr(value, "@type", parse_string)?,
    })
}

fn parse_soundbite(value: &Value) -> Option<Soundbite> {
    Some(Soundbite {
        start_time: attr(value, "@starttime", parse_number)?,
        duration: attr(value, "@duration", parse_number)?,
        display: parse_text_string(value),
    })
}

fn parse_person(value: &Value) -> Option<Person> {
    Some(Person {
        display: parse_text_string(value)?,
        role: attr(value, "@role", parse_string),
        group: attr(value, "@group", parse_string),
        img: attr(value, "@img", parse_string),
        href: attr(value, "@href", parse_string),
    })
}

fn parse_location(value: &Value) -> Option<Location> {
    Some(Location {
        display: parse_text_string(value)?,
        geo: attr(value, "@geo", parse_string),
        osm: attr(value, "@osm", parse_string),
    })
}

fn parse_season(value: &Value) -> Option<Season> {
    Some(Season {
        number: parse_text_number(value)?,
        name: attr(value, "@name", parse_string),
    })
}

fn parse_episode(value: &Value) -> Option<Episode> {
    Some(Episode {
        number: parse_text_number(value)?,
        display: attr(value, "@display", parse_string),
    })
}

fn parse_trailer(value: &Value) -> Option<Trailer> {
    Some(Trailer {
        display: parse_text_string(value)?,
        url: attr(value, "@url", parse_string)?,
        pub_date: attr(value, "@pubdate", parse_date_value)?,
        length: attr(value, "@length", parse_number),
        kind: attr(value, "@type", parse_string),
        season: attr(value, "@season", parse_number),
    })
}

fn parse_license(value: &Value) -> Option<License> {
    Some(License {
        display: parse_text_string(value)?,
        url: attr(value, "@url", parse_string),
    })
}

fn parse_source(value: &Value) -> Option<Source> {
    Some(Source {
        uri: attr(value, "@uri", parse_string)?,
        content_type: attr(value, "@contenttype", parse_string),
    })
}

fn parse_integrity(value: &Value) -> Option<Integrity> {
    Some(Integrity {
        kind: attr(value, "@type", parse_string)?,
        value: attr(value, "@value", parse_string)?,
    })
}

fn parse_alternate_enclosure(value: &Value) -> Option<AlternateEnclosure> {
    let node = value.as_node()?;
    Some(AlternateEnclosure {
        kind: attr(value, "@type", parse_string)?,
        length: attr(value, "@length", parse_number),
        bitrate: attr(value, "@bitrate", parse_number),
        height: attr(value, "@height", parse_number),
        lang: attr(value, "@lang", parse_string),
        title: attr(value, "@title", parse_string),
        rel: attr(value, "@rel", parse_string),
        codecs: attr(value, "@codecs", parse_string),
        default: attr(value, "@default", parse_boolean),
        sources: parse_array_of(node.get("podcast:source"), parse_source),
        integrity: parse_singular_of(node.get("podcast:integrity"), parse_integrity),
    })
}

fn parse_value_recipient(value: &Value) -> Option<ValueRecipient> {
    Some(ValueRecipient {
        name: attr(value, "@name", parse_string),
        custom_key: attr(value, "@customkey", parse_string),
        custom_value: attr(value, "@customvalue", parse_string),
        kind: attr(value, "@type", parse_string)?,
        address: attr(value, "@address", parse_string)?,
        split: attr(value, "@split", parse_number)?,
        fee: attr(value, "@fee", parse_boolean),
    })
}

fn parse_remote_item(value: &Value) -> Option<RemoteItem> {
    Some(RemoteItem {
        feed_guid: attr(value, "@feedguid", parse_string)?,
        feed_url: attr(value, "@feedurl", parse_string),
        item_guid: attr(value, "@itemguid", parse_string),
        medium: attr(value, "@medium", parse_string),
    })
}

fn parse_value_time_split(value: &Value) -> Option<ValueTimeSplit> {
    let node = value.as_node()?;
    Some(ValueTimeSplit {
        start_time: attr(value, "@starttime", parse_number)?,
        duration: attr(value, "@duration", parse_number)?,
        remote_start_time: attr(value, "@remotestarttime", parse_number),
        remote_percentage: attr(value, "@remotepercentage", parse_number),
        remote_item: parse_singular_of(node.get("podcast:remoteitem"), parse_remote_item),
        value_recipients: parse_array_of(
            node.get("podcast:valuerecipient"),
            parse_value_recipient,
        ),
    })
}

fn parse_value(value: &Value) -> Option<ValueBlock> {
    let node = value.as_node()?;
    Some(ValueBlock {
        kind: attr(value, "@type", parse_string)?,
        method: attr(value, "@method", parse_string)?,
        suggested: attr(value, "@suggested", parse_number),
        value_recipients: parse_array_of(
            node.get("podcast:valuerecipient"),
            parse_value_recipient,
        ),
        value_time_splits: parse_array_of(
            node.get("podcast:valuetimesplit"),
            parse_value_time_split,
        ),
    })
}

fn parse_images(value: &Value) -> Option<Images> {
    trim_object(Images {
        srcset: attr(value, "@srcset", parse_string),
    })
}

/// Only `protocol` is required: `protocol="disabled"` legitimately comes
/// without a `uri`.
fn parse_social_interact(value: &Value) -> Option<SocialInteract> {
    Some(SocialInteract {
        uri: attr(value, "@uri", parse_string),
        protocol: attr(value, "@protocol", parse_string)?,
        account_id: attr(value, "@accountid", parse_string),
        account_url: attr(value, "@accounturl", parse_string),
        priority: attr(value, "@priority", parse_number),
    })
}

fn parse_block(value: &Value) -> Option<Block> {
    Some(Block {
        value: retrieve_text(value).and_then(parse_yes_no_boolean)?,
        id: attr(value, "@id", parse_string),
    })
}

fn parse_txt(value: &Value) -> Option<Txt> {
    Some(Txt {
        display: parse_text_string(value)?,
        purpose: attr(value, "@purpose", parse_string),
    })
}

fn parse_podroll(value: &Value) -> Option<Podroll> {
    let node = value.as_node()?;
    trim_object(Podroll {
        remote_items: parse_array_of(node.get("podcast:remoteitem"), parse_remote_item),
    })
}

fn parse_update_frequency(value: &Value) -> Option<UpdateFrequency> {
    Some(UpdateFrequency {
        display: parse_text_string(value)?,
        complete: attr(value, "@complete", parse_boolean),
        dtstart: attr(value, "@dtstart", parse_date_value),
        rrule: attr(value, "@rrule", parse_string),
    })
}

fn parse_podping(value: &Value) -> Option<Podping> {
    trim_object(Podping {
        uses_podping: attr(value, "@usespodping", parse_boolean),
    })
}

fn parse_content_link(value: &Value) -> Option<ContentLink> {
    Some(ContentLink {
        href: attr(value, "@href", parse_string)?,
        display: parse_text_string(value),
    })
}

fn parse_live_item(value: &Value) -> Option<LiveItem> {
    let node = value.as_node()?;
    Some(LiveItem {
        item: retrieve_item(node).unwrap_or_default(),
        status: attr(value, "@status", parse_string)?,
        start: attr(value, "@start", parse_date_value)?,
        end: attr(value, "@end", parse_date_value),
        content_links: parse_array_of(node.get("podcast:contentlink"), parse_content_link),
    })
}

pub fn retrieve_item(node: &Node) -> Option<Item> {
    trim_object(Item {
        transcripts: parse_array_of(node.get("podcast:transcript"), parse_transcript),
        chapters: parse_singular_of(node.get("podcast:chapters"), parse_chapters),
        soundbites: parse_array_of(node.get("podcast:soundbite"), parse_soundbite),
        persons: parse_array_of(node.get("podcast:person"), parse_person),
        location: parse_singular_of(node.get("podcast:location"), parse_location),
        season: parse_singular_of(node.get("podcast:season"), parse_season),
        episode: parse_singular_of(node.get("podcast:episode"), parse_episode),
        license: parse_singular_of(node.get("podcast:license"), parse_license),
        alternate_enclosures: parse_array_of(
            node.get("podcast:alternateenclosure"),
            parse_alternate_enclosure,
        ),
        value: parse_singular_of(node.get("podcast:value"), parse_value),
        images: parse_singular_of(node.get("podcast:images"), parse_images),
        social_interacts: parse_array_of(
            node.get("podcast:socialinteract"),
            parse_social_interact,
        ),
        txts: parse_array_of(node.get("podcast:txt"), parse_txt),
    })
}

pub fn retrieve_feed(node: &Node) -> Option<Feed> {
    trim_object(Feed {
        locked: parse_singular_of(node.get("podcast:locked"), parse_locked),
        fundings: parse_array_of(node.get("podcast:funding"), parse_funding),
        persons: parse_array_of(node.get("podcast:person"), parse_person),
        location: parse_singular_of(node.get("podcast:location"), parse_location),
        trailers: parse_array_of(node.get("podcast:trailer"), parse_trailer),
        license: parse_singular_of(node.get("podcast:license"), parse_license),
        guid: parse_singular_of(node.get("podcast:guid"), parse_text_string),
        value: parse_singular_of(node.get("podcast:value"), parse_value),
        medium: parse_singular_of(node.get("podcast:medium"), parse_text_string),
        images: parse_singular_of(node.get("podcast:images"), parse_images),
        live_items: parse_array_of(node.get("podcast:liveitem"), parse_live_item),
        blocks: parse_array_of(node.get("podcast:block"), parse_block),
        txts: parse_array_of(node.get("podcast:txt"), parse_txt),
        remote_items: parse_array_of(node.get("podcast:remoteitem"), parse_remote_item),
        podroll: parse_singular_of(node.get("podcast:podroll"), parse_podroll),
        update_frequency: parse_singular_of(
            node.get("podcast:updatefrequency"),
            parse_update_frequency,
        ),
        podping: parse_singular_of(node.get("podcast:podping"), parse_podping),
    })
}

fn text_with(display: Option<&str>) -> Node {
    Node::new().with_entry(generate_text_or_cdata_string(display))
}

fn generate_transcript(transcript: &Transcript) -> Option<Value> {
    Node::new()
        .with("@url", generate_plain_string(Some(&transcript.url)))
        .with("@type", generate_plain_string(Some(&transcript.kind)))
        .with("@language", generate_plain_string(transcript.language.as_deref()))
        .with("@rel", generate_plain_string(transcript.rel.as_deref()))
        .into_value()
}

fn generate_locked(locked: &Locked) -> Option<Value> {
    Node::new()
        .with(TEXT_KEY, generate_yes_no_boolean(Some(locked.value)))
        .with("@owner", generate_plain_string(locked.owner.as_deref()))
        .into_value()
}

fn generate_funding(funding: &Funding) -> Option<Value> {
    text_with(funding.display.as_deref())
        .with("@url", generate_plain_string(Some(&funding.url)))
        .into_value()
}

fn generate_chapters(chapters: &Chapters) -> Option<Value> {
    Node::new()
        .with("@url", generate_plain_string(Some(&chapters.url)))
        .with("@type", generate_plain_string(Some(&chapters.kind)))
        .into_value()
}

fn generate_soundbite(soundbite: &Soundbite) -> Option<Value> {
    text_with(soundbite.display.as_deref())
        .with("@startTime", generate_number(Some(soundbite.start_time)))
        .with("@duration", generate_number(Some(soundbite.duration)))
        .into_value()
}

fn generate_person(person: &Person) -> Option<Value> {
    text_with(Some(&person.display))
        .with("@role", generate_plain_string(person.role.as_deref()))
        .with("@group", generate_plain_string(person.group.as_deref()))
        .with("@img", generate_plain_string(person.img.as_deref()))
        .with("@href", generate_plain_string(person.href.as_deref()))
        .into_value()
}

fn generate_location(location: &Location) -> Option<Value> {
    text_with(Some(&location.display))
        .with("@geo", generate_plain_string(location.geo.as_deref()))
        .with("@osm", generate_plain_string(location.osm.as_deref()))
        .into_value()
}

fn generate_season(season: &Season) -> Option<Value> {
    Node::new()
        .with(TEXT_KEY, generate_number(Some(season.number)))
        .with("@name", generate_plain_string(season.name.as_deref()))
        .into_value()
}

fn generate_episode(episode: &Episode) -> Option<Value> {
    Node::new()
        .with(TEXT_KEY, generate_number(Some(episode.number)))
        .with("@display", generate_plain_string(episode.display.as_deref()))
        .into_value()
}

fn generate_trailer(trailer: &Trailer) -> Option<Value> {
    text_with(Some(&trailer.display))
        .with("@url", generate_plain_string(Some(&trailer.url)))
        .with("@pubdate", generate_rfc822_date(Some(trailer.pub_date)))
        .with("@length", generate_number(trailer.length))
        .with("@type", generate_plain_string(trailer.kind.as_deref()))
        .with("@season", generate_number(trailer.season))
        .into_value()
}

fn generate_license(license: &License) -> Option<Value> {
    text_with(Some(&license.display))
        .with("@url", generate_plain_string(license.url.as_deref()))
        .into_value()
}

fn generate_source(source: &Source) -> Option<Value> {
    Node::new()
        .with("@uri", generate_plain_string(Some(&source.uri)))
        .with("@contentType", generate_plain_string(source.content_type.as_deref()))
        .into_value()
}

fn generate_integrity(integrity: &Integrity) -> Option<Value> {
    Node::new()
        .with("@type", generate_plain_string(Some(&integrity.kind)))
        .with("@value", generate_plain_string(Some(&integrity.value)))
        .into_value()
}

fn generate_alternate_enclosure(enclosure: &AlternateEnclosure) -> Option<Value> {
    Node::new()
        .with("@type", generate_plain_string(Some(&enclosure.kind)))
        .with("@length", generate_number(enclosure.length))
        .with("@bitrate", generate_number(enclosure.bitrate))
        .with("@height", generate_number(enclosure.height))
        .with("@lang", generate_plain_string(enclosure.lang.as_deref()))
        .with("@title", generate_plain_string(enclosure.title.as_deref()))
        .with("@rel", generate_plain_string(enclosure.rel.as_deref()))
        .with("@codecs", generate_plain_string(enclosure.codecs.as_deref()))
        .with("@default", generate_boolean(enclosure.default))
        .with("podcast:source", generate_array_of(enclosure.sources.as_deref(), generate_source))
        .with("podcast:integrity", enclosure.integrity.as_ref().and_then(generate_integrity))
        .into_value()
}

fn generate_value_recipient(recipient: &ValueRecipient) -> Option<Value> {
    Node::new()
        .with("@name", generate_plain_string(recipient.name.as_deref()))
        .with("@customKey", generate_plain_string(recipient.custom_key.as_deref()))
        .with("@customValue", generate_plain_string(recipient.custom_value.as_deref()))
        .with("@type", generate_plain_string(Some(&recipient.kind)))
        .with("@address", generate_plain_string(Some(&recipient.address)))
        .with("@split", generate_number(Some(recipient.split)))
        .with("@fee", generate_boolean(recipient.fee))
        .into_value()
}

fn generate_remote_item(remote: &RemoteItem) -> Option<Value> {
    Node::new()
        .with("@feedGuid", generate_plain_string(Some(&remote.feed_guid)))
        .with("@feedUrl", generate_plain_string(remote.feed_url.as_deref()))
        .with("@itemGuid", generate_plain_string(remote.item_guid.as_deref()))
        .with("@medium", generate_plain_string(remote.medium.as_deref()))
        .into_value()
}

fn generate_value_time_split(split: &ValueTimeSplit) -> Option<Value> {
    Node::new()
        .with("@startTime", generate_number(Some(split.start_time)))
        .with("@duration", generate_number(Some(split.duration)))
        .with("@remoteStartTime", generate_number(split.remote_start_time))
        .with("@remotePercentage", generate_number(split.remote_percentage))
        .with("podcast:remoteItem", split.remote_item.as_ref().and_then(generate_remote_item))
        .with(
            "podcast:valueRecipient",
            generate_array_of(split.value_recipients.as_deref(), generate_value_recipient),
        )
        .into_value()
}

fn generate_value(value: &ValueBlock) -> Option<Value> {
    Node::new()
        .with("@type", generate_plain_string(Some(&value.kind)))
        .with("@method", generate_plain_string(Some(&value.method)))
        .with("@suggested", generate_number(value.suggested))
        .with(
            "podcast:valueRecipient",
            generate_array_of(value.value_recipients.as_deref(), generate_value_recipient),
        )
        .with(
            "podcast:valueTimeSplit",
            generate_array_of(value.value_time_splits.as_deref(), generate_value_time_split),
        )
        .into_value()
}

fn generate_images(images: &Images) -> Option<Value> {
    Node::new()
        .with("@srcset", generate_plain_string(images.srcset.as_deref()))
        .into_value()
}

fn generate_social_interact(social: &SocialInteract) -> Option<Value> {
    Node::new()
        .with("@uri", generate_plain_string(social.uri.as_deref()))
        .with("@protocol", generate_plain_string(Some(&social.protocol)))
        .with("@accountId", generate_plain_string(social.account_id.as_deref()))
        .with("@accountUrl", generate_plain_string(social.account_url.as_deref()))
        .with("@priority", generate_number(social.priority))
        .into_value()
}

fn generate_block(block: &Block) -> Option<Value> {
    Node::new()
        .with(TEXT_KEY, generate_yes_no_boolean(Some(block.value)))
        .with("@id", generate_plain_string(block.id.as_deref()))
        .into_value()
}

fn generate_txt(txt: &Txt) -> Option<Value> {
    text_with(Some(&txt.display))
        .with("@purpose", generate_plain_string(txt.purpose.as_deref()))
        .into_value()
}

fn generate_podroll(podroll: &Podroll) -> Option<Value> {
    Node::new()
        .with(
            "podcast:remoteItem",
            generate_array_of(podroll.remote_items.as_deref(), generate_remote_item),
        )
        .into_value()
}

fn generate_update_frequency(frequency: &UpdateFrequency) -> Option<Value> {
    text_with(Some(&frequency.display))
        .with("@complete", generate_boolean(frequency.complete))
        .with("@dtstart", generate_rfc3339_date(frequency.dtstart))
        .with("@rrule", generate_plain_string(frequency.rrule.as_deref()))
        .into_value()
}

fn generate_podping(podping: &Podping) -> Option<Value> {
    Node::new()
        .with("@usesPodping", generate_boolean(podping.uses_podping))
        .into_value()
}

fn generate_content_link(link: &ContentLink) -> Option<Value> {
    text_with(link.display.as_deref())
        .with("@href", generate_plain_string(Some(&link.href)))
        .into_value()
}

fn generate_live_item(live: &LiveItem) -> Option<Value> {
    Node::new()
        .with("@status", generate_plain_string(Some(&live.status)))
        .with("@start", generate_rfc3339_date(Some(live.start)))
        .with("@end", generate_rfc3339_date(live.end))
        .merge(generate_item(&live.item))
        .with(
            "podcast:contentLink",
            generate_array_of(live.content_links.as_deref(), generate_content_link),
        )
        .into_value()
}

pub fn generate_item(item: &Item) -> Option<Node> {
    Node::new()
        .with(
            "podcast:transcript",
            generate_array_of(item.transcripts.as_deref(), generate_transcript),
        )
        .with("podcast:chapters", item.chapters.as_ref().and_then(generate_chapters))
        .with(
            "podcast:soundbite",
            generate_array_of(item.soundbites.as_deref(), generate_soundbite),
        )
        .with("podcast:person", generate_array_of(item.persons.as_deref(), generate_person))
        .with("podcast:location", item.location.as_ref().and_then(generate_location))
        .with("podcast:season", item.season.as_ref().and_then(generate_season))
        .with("podcast:episode", item.episode.as_ref().and_then(generate_episode))
        .with("podcast:license", item.license.as_ref().and_then(generate_license))
        .with(
            "podcast:alternateEnclosure",
            generate_array_of(item.alternate_enclosures.as_deref(), generate_alternate_enclosure),
        )
        .with("podcast:value", item.value.as_ref().and_then(generate_value))
        .with("podcast:images", item.images.as_ref().and_then(generate_images))
        .with(
            "podcast:socialInteract",
            generate_array_of(item.social_interacts.as_deref(), generate_social_interact),
        )
        .with("podcast:txt", generate_array_of(item.txts.as_deref(), generate_txt))
        .trimmed()
}

pub fn generate_feed(feed: &Feed) -> Option<Node> {
    Node::new()
        .with("podcast:locked", feed.locked.as_ref().and_then(generate_locked))
        .with("podcast:funding", generate_array_of(feed.fundings.as_deref(), generate_funding))
        .with("podcast:person", generate_array_of(feed.persons.as_deref(), generate_person))
        .with("podcast:location", feed.location.as_ref().and_then(generate_location))
        .with("podcast:trailer", generate_array_of(feed.trailers.as_deref(), generate_trailer))
        .with("podcast:license", feed.license.as_ref().and_then(generate_license))
        .with("podcast:guid", generate_cdata_string(feed.guid.as_deref()))
        .with("podcast:value", feed.value.as_ref().and_then(generate_value))
        .with("podcast:medium", generate_cdata_string(feed.medium.as_deref()))
        .with("podcast:images", feed.images.as_ref().and_then(generate_images))
        .with(
            "podcast:liveItem",
            generate_array_of(feed.live_items.as_deref(), generate_live_item),
        )
        .with("podcast:block", generate_array_of(feed.blocks.as_deref(), generate_block))
        .with("podcast:txt", generate_array_of(feed.txts.as_deref(), generate_txt))
        .with(
            "podcast:remoteItem",
            generate_array_of(feed.remote_items.as_deref(), generate_remote_item),
        )
        .with("podcast:podroll", feed.podroll.as_ref().and_then(generate_podroll))
        .with(
            "podcast:updateFrequency",
            feed.update_frequency.as_ref().and_then(generate_update_frequency),
        )
        .with("podcast:podping", feed.podping.as_ref().and_then(generate_podping))
        .trimmed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::{NamespaceNormalizer, NamespaceTable};
    use crate::tree::read_tree;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn channel(xml: &str) -> Node {
        let raw = read_tree(xml, &[]).expect("test document should be well-formed");
        let doc = NamespaceNormalizer::new(NamespaceTable::standard()).normalize(&raw);
        doc.get("rss")
            .and_then(Value::as_node)
            .and_then(|rss| rss.get("channel"))
            .and_then(Value::as_node)
            .cloned()
            .expect("document should have rss.channel")
    }

    fn item_of(channel: &Node) -> Node {
        channel
            .get("item")
            .and_then(Value::as_node)
            .cloned()
            .expect("channel should have one item")
    }

    const SHOW: &str = r#"<rss xmlns:podcast="https://podcastindex.org/namespace/1.0"><channel>
        <podcast:locked owner="jane@example.com">yes</podcast:locked>
        <podcast:funding url="https://example.com/donate">Support the show</podcast:funding>
        <podcast:funding>no url</podcast:funding>
        <podcast:guid>917393e3-1b1e-5cef-ace4-edaa54e1f810</podcast:guid>
        <podcast:trailer pubdate="Thu, 01 Apr 2021 08:00:00 EST" url="https://example.com/t.mp3" length="12345">Coming soon</podcast:trailer>
        <podcast:trailer url="https://example.com/undated.mp3">Undated</podcast:trailer>
        <podcast:liveItem status="live" start="2021-09-26T07:30:00.000-0600">
            <podcast:contentLink href="https://example.com/live">Watch</podcast:contentLink>
            <podcast:person role="host">Jane</podcast:person>
        </podcast:liveItem>
        <podcast:block id="google">no</podcast:block>
        <podcast:updateFrequency rrule="FREQ=WEEKLY" complete="false">Weekly</podcast:updateFrequency>
        <podcast:podping usesPodping="true"/>
        <item>
            <podcast:transcript url="https://example.com/ep1.vtt" type="text/vtt" language="en"/>
            <podcast:transcript url="https://example.com/missing-type.srt"/>
            <podcast:chapters url="https://example.com/ep1.json" type="application/json+chapters"/>
            <podcast:soundbite startTime="73.0" duration="60.0">Best part</podcast:soundbite>
            <podcast:season name="Pilot">1</podcast:season>
            <podcast:episode display="Ch. 1">3</podcast:episode>
            <podcast:alternateEnclosure type="audio/opus" bitrate="64000" default="true">
                <podcast:source uri="https://example.com/ep1.opus" contentType="audio/opus"/>
                <podcast:integrity type="sri" value="sha384-abc"/>
            </podcast:alternateEnclosure>
            <podcast:value type="lightning" method="keysend" suggested="0.00000005">
                <podcast:valueRecipient name="Host" type="node" address="02d5c1" split="90"/>
                <podcast:valueRecipient name="No split" type="node" address="03ae9f"/>
            </podcast:value>
        </item>
    </channel></rss>"#;

    #[test]
    fn test_retrieve_feed_keeps_complete_elements_only() {
        let feed = retrieve_feed(&channel(SHOW)).expect("podcast feed fields should parse");

        assert_eq!(
            feed.locked,
            Some(Locked {
                value: true,
                owner: Some("jane@example.com".to_string()),
            })
        );
        assert_eq!(
            feed.fundings,
            Some(vec![Funding {
                url: "https://example.com/donate".to_string(),
                display: Some("Support the show".to_string()),
            }])
        );
        assert_eq!(feed.guid.as_deref(), Some("917393e3-1b1e-5cef-ace4-edaa54e1f810"));

        let trailers = feed.trailers.expect("the dated trailer should survive");
        assert_eq!(trailers.len(), 1);
        assert_eq!(
            trailers[0].pub_date,
            Utc.with_ymd_and_hms(2021, 4, 1, 13, 0, 0).unwrap()
        );
        assert_eq!(trailers[0].length, Some(12345.0));

        let live = feed.live_items.expect("live item should parse");
        assert_eq!(live[0].status, "live");
        assert_eq!(live[0].start, Utc.with_ymd_and_hms(2021, 9, 26, 13, 30, 0).unwrap());
        assert_eq!(
            live[0].item.persons.as_ref().map(|persons| persons[0].display.as_str()),
            Some("Jane")
        );
        assert_eq!(
            live[0].content_links,
            Some(vec![ContentLink {
                href: "https://example.com/live".to_string(),
                display: Some("Watch".to_string()),
            }])
        );

        assert_eq!(
            feed.blocks,
            Some(vec![Block {
                value: false,
                id: Some("google".to_string()),
            }])
        );
        let frequency = feed.update_frequency.expect("update frequency should parse");
        assert_eq!(frequency.display, "Weekly");
        assert_eq!(frequency.complete, Some(false));
        assert_eq!(frequency.rrule.as_deref(), Some("FREQ=WEEKLY"));
        assert_eq!(feed.podping, Some(Podping { uses_podping: Some(true) }));
    }

    #[test]
    fn test_retrieve_item() {
        let item = retrieve_item(&item_of(&channel(SHOW))).expect("podcast item fields should parse");

        assert_eq!(
            item.transcripts,
            Some(vec![Transcript {
                url: "https://example.com/ep1.vtt".to_string(),
                kind: "text/vtt".to_string(),
                language: Some("en".to_string()),
                rel: None,
            }])
        );
        assert_eq!(
            item.chapters.map(|chapters| chapters.kind),
            Some("application/json+chapters".to_string())
        );
        assert_eq!(
            item.soundbites,
            Some(vec![Soundbite {
                start_time: 73.0,
                duration: 60.0,
                display: Some("Best part".to_string()),
            }])
        );
        assert_eq!(
            item.season,
            Some(Season {
                number: 1.0,
                name: Some("Pilot".to_string()),
            })
        );
        assert_eq!(item.episode.map(|episode| episode.number), Some(3.0));

        let enclosures = item.alternate_enclosures.expect("alternate enclosure should parse");
        assert_eq!(enclosures[0].bitrate, Some(64000.0));
        assert_eq!(enclosures[0].default, Some(true));
        assert_eq!(
            enclosures[0].sources,
            Some(vec![Source {
                uri: "https://example.com/ep1.opus".to_string(),
                content_type: Some("audio/opus".to_string()),
            }])
        );
        assert_eq!(
            enclosures[0].integrity,
            Some(Integrity {
                kind: "sri".to_string(),
                value: "sha384-abc".to_string(),
            })
        );

        let value = item.value.expect("value block should parse");
        assert_eq!(value.method, "keysend");
        let recipients = value.value_recipients.expect("recipient with a split should survive");
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].split, 90.0);
    }

    #[test]
    fn test_bare_text_elements() {
        let node = Node::new()
            .with("podcast:person", Some("Jane"))
            .with("podcast:season", Some("2"))
            .with("podcast:txt", Some("verify-me"));
        let item = retrieve_item(&node).unwrap();
        assert_eq!(item.persons.map(|persons| persons[0].display.clone()), Some("Jane".to_string()));
        assert_eq!(item.season.map(|season| season.number), Some(2.0));
        assert_eq!(item.txts.map(|txts| txts[0].display.clone()), Some("verify-me".to_string()));
        assert_eq!(retrieve_item(&Node::new().with("podcast:season", Some("soon"))), None);
    }

    #[test]
    fn test_generate_uses_documented_attribute_spelling() {
        let item = Item {
            soundbites: Some(vec![Soundbite {
                start_time: 10.0,
                duration: 5.0,
                display: None,
            }]),
            episode: Some(Episode {
                number: 4.0,
                display: None,
            }),
            ..Default::default()
        };
        let node = generate_item(&item).unwrap();
        assert_eq!(
            node.get("podcast:soundbite"),
            Some(&Value::List(vec![Value::Node(
                Node::new()
                    .with("@startTime", Some(Value::Number(10.0)))
                    .with("@duration", Some(Value::Number(5.0)))
            )]))
        );
        assert_eq!(
            node.get("podcast:episode"),
            Some(&Value::Node(Node::new().with(TEXT_KEY, Some(Value::Number(4.0)))))
        );
        assert_eq!(generate_item(&Item::default()), None);
    }

    #[test]
    fn test_generate_feed_dates() {
        let start = Utc.with_ymd_and_hms(2021, 9, 26, 13, 30, 0).unwrap();
        let feed = Feed {
            locked: Some(Locked {
                value: false,
                owner: None,
            }),
            trailers: Some(vec![Trailer {
                display: "Soon".to_string(),
                url: "https://example.com/t.mp3".to_string(),
                pub_date: start,
                length: None,
                kind: None,
                season: None,
            }]),
            live_items: Some(vec![LiveItem {
                item: Item::default(),
                status: "pending".to_string(),
                start,
                end: None,
                content_links: None,
            }]),
            ..Default::default()
        };
        let node = generate_feed(&feed).unwrap();

        assert_eq!(
            node.get("podcast:locked"),
            Some(&Value::Node(Node::new().with(TEXT_KEY, Some("no"))))
        );
        let trailer = node
            .get("podcast:trailer")
            .and_then(Value::first)
            .and_then(Value::as_node)
            .unwrap();
        assert_eq!(trailer.get("@pubdate"), Some(&Value::from("Sun, 26 Sep 2021 13:30:00 GMT")));
        let live = node
            .get("podcast:liveItem")
            .and_then(Value::first)
            .and_then(Value::as_node)
            .unwrap();
        assert_eq!(live.get("@start"), Some(&Value::from("2021-09-26T13:30:00.000Z")));
        assert_eq!(live.get("@status"), Some(&Value::from("pending")));
    }
}
