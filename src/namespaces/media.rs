//! Media RSS (`media:`), valid on feeds, items, groups and contents alike.
//!
//! Every element is optional and partially filled elements are kept. The
//! obsolete `<media:adult>` is read as a `urn:simple` rating when no
//! `<media:rating>` is present.

use serde::{Deserialize, Serialize};

use crate::tree::{format_number, Node, Value};
use crate::util::{
    generate_array_of, generate_boolean, generate_cdata_string, generate_csv_of,
    generate_number, generate_plain_string, generate_text_or_cdata_string, parse_array_of,
    parse_boolean, parse_csv_of, parse_number, parse_singular_of, parse_string,
    parse_text_string, parse_yes_no_boolean, retrieve_text, trim_object,
};

/// Scheme the `<media:adult>` migration assigns.
const SIMPLE_RATING_SCHEME: &str = "urn:simple";

/// `<media:rating scheme="urn:mpaa">pg</media:rating>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleOrDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// `plain` or `html`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// NTP offset into the media, e.g. `12:05:01.123`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hash {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Copyright {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Restriction {
    /// Space-separated country codes or URIs, `all` or `none`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// `allow` or `deny`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarRating {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites: Option<f64>,
}

/// One `name:weight` entry of `<media:tags>`; weight defaults to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star_rating: Option<StarRating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Param {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Param>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubTitle {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeerLink {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rights {
    /// `userCreated` or `official`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Elements allowed at every level of the Media RSS hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonElements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Vec<Rating>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleOrDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<TitleOrDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Vec<Thumbnail>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashes: Option<Vec<Hash>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<Player>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<Vec<Credit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<Copyright>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texts: Option<Vec<Text>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Vec<Restriction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<Community>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<Price>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub licenses: Option<Vec<License>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_titles: Option<Vec<SubTitle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_links: Option<Vec<PeerLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<Location>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights: Option<Rights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenes: Option<Vec<Scene>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// `image`, `audio`, `video`, `document` or `executable`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framerate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samplingrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(flatten)]
    pub common: CommonElements,
}

/// `<media:group>`: alternate renditions of the same media.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<Content>>,
    #[serde(flatten)]
    pub common: CommonElements,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemOrFeed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<Content>>,
    #[serde(flatten)]
    pub common: CommonElements,
}

fn attr<T>(value: &Value, name: &str, parse: impl Fn(&Value) -> Option<T>) -> Option<T> {
    value.as_node()?.get(name).and_then(parse)
}

fn parse_rating(value: &Value) -> Option<Rating> {
    trim_object(Rating {
        value: parse_text_string(value),
        scheme: attr(value, "@scheme", parse_string),
    })
}

fn retrieve_ratings(node: &Node) -> Option<Vec<Rating>> {
    if let Some(ratings) = node.get("media:rating") {
        return parse_array_of(Some(ratings), parse_rating);
    }

    let adult = parse_singular_of(node.get("media:adult"), |value| {
        retrieve_text(value).and_then(parse_boolean)
    })?;
    Some(vec![Rating {
        value: Some(if adult { "adult" } else { "nonadult" }.to_string()),
        scheme: Some(SIMPLE_RATING_SCHEME.to_string()),
    }])
}

fn parse_title_or_description(value: &Value) -> Option<TitleOrDescription> {
    trim_object(TitleOrDescription {
        value: parse_text_string(value),
        kind: attr(value, "@type", parse_string),
    })
}

fn parse_keywords(value: &Value) -> Option<Vec<String>> {
    parse_csv_of(value, parse_string)
}

fn parse_thumbnail(value: &Value) -> Option<Thumbnail> {
    trim_object(Thumbnail {
        url: attr(value, "@url", parse_string),
        height: attr(value, "@height", parse_number),
        width: attr(value, "@width", parse_number),
        time: attr(value, "@time", parse_string),
    })
}

fn parse_category(value: &Value) -> Option<Category> {
    trim_object(Category {
        name: parse_text_string(value),
        scheme: attr(value, "@scheme", parse_string),
        label: attr(value, "@label", parse_string),
    })
}

fn parse_hash(value: &Value) -> Option<Hash> {
    trim_object(Hash {
        value: parse_text_string(value),
        algo: attr(value, "@algo", parse_string),
    })
}

fn parse_player(value: &Value) -> Option<Player> {
    trim_object(Player {
        url: attr(value, "@url", parse_string),
        height: attr(value, "@height", parse_number),
        width: attr(value, "@width", parse_number),
    })
}

fn parse_credit(value: &Value) -> Option<Credit> {
    trim_object(Credit {
        value: parse_text_string(value),
        role: attr(value, "@role", parse_string),
        scheme: attr(value, "@scheme", parse_string),
    })
}

fn parse_copyright(value: &Value) -> Option<Copyright> {
    trim_object(Copyright {
        value: parse_text_string(value),
        url: attr(value, "@url", parse_string),
    })
}

fn parse_text(value: &Value) -> Option<Text> {
    trim_object(Text {
        value: parse_text_string(value),
        kind: attr(value, "@type", parse_string),
        lang: attr(value, "@lang", parse_string),
        start: attr(value, "@start", parse_string),
        end: attr(value, "@end", parse_string),
    })
}

fn parse_restriction(value: &Value) -> Option<Restriction> {
    trim_object(Restriction {
        value: parse_text_string(value),
        relationship: attr(value, "@relationship", parse_string),
        kind: attr(value, "@type", parse_string),
    })
}

fn parse_star_rating(value: &Value) -> Option<StarRating> {
    trim_object(StarRating {
        average: attr(value, "@average", parse_number),
        count: attr(value, "@count", parse_number),
        min: attr(value, "@min", parse_number),
        max: attr(value, "@max", parse_number),
    })
}

fn parse_statistics(value: &Value) -> Option<Statistics> {
    trim_object(Statistics {
        views: attr(value, "@views", parse_number),
        favorites: attr(value, "@favorites", parse_number),
    })
}

fn parse_tag(value: &Value) -> Option<Tag> {
    let segment = parse_string(value)?;
    let (name, weight) = match segment.split_once(':') {
        Some((name, weight)) => (name, weight.trim().parse::<f64>().ok()),
        None => (segment.as_str(), None),
    };
    Some(Tag {
        name: name.trim().to_string(),
        weight: weight.filter(|w| w.is_finite()).unwrap_or(1.0),
    })
}

fn parse_community(value: &Value) -> Option<Community> {
    let node = value.as_node()?;
    trim_object(Community {
        star_rating: parse_singular_of(node.get("media:starrating"), parse_star_rating),
        statistics: parse_singular_of(node.get("media:statistics"), parse_statistics),
        tags: parse_singular_of(node.get("media:tags"), |value| parse_csv_of(value, parse_tag)),
    })
}

/// Text of every `child` element inside a wrapper element.
fn parse_text_list(value: &Value, child: &str) -> Option<Vec<String>> {
    parse_array_of(value.as_node()?.get(child), parse_text_string)
}

fn parse_param(value: &Value) -> Option<Param> {
    trim_object(Param {
        name: attr(value, "@name", parse_string),
        value: parse_text_string(value),
    })
}

fn parse_embed(value: &Value) -> Option<Embed> {
    trim_object(Embed {
        url: attr(value, "@url", parse_string),
        width: attr(value, "@width", parse_number),
        height: attr(value, "@height", parse_number),
        params: value
            .as_node()
            .and_then(|node| parse_array_of(node.get("media:param"), parse_param)),
    })
}

fn parse_status(value: &Value) -> Option<Status> {
    trim_object(Status {
        state: attr(value, "@state", parse_string),
        reason: attr(value, "@reason", parse_string),
    })
}

fn parse_price(value: &Value) -> Option<Price> {
    trim_object(Price {
        kind: attr(value, "@type", parse_string),
        info: attr(value, "@info", parse_string),
        price: attr(value, "@price", parse_number),
        currency: attr(value, "@currency", parse_string),
    })
}

fn parse_license(value: &Value) -> Option<License> {
    trim_object(License {
        name: parse_text_string(value),
        kind: attr(value, "@type", parse_string),
        href: attr(value, "@href", parse_string),
    })
}

fn parse_sub_title(value: &Value) -> Option<SubTitle> {
    trim_object(SubTitle {
        kind: attr(value, "@type", parse_string),
        lang: attr(value, "@lang", parse_string),
        href: attr(value, "@href", parse_string),
    })
}

fn parse_peer_link(value: &Value) -> Option<PeerLink> {
    trim_object(PeerLink {
        kind: attr(value, "@type", parse_string),
        href: attr(value, "@href", parse_string),
    })
}

fn parse_location(value: &Value) -> Option<Location> {
    trim_object(Location {
        description: parse_text_string(value),
        start: attr(value, "@start", parse_string),
        end: attr(value, "@end", parse_string),
        lat: attr(value, "@lat", parse_number),
        lng: attr(value, "@lng", parse_number),
    })
}

fn parse_rights(value: &Value) -> Option<Rights> {
    trim_object(Rights {
        status: attr(value, "@status", parse_string),
    })
}

/// Scene children carry no prefix.
fn parse_scene(value: &Value) -> Option<Scene> {
    let node = value.as_node()?;
    let text = |key: &str| parse_singular_of(node.get(key), parse_text_string);
    trim_object(Scene {
        title: text("scenetitle"),
        description: text("scenedescription"),
        start_time: text("scenestarttime"),
        end_time: text("sceneendtime"),
    })
}

fn retrieve_common_elements(node: &Node) -> CommonElements {
    CommonElements {
        ratings: retrieve_ratings(node),
        title: parse_singular_of(node.get("media:title"), parse_title_or_description),
        description: parse_singular_of(node.get("media:description"), parse_title_or_description),
        keywords: parse_singular_of(node.get("media:keywords"), parse_keywords),
        thumbnails: parse_array_of(node.get("media:thumbnail"), parse_thumbnail),
        categories: parse_array_of(node.get("media:category"), parse_category),
        hashes: parse_array_of(node.get("media:hash"), parse_hash),
        player: parse_singular_of(node.get("media:player"), parse_player),
        credits: parse_array_of(node.get("media:credit"), parse_credit),
        copyright: parse_singular_of(node.get("media:copyright"), parse_copyright),
        texts: parse_array_of(node.get("media:text"), parse_text),
        restrictions: parse_array_of(node.get("media:restriction"), parse_restriction),
        community: parse_singular_of(node.get("media:community"), parse_community),
        comments: parse_singular_of(node.get("media:comments"), |value| {
            parse_text_list(value, "media:comment")
        }),
        embed: parse_singular_of(node.get("media:embed"), parse_embed),
        responses: parse_singular_of(node.get("media:responses"), |value| {
            parse_text_list(value, "media:response")
        }),
        back_links: parse_singular_of(node.get("media:backlinks"), |value| {
            parse_text_list(value, "media:backlink")
        }),
        status: parse_singular_of(node.get("media:status"), parse_status),
        prices: parse_array_of(node.get("media:price"), parse_price),
        licenses: parse_array_of(node.get("media:license"), parse_license),
        sub_titles: parse_array_of(node.get("media:subtitle"), parse_sub_title),
        peer_links: parse_array_of(node.get("media:peerlink"), parse_peer_link),
        locations: parse_array_of(node.get("media:location"), parse_location),
        rights: parse_singular_of(node.get("media:rights"), parse_rights),
        scenes: parse_singular_of(node.get("media:scenes"), |value| {
            parse_array_of(value.as_node()?.get("media:scene"), parse_scene)
        }),
    }
}

fn parse_content(value: &Value) -> Option<Content> {
    let node = value.as_node()?;
    trim_object(Content {
        url: attr(value, "@url", parse_string),
        file_size: attr(value, "@filesize", parse_number),
        kind: attr(value, "@type", parse_string),
        medium: attr(value, "@medium", parse_string),
        is_default: attr(value, "@isdefault", parse_yes_no_boolean),
        expression: attr(value, "@expression", parse_string),
        bitrate: attr(value, "@bitrate", parse_number),
        framerate: attr(value, "@framerate", parse_number),
        samplingrate: attr(value, "@samplingrate", parse_number),
        channels: attr(value, "@channels", parse_number),
        duration: attr(value, "@duration", parse_number),
        height: attr(value, "@height", parse_number),
        width: attr(value, "@width", parse_number),
        lang: attr(value, "@lang", parse_string),
        common: retrieve_common_elements(node),
    })
}

fn parse_group(value: &Value) -> Option<Group> {
    let node = value.as_node()?;
    trim_object(Group {
        contents: parse_array_of(node.get("media:content"), parse_content),
        common: retrieve_common_elements(node),
    })
}

pub fn retrieve_item_or_feed(node: &Node) -> Option<ItemOrFeed> {
    trim_object(ItemOrFeed {
        group: parse_singular_of(node.get("media:group"), parse_group),
        contents: parse_array_of(node.get("media:content"), parse_content),
        common: retrieve_common_elements(node),
    })
}

/// Text plus attributes; the text is CDATA-wrapped when it needs to be.
fn text_node(value: Option<&str>) -> Node {
    Node::new().with_entry(generate_text_or_cdata_string(value))
}

fn generate_rating(rating: &Rating) -> Option<Value> {
    text_node(rating.value.as_deref())
        .with("@scheme", generate_plain_string(rating.scheme.as_deref()))
        .into_value()
}

fn generate_title_or_description(value: Option<&TitleOrDescription>) -> Option<Value> {
    let value = value?;
    text_node(value.value.as_deref())
        .with("@type", generate_plain_string(value.kind.as_deref()))
        .into_value()
}

fn generate_thumbnail(thumbnail: &Thumbnail) -> Option<Value> {
    Node::new()
        .with("@url", generate_plain_string(thumbnail.url.as_deref()))
        .with("@height", generate_number(thumbnail.height))
        .with("@width", generate_number(thumbnail.width))
        .with("@time", generate_plain_string(thumbnail.time.as_deref()))
        .into_value()
}

fn generate_category(category: &Category) -> Option<Value> {
    text_node(category.name.as_deref())
        .with("@scheme", generate_plain_string(category.scheme.as_deref()))
        .with("@label", generate_plain_string(category.label.as_deref()))
        .into_value()
}

fn generate_hash(hash: &Hash) -> Option<Value> {
    text_node(hash.value.as_deref())
        .with("@algo", generate_plain_string(hash.algo.as_deref()))
        .into_value()
}

fn generate_player(player: Option<&Player>) -> Option<Value> {
    let player = player?;
    Node::new()
        .with("@url", generate_plain_string(player.url.as_deref()))
        .with("@height", generate_number(player.height))
        .with("@width", generate_number(player.width))
        .into_value()
}

fn generate_credit(credit: &Credit) -> Option<Value> {
    text_node(credit.value.as_deref())
        .with("@role", generate_plain_string(credit.role.as_deref()))
        .with("@scheme", generate_plain_string(credit.scheme.as_deref()))
        .into_value()
}

fn generate_copyright(copyright: Option<&Copyright>) -> Option<Value> {
    let copyright = copyright?;
    text_node(copyright.value.as_deref())
        .with("@url", generate_plain_string(copyright.url.as_deref()))
        .into_value()
}

fn generate_text(text: &Text) -> Option<Value> {
    text_node(text.value.as_deref())
        .with("@type", generate_plain_string(text.kind.as_deref()))
        .with("@lang", generate_plain_string(text.lang.as_deref()))
        .with("@start", generate_plain_string(text.start.as_deref()))
        .with("@end", generate_plain_string(text.end.as_deref()))
        .into_value()
}

fn generate_restriction(restriction: &Restriction) -> Option<Value> {
    text_node(restriction.value.as_deref())
        .with("@relationship", generate_plain_string(restriction.relationship.as_deref()))
        .with("@type", generate_plain_string(restriction.kind.as_deref()))
        .into_value()
}

fn generate_tags(tags: Option<&[Tag]>) -> Option<Value> {
    let pairs = tags?
        .iter()
        .filter(|tag| !tag.name.trim().is_empty())
        .map(|tag| format!("{}:{}", tag.name.trim(), format_number(tag.weight)))
        .collect::<Vec<_>>();
    generate_csv_of(Some(pairs.as_slice()))
}

fn generate_community(community: Option<&Community>) -> Option<Value> {
    let community = community?;
    let star_rating = community.star_rating.as_ref().and_then(|rating| {
        Node::new()
            .with("@average", generate_number(rating.average))
            .with("@count", generate_number(rating.count))
            .with("@min", generate_number(rating.min))
            .with("@max", generate_number(rating.max))
            .into_value()
    });
    let statistics = community.statistics.as_ref().and_then(|statistics| {
        Node::new()
            .with("@views", generate_number(statistics.views))
            .with("@favorites", generate_number(statistics.favorites))
            .into_value()
    });
    Node::new()
        .with("media:starRating", star_rating)
        .with("media:statistics", statistics)
        .with("media:tags", generate_tags(community.tags.as_deref()))
        .into_value()
}

/// A wrapper element holding one `child` element per string.
fn generate_text_list(values: Option<&[String]>, child: &str) -> Option<Value> {
    Node::new()
        .with(child, generate_array_of(values, |value| generate_plain_string(Some(value))))
        .into_value()
}

fn generate_param(param: &Param) -> Option<Value> {
    text_node(param.value.as_deref())
        .with("@name", generate_plain_string(param.name.as_deref()))
        .into_value()
}

fn generate_embed(embed: Option<&Embed>) -> Option<Value> {
    let embed = embed?;
    Node::new()
        .with("@url", generate_plain_string(embed.url.as_deref()))
        .with("@width", generate_number(embed.width))
        .with("@height", generate_number(embed.height))
        .with("media:param", generate_array_of(embed.params.as_deref(), generate_param))
        .into_value()
}

fn generate_status(status: Option<&Status>) -> Option<Value> {
    let status = status?;
    Node::new()
        .with("@state", generate_plain_string(status.state.as_deref()))
        .with("@reason", generate_plain_string(status.reason.as_deref()))
        .into_value()
}

fn generate_price(price: &Price) -> Option<Value> {
    Node::new()
        .with("@type", generate_plain_string(price.kind.as_deref()))
        .with("@info", generate_plain_string(price.info.as_deref()))
        .with("@price", generate_number(price.price))
        .with("@currency", generate_plain_string(price.currency.as_deref()))
        .into_value()
}

fn generate_license(license: &License) -> Option<Value> {
    text_node(license.name.as_deref())
        .with("@type", generate_plain_string(license.kind.as_deref()))
        .with("@href", generate_plain_string(license.href.as_deref()))
        .into_value()
}

fn generate_sub_title(sub_title: &SubTitle) -> Option<Value> {
    Node::new()
        .with("@type", generate_plain_string(sub_title.kind.as_deref()))
        .with("@lang", generate_plain_string(sub_title.lang.as_deref()))
        .with("@href", generate_plain_string(sub_title.href.as_deref()))
        .into_value()
}

fn generate_peer_link(peer_link: &PeerLink) -> Option<Value> {
    Node::new()
        .with("@type", generate_plain_string(peer_link.kind.as_deref()))
        .with("@href", generate_plain_string(peer_link.href.as_deref()))
        .into_value()
}

fn generate_location(location: &Location) -> Option<Value> {
    text_node(location.description.as_deref())
        .with("@start", generate_plain_string(location.start.as_deref()))
        .with("@end", generate_plain_string(location.end.as_deref()))
        .with("@lat", generate_number(location.lat))
        .with("@lng", generate_number(location.lng))
        .into_value()
}

fn generate_rights(rights: Option<&Rights>) -> Option<Value> {
    Node::new()
        .with("@status", generate_plain_string(rights?.status.as_deref()))
        .into_value()
}

fn generate_scene(scene: &Scene) -> Option<Value> {
    Node::new()
        .with("sceneTitle", generate_cdata_string(scene.title.as_deref()))
        .with("sceneDescription", generate_cdata_string(scene.description.as_deref()))
        .with("sceneStartTime", generate_cdata_string(scene.start_time.as_deref()))
        .with("sceneEndTime", generate_cdata_string(scene.end_time.as_deref()))
        .into_value()
}

fn generate_common_elements(common: &CommonElements) -> Node {
    Node::new()
        .with("media:rating", generate_array_of(common.ratings.as_deref(), generate_rating))
        .with("media:title", generate_title_or_description(common.title.as_ref()))
        .with("media:description", generate_title_or_description(common.description.as_ref()))
        .with("media:keywords", generate_csv_of(common.keywords.as_deref()))
        .with("media:thumbnail", generate_array_of(common.thumbnails.as_deref(), generate_thumbnail))
        .with("media:category", generate_array_of(common.categories.as_deref(), generate_category))
        .with("media:hash", generate_array_of(common.hashes.as_deref(), generate_hash))
        .with("media:player", generate_player(common.player.as_ref()))
        .with("media:credit", generate_array_of(common.credits.as_deref(), generate_credit))
        .with("media:copyright", generate_copyright(common.copyright.as_ref()))
        .with("media:text", generate_array_of(common.texts.as_deref(), generate_text))
        .with(
            "media:restriction",
            generate_array_of(common.restrictions.as_deref(), generate_restriction),
        )
        .with("media:community", generate_community(common.community.as_ref()))
        .with("media:comments", generate_text_list(common.comments.as_deref(), "media:comment"))
        .with("media:embed", generate_embed(common.embed.as_ref()))
        .with(
            "media:responses",
            generate_text_list(common.responses.as_deref(), "media:response"),
        )
        .with(
            "media:backLinks",
            generate_text_list(common.back_links.as_deref(), "media:backLink"),
        )
        .with("media:status", generate_status(common.status.as_ref()))
        .with("media:price", generate_array_of(common.prices.as_deref(), generate_price))
        .with("media:license", generate_array_of(common.licenses.as_deref(), generate_license))
        .with("media:subTitle", generate_array_of(common.sub_titles.as_deref(), generate_sub_title))
        .with("media:peerLink", generate_array_of(common.peer_links.as_deref(), generate_peer_link))
        .with("media:location", generate_array_of(common.locations.as_deref(), generate_location))
        .with("media:rights", generate_rights(common.rights.as_ref()))
        .with(
            "media:scenes",
            Node::new()
                .with("media:scene", generate_array_of(common.scenes.as_deref(), generate_scene))
                .into_value(),
        )
}

fn generate_content(content: &Content) -> Option<Value> {
    Node::new()
        .with("@url", generate_plain_string(content.url.as_deref()))
        .with("@fileSize", generate_number(content.file_size))
        .with("@type", generate_plain_string(content.kind.as_deref()))
        .with("@medium", generate_plain_string(content.medium.as_deref()))
        .with("@isDefault", generate_boolean(content.is_default))
        .with("@expression", generate_plain_string(content.expression.as_deref()))
        .with("@bitrate", generate_number(content.bitrate))
        .with("@framerate", generate_number(content.framerate))
        .with("@samplingrate", generate_number(content.samplingrate))
        .with("@channels", generate_number(content.channels))
        .with("@duration", generate_number(content.duration))
        .with("@height", generate_number(content.height))
        .with("@width", generate_number(content.width))
        .with("@lang", generate_plain_string(content.lang.as_deref()))
        .merge(generate_common_elements(&content.common).trimmed())
        .into_value()
}

fn generate_group(group: Option<&Group>) -> Option<Value> {
    let group = group?;
    Node::new()
        .with("media:content", generate_array_of(group.contents.as_deref(), generate_content))
        .merge(generate_common_elements(&group.common).trimmed())
        .into_value()
}

pub fn generate_item_or_feed(value: &ItemOrFeed) -> Option<Node> {
    Node::new()
        .with("media:group", generate_group(value.group.as_ref()))
        .with("media:content", generate_array_of(value.contents.as_deref(), generate_content))
        .merge(generate_common_elements(&value.common).trimmed())
        .trimmed()
}
