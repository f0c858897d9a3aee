use super::{Category, Cloud, Enclosure, Feed, Guid, Image, Item, Source, TextInput};
use crate::config::ParseOptions;
use crate::detect::detect_rss_text;
use crate::error::{FeedError, Format};
use crate::namespaces::{acast, atom, content, dc, georss, itunes, media, podcast, slash, sy};
use crate::namespaces::{NamespaceNormalizer, NamespaceTable};
use crate::tree::{read_tree_with, Node, Value};
use crate::util::{
    detect_namespaces, parse_array_of, parse_array_of_limited, parse_boolean, parse_date_value,
    parse_number, parse_singular_of, parse_string, parse_text_number, parse_text_string,
    trim_object,
};

/// Item bodies are frequently unescaped HTML; keep them verbatim.
const STOP_NODES: &[&str] = &[
    "rss.channel.item.description",
    "rss.channel.item.content:encoded",
];

/// Parses an RSS document.
///
/// Runs detection, tokenizes, normalizes namespace prefixes and extracts
/// the channel. Every field is optional; malformed fields are dropped.
/// `options.max_items` caps the number of items read.
///
/// # Errors
///
/// - [`FeedError::InvalidInput`] when the text is not recognized as RSS or
///   the channel yields no fields at all
/// - [`FeedError::Xml`] / [`FeedError::MaxDepthExceeded`] from the tokenizer
///
/// # Examples
///
/// ```
/// use feedcraft::{feeds::rss, ParseOptions};
///
/// let xml = r#"<rss version="2.0"><channel><title>T</title></channel></rss>"#;
/// let feed = rss::parse(xml, &ParseOptions::default()).unwrap();
/// assert_eq!(feed.title.as_deref(), Some("T"));
/// ```
pub fn parse(xml: &str, options: &ParseOptions) -> Result<Feed, FeedError> {
    if !detect_rss_text(xml) {
        return Err(FeedError::InvalidInput(Format::Rss));
    }

    let table = NamespaceTable::standard();
    let raw = read_tree_with(xml, STOP_NODES, |name, uri| table.canonical_name(name, uri))?;
    let document = NamespaceNormalizer::new(table).normalize(&raw);

    let channel = parse_singular_of(document.get("rss"), |rss| {
        parse_singular_of(rss.as_node()?.get("channel"), |channel| channel.as_node().cloned())
    })
    .ok_or(FeedError::InvalidInput(Format::Rss))?;

    parse_channel(&channel, options.max_items).ok_or(FeedError::InvalidInput(Format::Rss))
}

fn parse_channel(channel: &Node, max_items: Option<usize>) -> Option<Feed> {
    let text = |key: &str| parse_singular_of(channel.get(key), parse_text_string);
    let date = |key: &str| parse_singular_of(channel.get(key), parse_date_value);
    let namespaces = detect_namespaces(channel);

    trim_object(Feed {
        title: text("title"),
        link: text("link"),
        description: text("description"),
        language: text("language"),
        copyright: text("copyright"),
        managing_editor: text("managingeditor"),
        web_master: text("webmaster"),
        pub_date: date("pubdate"),
        last_build_date: date("lastbuilddate"),
        categories: parse_array_of(channel.get("category"), parse_category),
        generator: text("generator"),
        docs: text("docs"),
        cloud: parse_singular_of(channel.get("cloud"), parse_cloud),
        ttl: parse_singular_of(channel.get("ttl"), parse_text_number),
        image: parse_singular_of(channel.get("image"), parse_image),
        rating: text("rating"),
        text_input: parse_singular_of(channel.get("textinput"), parse_text_input),
        skip_hours: parse_singular_of(channel.get("skiphours"), |hours| {
            parse_array_of(hours.as_node()?.get("hour"), parse_text_number)
        }),
        skip_days: parse_singular_of(channel.get("skipdays"), |days| {
            parse_array_of(days.as_node()?.get("day"), parse_text_string)
        }),
        items: parse_array_of_limited(channel.get("item"), parse_item, max_items),
        atom: namespaces
            .contains("atom")
            .then(|| atom::retrieve_feed(channel))
            .flatten(),
        dc: namespaces
            .contains("dc")
            .then(|| dc::retrieve_item_or_feed(channel))
            .flatten(),
        sy: namespaces
            .contains("sy")
            .then(|| sy::retrieve_feed(channel))
            .flatten(),
        itunes: namespaces
            .contains("itunes")
            .then(|| itunes::retrieve_feed(channel))
            .flatten(),
        podcast: namespaces
            .contains("podcast")
            .then(|| podcast::retrieve_feed(channel))
            .flatten(),
        media: namespaces
            .contains("media")
            .then(|| media::retrieve_item_or_feed(channel))
            .flatten(),
        georss: namespaces
            .contains("georss")
            .then(|| georss::retrieve_item_or_feed(channel))
            .flatten(),
        acast: namespaces
            .contains("acast")
            .then(|| acast::retrieve_feed(channel))
            .flatten(),
    })
}

fn parse_item(value: &Value) -> Option<Item> {
    let item = value.as_node()?;
    let text = |key: &str| parse_singular_of(item.get(key), parse_text_string);
    let namespaces = detect_namespaces(item);

    trim_object(Item {
        title: text("title"),
        link: text("link"),
        description: text("description"),
        authors: parse_array_of(item.get("author"), parse_text_string),
        categories: parse_array_of(item.get("category"), parse_category),
        comments: text("comments"),
        enclosures: parse_array_of(item.get("enclosure"), parse_enclosure),
        guid: parse_singular_of(item.get("guid"), parse_guid),
        pub_date: parse_singular_of(item.get("pubdate"), parse_date_value),
        source: parse_singular_of(item.get("source"), parse_source),
        content: namespaces
            .contains("content")
            .then(|| content::retrieve_item(item))
            .flatten(),
        atom: namespaces
            .contains("atom")
            .then(|| atom::retrieve_entry(item))
            .flatten(),
        dc: namespaces
            .contains("dc")
            .then(|| dc::retrieve_item_or_feed(item))
            .flatten(),
        slash: namespaces
            .contains("slash")
            .then(|| slash::retrieve_item(item))
            .flatten(),
        itunes: namespaces
            .contains("itunes")
            .then(|| itunes::retrieve_item(item))
            .flatten(),
        podcast: namespaces
            .contains("podcast")
            .then(|| podcast::retrieve_item(item))
            .flatten(),
        media: namespaces
            .contains("media")
            .then(|| media::retrieve_item_or_feed(item))
            .flatten(),
        georss: namespaces
            .contains("georss")
            .then(|| georss::retrieve_item_or_feed(item))
            .flatten(),
        acast: namespaces
            .contains("acast")
            .then(|| acast::retrieve_item(item))
            .flatten(),
    })
}

fn attribute(value: &Value, name: &str) -> Option<String> {
    value.as_node()?.get(name).and_then(parse_string)
}

fn parse_category(value: &Value) -> Option<Category> {
    trim_object(Category {
        name: parse_text_string(value),
        domain: attribute(value, "@domain"),
    })
}

fn parse_cloud(value: &Value) -> Option<Cloud> {
    let node = value.as_node()?;
    trim_object(Cloud {
        domain: attribute(value, "@domain"),
        port: node.get("@port").and_then(parse_number),
        path: attribute(value, "@path"),
        register_procedure: attribute(value, "@registerprocedure"),
        protocol: attribute(value, "@protocol"),
    })
}

fn parse_image(value: &Value) -> Option<Image> {
    let node = value.as_node()?;
    let text = |key: &str| parse_singular_of(node.get(key), parse_text_string);
    let number = |key: &str| parse_singular_of(node.get(key), parse_text_number);
    trim_object(Image {
        url: text("url"),
        title: text("title"),
        link: text("link"),
        description: text("description"),
        height: number("height"),
        width: number("width"),
    })
}

fn parse_text_input(value: &Value) -> Option<TextInput> {
    let node = value.as_node()?;
    let text = |key: &str| parse_singular_of(node.get(key), parse_text_string);
    trim_object(TextInput {
        title: text("title"),
        description: text("description"),
        name: text("name"),
        link: text("link"),
    })
}

fn parse_enclosure(value: &Value) -> Option<Enclosure> {
    let node = value.as_node()?;
    trim_object(Enclosure {
        url: attribute(value, "@url"),
        length: node.get("@length").and_then(parse_number),
        kind: attribute(value, "@type"),
    })
}

fn parse_guid(value: &Value) -> Option<Guid> {
    let is_perma_link = value
        .as_node()
        .and_then(|node| node.get("@ispermalink"))
        .and_then(parse_boolean);
    let value = parse_text_string(value)?;
    Some(Guid {
        value: Some(value),
        is_perma_link,
    })
}

fn parse_source(value: &Value) -> Option<Source> {
    trim_object(Source {
        title: parse_text_string(value),
        url: attribute(value, "@url"),
    })
}
