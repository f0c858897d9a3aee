use super::{Category, Cloud, Enclosure, Feed, Guid, Image, Item, Source, TextInput};
use crate::config::GenerateOptions;
use crate::error::{FeedError, Format};
use crate::namespaces::{
    acast, atom, content, dc, georss, itunes, media, podcast, slash, sy, NamespaceTable,
};
use crate::tree::{write_document, Node, Value};
use crate::util::{
    generate_array_of, generate_boolean, generate_cdata_string, generate_namespace_attrs,
    generate_number, generate_plain_string, generate_rfc822_date, generate_text_or_cdata_string,
};

/// Generates an RSS 2.0 document.
///
/// The root carries `version="2.0"` plus one `xmlns:prefix` declaration per
/// namespace actually used in the channel. Unless `options.lenient` is set,
/// the channel needs `title`, `link` and `description`, and every item
/// needs a `title` or a `description`.
///
/// # Errors
///
/// - [`FeedError::MissingField`] when strict validation fails
/// - [`FeedError::InvalidInput`] when nothing could be generated at all
/// - [`FeedError::Write`] if serialization fails
pub fn generate(feed: &Feed, options: &GenerateOptions) -> Result<String, FeedError> {
    if !options.lenient {
        validate(feed)?;
    }

    let channel = generate_channel(feed).ok_or(FeedError::InvalidInput(Format::Rss))?;
    let rss = Node::new()
        .with("@version", Some("2.0"))
        .merge(generate_namespace_attrs(&channel, NamespaceTable::standard()))
        .with("channel", Some(channel));

    write_document(&Node::new().with("rss", Some(rss)), options)
}

fn missing(field: &'static str) -> FeedError {
    FeedError::MissingField {
        format: Format::Rss,
        field,
    }
}

fn validate(feed: &Feed) -> Result<(), FeedError> {
    feed.title.as_ref().ok_or_else(|| missing("title"))?;
    feed.link.as_ref().ok_or_else(|| missing("link"))?;
    feed.description.as_ref().ok_or_else(|| missing("description"))?;
    for item in feed.items.iter().flatten() {
        if item.title.is_none() && item.description.is_none() {
            return Err(missing("item.title"));
        }
    }
    Ok(())
}

fn generate_channel(feed: &Feed) -> Option<Node> {
    Node::new()
        .with("title", generate_cdata_string(feed.title.as_deref()))
        .with("link", generate_plain_string(feed.link.as_deref()))
        .with("description", generate_cdata_string(feed.description.as_deref()))
        .with("language", generate_plain_string(feed.language.as_deref()))
        .with("copyright", generate_cdata_string(feed.copyright.as_deref()))
        .with("managingEditor", generate_plain_string(feed.managing_editor.as_deref()))
        .with("webMaster", generate_plain_string(feed.web_master.as_deref()))
        .with("pubDate", generate_rfc822_date(feed.pub_date))
        .with("lastBuildDate", generate_rfc822_date(feed.last_build_date))
        .with("category", generate_array_of(feed.categories.as_deref(), generate_category))
        .with("generator", generate_plain_string(feed.generator.as_deref()))
        .with("docs", generate_plain_string(feed.docs.as_deref()))
        .with("cloud", feed.cloud.as_ref().and_then(generate_cloud))
        .with("ttl", generate_number(feed.ttl))
        .with("image", feed.image.as_ref().and_then(generate_image))
        .with("rating", generate_plain_string(feed.rating.as_deref()))
        .with("textInput", feed.text_input.as_ref().and_then(generate_text_input))
        .with("skipHours", generate_wrapped_list("hour", feed.skip_hours.as_deref(), |hour| {
            generate_number(Some(*hour))
        }))
        .with("skipDays", generate_wrapped_list("day", feed.skip_days.as_deref(), |day| {
            generate_plain_string(Some(day.as_str()))
        }))
        .merge(feed.atom.as_ref().and_then(atom::generate_feed))
        .merge(feed.dc.as_ref().and_then(dc::generate_item_or_feed))
        .merge(feed.sy.as_ref().and_then(sy::generate_feed))
        .merge(feed.itunes.as_ref().and_then(itunes::generate_feed))
        .merge(feed.podcast.as_ref().and_then(podcast::generate_feed))
        .merge(feed.media.as_ref().and_then(media::generate_item_or_feed))
        .merge(feed.georss.as_ref().and_then(georss::generate_item_or_feed))
        .merge(feed.acast.as_ref().and_then(acast::generate_feed))
        .with("item", generate_array_of(feed.items.as_deref(), generate_item))
        .trimmed()
}

fn generate_item(item: &Item) -> Option<Value> {
    Node::new()
        .with("title", generate_cdata_string(item.title.as_deref()))
        .with("link", generate_plain_string(item.link.as_deref()))
        .with("description", generate_cdata_string(item.description.as_deref()))
        .with("author", generate_array_of(item.authors.as_deref(), |author: &String| {
            generate_plain_string(Some(author.as_str()))
        }))
        .with("category", generate_array_of(item.categories.as_deref(), generate_category))
        .with("comments", generate_plain_string(item.comments.as_deref()))
        .with("enclosure", generate_array_of(item.enclosures.as_deref(), generate_enclosure))
        .with("guid", item.guid.as_ref().and_then(generate_guid))
        .with("pubDate", generate_rfc822_date(item.pub_date))
        .with("source", item.source.as_ref().and_then(generate_source))
        .merge(item.content.as_ref().and_then(content::generate_item))
        .merge(item.atom.as_ref().and_then(atom::generate_entry))
        .merge(item.dc.as_ref().and_then(dc::generate_item_or_feed))
        .merge(item.slash.as_ref().and_then(slash::generate_item))
        .merge(item.itunes.as_ref().and_then(itunes::generate_item))
        .merge(item.podcast.as_ref().and_then(podcast::generate_item))
        .merge(item.media.as_ref().and_then(media::generate_item_or_feed))
        .merge(item.georss.as_ref().and_then(georss::generate_item_or_feed))
        .merge(item.acast.as_ref().and_then(acast::generate_item))
        .into_value()
}

/// `<skipHours><hour>1</hour>...</skipHours>` style containers.
fn generate_wrapped_list<T>(
    child: &str,
    values: Option<&[T]>,
    generate: impl Fn(&T) -> Option<Value>,
) -> Option<Value> {
    let items = generate_array_of(values, generate)?;
    Node::new().with(child, Some(items)).into_value()
}

fn generate_category(category: &Category) -> Option<Value> {
    let name = generate_text_or_cdata_string(category.name.as_deref());
    match generate_plain_string(category.domain.as_deref()) {
        Some(domain) => Node::new()
            .with("@domain", Some(domain))
            .with_entry(name)
            .into_value(),
        None => generate_cdata_string(category.name.as_deref()),
    }
}

fn generate_cloud(cloud: &Cloud) -> Option<Value> {
    Node::new()
        .with("@domain", generate_plain_string(cloud.domain.as_deref()))
        .with("@port", generate_number(cloud.port))
        .with("@path", generate_plain_string(cloud.path.as_deref()))
        .with(
            "@registerProcedure",
            generate_plain_string(cloud.register_procedure.as_deref()),
        )
        .with("@protocol", generate_plain_string(cloud.protocol.as_deref()))
        .into_value()
}

fn generate_image(image: &Image) -> Option<Value> {
    Node::new()
        .with("url", generate_plain_string(image.url.as_deref()))
        .with("title", generate_cdata_string(image.title.as_deref()))
        .with("link", generate_plain_string(image.link.as_deref()))
        .with("description", generate_cdata_string(image.description.as_deref()))
        .with("height", generate_number(image.height))
        .with("width", generate_number(image.width))
        .into_value()
}

fn generate_text_input(text_input: &TextInput) -> Option<Value> {
    Node::new()
        .with("title", generate_cdata_string(text_input.title.as_deref()))
        .with("description", generate_cdata_string(text_input.description.as_deref()))
        .with("name", generate_plain_string(text_input.name.as_deref()))
        .with("link", generate_plain_string(text_input.link.as_deref()))
        .into_value()
}

fn generate_enclosure(enclosure: &Enclosure) -> Option<Value> {
    Node::new()
        .with("@url", generate_plain_string(enclosure.url.as_deref()))
        .with("@length", generate_number(enclosure.length))
        .with("@type", generate_plain_string(enclosure.kind.as_deref()))
        .into_value()
}

fn generate_guid(guid: &Guid) -> Option<Value> {
    let value = generate_text_or_cdata_string(guid.value.as_deref())?;
    match generate_boolean(guid.is_perma_link) {
        Some(is_perma_link) => Node::new()
            .with("@isPermaLink", Some(is_perma_link))
            .with_entry(Some(value))
            .into_value(),
        None => Some(value.1),
    }
}

fn generate_source(source: &Source) -> Option<Value> {
    Node::new()
        .with("@url", generate_plain_string(source.url.as_deref()))
        .with_entry(generate_text_or_cdata_string(source.title.as_deref()))
        .into_value()
}
