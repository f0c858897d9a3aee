use super::{Attachment, Author, Feed, Hub, Item, JSON_FEED_VERSION};
use crate::config::GenerateOptions;
use crate::error::{FeedError, Format};
use crate::tree::{Node, Value};
use crate::util::{
    generate_array_of, generate_boolean, generate_number, generate_plain_string,
    generate_rfc3339_date,
};

/// Generates a JSON Feed 1.1 document.
///
/// Dates are written as RFC 3339 with milliseconds. Absent fields are
/// omitted rather than written as `null`.
///
/// # Errors
///
/// - [`FeedError::MissingField`] when strict and `title` or a non-empty
///   `items` list is absent
/// - [`FeedError::InvalidInput`] when the feed has no content at all, even
///   when lenient
pub fn generate(feed: &Feed, options: &GenerateOptions) -> Result<serde_json::Value, FeedError> {
    if !options.lenient {
        validate(feed)?;
    }

    let body = generate_feed(feed).ok_or(FeedError::InvalidInput(Format::Json))?;
    let document = Node::new()
        .with("version", Some(JSON_FEED_VERSION))
        .merge(Some(body));

    Ok(Value::Node(document).to_json())
}

fn missing(field: &'static str) -> FeedError {
    FeedError::MissingField {
        format: Format::Json,
        field,
    }
}

fn validate(feed: &Feed) -> Result<(), FeedError> {
    if feed.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        return Err(missing("title"));
    }
    if feed.items.as_ref().map_or(true, Vec::is_empty) {
        return Err(missing("items"));
    }
    Ok(())
}

fn text(value: &Option<String>) -> Option<Value> {
    generate_plain_string(value.as_deref())
}

fn generate_feed(feed: &Feed) -> Option<Node> {
    Node::new()
        .with("title", text(&feed.title))
        .with("home_page_url", text(&feed.home_page_url))
        .with("feed_url", text(&feed.feed_url))
        .with("description", text(&feed.description))
        .with("user_comment", text(&feed.user_comment))
        .with("next_url", text(&feed.next_url))
        .with("icon", text(&feed.icon))
        .with("favicon", text(&feed.favicon))
        .with("language", text(&feed.language))
        .with("expired", generate_boolean(feed.expired))
        .with("hubs", generate_array_of(feed.hubs.as_deref(), generate_hub))
        .with("authors", generate_array_of(feed.authors.as_deref(), generate_author))
        .with("items", generate_array_of(feed.items.as_deref(), generate_item))
        .trimmed()
}

fn generate_item(item: &Item) -> Option<Value> {
    Node::new()
        .with("id", text(&item.id))
        .with("url", text(&item.url))
        .with("external_url", text(&item.external_url))
        .with("title", text(&item.title))
        .with("content_html", text(&item.content_html))
        .with("content_text", text(&item.content_text))
        .with("summary", text(&item.summary))
        .with("image", text(&item.image))
        .with("banner_image", text(&item.banner_image))
        .with("date_published", generate_rfc3339_date(item.date_published.as_ref()))
        .with("date_modified", generate_rfc3339_date(item.date_modified.as_ref()))
        .with("language", text(&item.language))
        .with("authors", generate_array_of(item.authors.as_deref(), generate_author))
        .with(
            "tags",
            generate_array_of(item.tags.as_deref(), |tag| generate_plain_string(Some(tag.as_str()))),
        )
        .with(
            "attachments",
            generate_array_of(item.attachments.as_deref(), generate_attachment),
        )
        .into_value()
}

fn generate_author(author: &Author) -> Option<Value> {
    Node::new()
        .with("name", text(&author.name))
        .with("url", text(&author.url))
        .with("avatar", text(&author.avatar))
        .into_value()
}

fn generate_attachment(attachment: &Attachment) -> Option<Value> {
    Node::new()
        .with("url", text(&attachment.url))
        .with("mime_type", text(&attachment.mime_type))
        .with("title", text(&attachment.title))
        .with("size_in_bytes", generate_number(attachment.size_in_bytes))
        .with(
            "duration_in_seconds",
            generate_number(attachment.duration_in_seconds),
        )
        .into_value()
}

fn generate_hub(hub: &Hub) -> Option<Value> {
    Node::new()
        .with("type", text(&hub.kind))
        .with("url", text(&hub.url))
        .into_value()
}
