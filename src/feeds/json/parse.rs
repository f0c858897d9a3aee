use super::{Attachment, Author, Feed, Hub, Item};
use crate::config::ParseOptions;
use crate::detect::detect_json_feed;
use crate::error::{FeedError, Format};
use crate::tree::{CaseInsensitive, Value};
use crate::util::{
    parse_array_of, parse_array_of_limited, parse_boolean, parse_date_value, parse_number,
    parse_singular_of, parse_string, trim_object,
};

/// Parses a JSON Feed document that has already been decoded from JSON.
///
/// Keys are matched case-insensitively. Version 1.0 `author` objects are
/// folded into `authors` when no `authors` list is present.
///
/// # Errors
///
/// [`FeedError::InvalidInput`] when the value does not look like a JSON
/// Feed or nothing usable could be extracted from it.
///
/// # Examples
///
/// ```
/// use feedcraft::feeds::json;
/// use feedcraft::tree::Value;
/// use feedcraft::ParseOptions;
///
/// let value = Value::from_json_str(
///     r#"{"version": "https://jsonfeed.org/version/1.1", "title": "T", "items": []}"#,
/// ).unwrap();
/// let feed = json::parse(&value, &ParseOptions::default()).unwrap();
/// assert_eq!(feed.title.as_deref(), Some("T"));
/// ```
pub fn parse(value: &Value, options: &ParseOptions) -> Result<Feed, FeedError> {
    if !detect_json_feed(value) {
        return Err(FeedError::InvalidInput(Format::Json));
    }

    parse_feed(value, options.max_items).ok_or(FeedError::InvalidInput(Format::Json))
}

fn parse_feed(value: &Value, max_items: Option<usize>) -> Option<Feed> {
    let get = CaseInsensitive::new(value.as_node()?);
    let text = |key: &str| parse_singular_of(get.get(key), parse_string);

    trim_object(Feed {
        title: text("title"),
        home_page_url: text("home_page_url"),
        feed_url: text("feed_url"),
        description: text("description"),
        user_comment: text("user_comment"),
        next_url: text("next_url"),
        icon: text("icon"),
        favicon: text("favicon"),
        language: text("language"),
        expired: parse_singular_of(get.get("expired"), parse_boolean),
        hubs: parse_array_of(get.get("hubs"), parse_hub),
        authors: retrieve_authors(get),
        items: parse_array_of_limited(get.get("items"), parse_item, max_items),
    })
}

fn parse_item(value: &Value) -> Option<Item> {
    let get = CaseInsensitive::new(value.as_node()?);
    let text = |key: &str| parse_singular_of(get.get(key), parse_string);

    trim_object(Item {
        id: text("id"),
        url: text("url"),
        external_url: text("external_url"),
        title: text("title"),
        content_html: text("content_html"),
        content_text: text("content_text"),
        summary: text("summary"),
        image: text("image"),
        banner_image: text("banner_image"),
        date_published: parse_singular_of(get.get("date_published"), parse_date_value),
        date_modified: parse_singular_of(get.get("date_modified"), parse_date_value),
        tags: parse_array_of(get.get("tags"), parse_string),
        authors: retrieve_authors(get),
        language: text("language"),
        attachments: parse_array_of(get.get("attachments"), parse_attachment),
    })
}

/// `authors` (1.1) wins; `author` (1.0) is the fallback.
fn retrieve_authors(get: CaseInsensitive<'_>) -> Option<Vec<Author>> {
    parse_array_of(get.get("authors"), parse_author)
        .or_else(|| parse_array_of(get.get("author"), parse_author))
}

/// An author object, or a bare string taken as the name.
fn parse_author(value: &Value) -> Option<Author> {
    let Some(node) = value.as_node() else {
        return trim_object(Author {
            name: parse_string(value),
            ..Default::default()
        });
    };
    let get = CaseInsensitive::new(node);
    let text = |key: &str| parse_singular_of(get.get(key), parse_string);

    trim_object(Author {
        name: text("name"),
        url: text("url"),
        avatar: text("avatar"),
    })
}

fn parse_attachment(value: &Value) -> Option<Attachment> {
    let get = CaseInsensitive::new(value.as_node()?);
    let text = |key: &str| parse_singular_of(get.get(key), parse_string);
    let number = |key: &str| parse_singular_of(get.get(key), parse_number);

    trim_object(Attachment {
        url: text("url"),
        mime_type: text("mime_type"),
        title: text("title"),
        size_in_bytes: number("size_in_bytes"),
        duration_in_seconds: number("duration_in_seconds"),
    })
}

fn parse_hub(value: &Value) -> Option<Hub> {
    let get = CaseInsensitive::new(value.as_node()?);
    let text = |key: &str| parse_singular_of(get.get(key), parse_string);

    trim_object(Hub {
        kind: text("type"),
        url: text("url"),
    })
}
