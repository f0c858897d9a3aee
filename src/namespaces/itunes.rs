//! Apple Podcasts tags (`itunes:`).
//!
//! Element names are matched in their normalized lower-case form
//! (`itunes:episodetype`) and generated in Apple's documented spelling
//! (`itunes:episodeType`).

use serde::{Deserialize, Serialize};

use crate::tree::{Node, Value};
use crate::util::{
    generate_array_of, generate_boolean, generate_cdata_string, generate_csv_of,
    generate_number, generate_plain_string, generate_yes_no_boolean, parse_array_of,
    parse_csv_of, parse_singular_of, parse_string, parse_text_number, parse_text_string,
    parse_yes_no_boolean, retrieve_text, trim_object,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `episodic` or `serial`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_feed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apple_podcasts_verify: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<f64>,
    /// `full`, `trailer` or `bonus`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// `true`/`yes`/`explicit` and `false`/`no`/`clean`, in any case.
pub fn parse_explicit(value: &Value) -> Option<bool> {
    let text = retrieve_text(value).and_then(parse_string)?;
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "explicit" => Some(true),
        "false" | "no" | "clean" => Some(false),
        _ => None,
    }
}

/// Seconds, or `[[HH:]MM:]SS` with optional fractional seconds.
pub fn parse_duration(value: &Value) -> Option<f64> {
    if let Some(seconds) = parse_text_number(value) {
        return (seconds >= 0.0).then_some(seconds);
    }

    let text = parse_text_string(value)?;
    let parts = text
        .split(':')
        .map(|part| part.trim().parse::<f64>().ok().filter(|n| n.is_finite() && *n >= 0.0))
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    Some(parts.iter().fold(0.0, |total, part| total * 60.0 + part))
}

/// `<itunes:image href="..."/>`, tolerating feeds that put the URL in the
/// element text instead.
fn parse_image(value: &Value) -> Option<String> {
    match value {
        Value::Node(node) => node
            .get("@href")
            .and_then(parse_string)
            .or_else(|| parse_text_string(value)),
        other => parse_string(other),
    }
}

fn parse_category(value: &Value) -> Option<Category> {
    let node = value.as_node()?;
    trim_object(Category {
        text: node.get("@text").and_then(parse_string),
        categories: parse_array_of(node.get("itunes:category"), parse_category),
    })
}

fn parse_owner(value: &Value) -> Option<Owner> {
    let node = value.as_node()?;
    trim_object(Owner {
        name: parse_singular_of(node.get("itunes:name"), parse_text_string),
        email: parse_singular_of(node.get("itunes:email"), parse_text_string),
    })
}

fn parse_keywords(value: &Value) -> Option<Vec<String>> {
    parse_csv_of(value, parse_string)
}

pub fn retrieve_feed(node: &Node) -> Option<Feed> {
    let text = |key: &str| parse_singular_of(node.get(key), parse_text_string);

    trim_object(Feed {
        image: parse_singular_of(node.get("itunes:image"), parse_image),
        categories: parse_array_of(node.get("itunes:category"), parse_category),
        explicit: parse_singular_of(node.get("itunes:explicit"), parse_explicit),
        author: text("itunes:author"),
        title: text("itunes:title"),
        kind: text("itunes:type"),
        new_feed_url: text("itunes:new-feed-url"),
        block: parse_singular_of(node.get("itunes:block"), parse_yes_no_boolean),
        complete: parse_singular_of(node.get("itunes:complete"), parse_yes_no_boolean),
        apple_podcasts_verify: text("itunes:applepodcastsverify"),
        owner: parse_singular_of(node.get("itunes:owner"), parse_owner),
        summary: text("itunes:summary"),
        subtitle: text("itunes:subtitle"),
        keywords: parse_singular_of(node.get("itunes:keywords"), parse_keywords),
    })
}

pub fn retrieve_item(node: &Node) -> Option<Item> {
    let text = |key: &str| parse_singular_of(node.get(key), parse_text_string);
    let number = |key: &str| parse_singular_of(node.get(key), parse_text_number);

    trim_object(Item {
        duration: parse_singular_of(node.get("itunes:duration"), parse_duration),
        image: parse_singular_of(node.get("itunes:image"), parse_image),
        explicit: parse_singular_of(node.get("itunes:explicit"), parse_explicit),
        title: text("itunes:title"),
        episode: number("itunes:episode"),
        season: number("itunes:season"),
        episode_type: text("itunes:episodetype"),
        block: parse_singular_of(node.get("itunes:block"), parse_yes_no_boolean),
        summary: text("itunes:summary"),
        subtitle: text("itunes:subtitle"),
        keywords: parse_singular_of(node.get("itunes:keywords"), parse_keywords),
    })
}

fn generate_image(href: Option<&str>) -> Option<Value> {
    let href = generate_plain_string(href)?;
    Node::new().with("@href", Some(href)).into_value()
}

fn generate_category(category: &Category) -> Option<Value> {
    Node::new()
        .with("@text", generate_plain_string(category.text.as_deref()))
        .with(
            "itunes:category",
            generate_array_of(category.categories.as_deref(), generate_category),
        )
        .into_value()
}

fn generate_owner(owner: Option<&Owner>) -> Option<Value> {
    let owner = owner?;
    Node::new()
        .with("itunes:name", generate_cdata_string(owner.name.as_deref()))
        .with("itunes:email", generate_plain_string(owner.email.as_deref()))
        .into_value()
}

pub fn generate_feed(feed: &Feed) -> Option<Node> {
    Node::new()
        .with("itunes:image", generate_image(feed.image.as_deref()))
        .with(
            "itunes:category",
            generate_array_of(feed.categories.as_deref(), generate_category),
        )
        .with("itunes:explicit", generate_boolean(feed.explicit))
        .with("itunes:author", generate_cdata_string(feed.author.as_deref()))
        .with("itunes:title", generate_cdata_string(feed.title.as_deref()))
        .with("itunes:type", generate_plain_string(feed.kind.as_deref()))
        .with("itunes:new-feed-url", generate_plain_string(feed.new_feed_url.as_deref()))
        .with("itunes:block", generate_yes_no_boolean(feed.block))
        .with("itunes:complete", generate_yes_no_boolean(feed.complete))
        .with(
            "itunes:applepodcastsverify",
            generate_plain_string(feed.apple_podcasts_verify.as_deref()),
        )
        .with("itunes:owner", generate_owner(feed.owner.as_ref()))
        .with("itunes:summary", generate_cdata_string(feed.summary.as_deref()))
        .with("itunes:subtitle", generate_cdata_string(feed.subtitle.as_deref()))
        .with("itunes:keywords", generate_csv_of(feed.keywords.as_deref()))
        .trimmed()
}

pub fn generate_item(item: &Item) -> Option<Node> {
    Node::new()
        .with("itunes:duration", generate_number(item.duration))
        .with("itunes:image", generate_image(item.image.as_deref()))
        .with("itunes:explicit", generate_boolean(item.explicit))
        .with("itunes:title", generate_cdata_string(item.title.as_deref()))
        .with("itunes:episode", generate_number(item.episode))
        .with("itunes:season", generate_number(item.season))
        .with("itunes:episodeType", generate_plain_string(item.episode_type.as_deref()))
        .with("itunes:block", generate_yes_no_boolean(item.block))
        .with("itunes:summary", generate_cdata_string(item.summary.as_deref()))
        .with("itunes:subtitle", generate_cdata_string(item.subtitle.as_deref()))
        .with("itunes:keywords", generate_csv_of(item.keywords.as_deref()))
        .trimmed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::NamespaceNormalizer;
    use crate::namespaces::NamespaceTable;
    use crate::tree::read_tree;
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

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration(&"3600".into()), Some(3600.0));
        assert_eq!(parse_duration(&"1:02:03".into()), Some(3723.0));
        assert_eq!(parse_duration(&"02:03".into()), Some(123.0));
        assert_eq!(parse_duration(&"1:02:03.5".into()), Some(3723.5));
        assert_eq!(parse_duration(&"1:2:3:4".into()), None);
        assert_eq!(parse_duration(&"soon".into()), None);
        assert_eq!(parse_duration(&"-5".into()), None);
    }

    #[test]
    fn test_parse_explicit() {
        for (input, expected) in [
            ("yes", Some(true)),
            ("Explicit", Some(true)),
            ("true", Some(true)),
            ("no", Some(false)),
            ("clean", Some(false)),
            ("FALSE", Some(false)),
            ("maybe", None),
        ] {
            assert_eq!(parse_explicit(&input.into()), expected, "input: {input}");
        }
    }

    #[test]
    fn test_retrieve_feed_from_document() {
        let channel = channel(
            r#"<rss xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd"><channel>
                <itunes:image href="https://example.com/cover.jpg"/>
                <itunes:category text="Technology">
                    <itunes:category text="Podcasting"/>
                </itunes:category>
                <itunes:category text="News"/>
                <itunes:explicit>yes</itunes:explicit>
                <itunes:owner>
                    <itunes:name>Jane</itunes:name>
                    <itunes:email>jane@example.com</itunes:email>
                </itunes:owner>
                <itunes:new-feed-url>https://example.com/new</itunes:new-feed-url>
                <itunes:complete>Yes</itunes:complete>
                <itunes:keywords>rust, feeds</itunes:keywords>
            </channel></rss>"#,
        );

        let feed = retrieve_feed(&channel).expect("itunes feed fields should parse");
        assert_eq!(feed.image.as_deref(), Some("https://example.com/cover.jpg"));
        assert_eq!(
            feed.categories,
            Some(vec![
                Category {
                    text: Some("Technology".to_string()),
                    categories: Some(vec![Category {
                        text: Some("Podcasting".to_string()),
                        categories: None,
                    }]),
                },
                Category {
                    text: Some("News".to_string()),
                    categories: None,
                },
            ])
        );
        assert_eq!(feed.explicit, Some(true));
        assert_eq!(
            feed.owner,
            Some(Owner {
                name: Some("Jane".to_string()),
                email: Some("jane@example.com".to_string()),
            })
        );
        assert_eq!(feed.new_feed_url.as_deref(), Some("https://example.com/new"));
        assert_eq!(feed.complete, Some(true));
        assert_eq!(feed.keywords, Some(vec!["rust".to_string(), "feeds".to_string()]));
    }

    #[test]
    fn test_retrieve_item_with_camel_case_source_tags() {
        let item = Node::new()
            .with("itunes:duration", Some("00:10:00"))
            .with("itunes:episodetype", Some("trailer"))
            .with("itunes:episode", Some("3"));
        let parsed = retrieve_item(&item).unwrap();
        assert_eq!(parsed.duration, Some(600.0));
        assert_eq!(parsed.episode_type.as_deref(), Some("trailer"));
        assert_eq!(parsed.episode, Some(3.0));
    }

    #[test]
    fn test_generate_feed_uses_documented_tag_spelling() {
        let feed = Feed {
            image: Some("https://example.com/cover.jpg".to_string()),
            block: Some(false),
            owner: Some(Owner {
                name: Some("Jane".to_string()),
                email: None,
            }),
            ..Default::default()
        };
        let node = generate_feed(&feed).unwrap();
        assert_eq!(
            node.get("itunes:image"),
            Some(&Value::Node(
                Node::new().with("@href", Some("https://example.com/cover.jpg"))
            ))
        );
        assert_eq!(node.get("itunes:block"), Some(&Value::from("no")));
        assert!(node.contains_key("itunes:owner"));
        assert_eq!(generate_feed(&Feed::default()), None);
    }

    #[test]
    fn test_generate_item() {
        let item = Item {
            episode_type: Some("full".to_string()),
            duration: Some(90.0),
            ..Default::default()
        };
        let node = generate_item(&item).unwrap();
        assert_eq!(node.get("itunes:episodeType"), Some(&Value::from("full")));
        assert_eq!(node.get("itunes:duration"), Some(&Value::Number(90.0)));
    }
}
