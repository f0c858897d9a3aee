use super::{Category, Dialect, Entry, Feed, Generator, Link, Person, Source, ATOM_NAMESPACE_URI};
use crate::config::GenerateOptions;
use crate::error::{FeedError, Format};
use crate::namespaces::{dc, georss, itunes, media, podcast, slash, sy, NamespaceTable};
use crate::tree::{write_document, Node, Value, CDATA_KEY};
use crate::util::{
    generate_array_of, generate_cdata_string, generate_namespace_attrs, generate_number,
    generate_plain_string, generate_rfc3339_date, generate_text_or_cdata_string,
};

/// Generates an Atom 1.0 document.
///
/// Unless `options.lenient` is set, the feed must carry `id`, `title` and
/// `updated`, and so must every entry.
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

    let body = generate_feed_fields(feed, Dialect::STANDALONE)
        .ok_or(FeedError::InvalidInput(Format::Atom))?;
    let root = Node::new()
        .with("@xmlns", Some(ATOM_NAMESPACE_URI))
        .merge(generate_namespace_attrs(&body, NamespaceTable::standard()))
        .merge(Some(body));

    write_document(&Node::new().with("feed", Some(root)), options)
}

fn require<T>(value: &Option<T>, field: &'static str) -> Result<(), FeedError> {
    match value {
        Some(_) => Ok(()),
        None => Err(FeedError::MissingField {
            format: Format::Atom,
            field,
        }),
    }
}

fn validate(feed: &Feed) -> Result<(), FeedError> {
    require(&feed.id, "id")?;
    require(&feed.title, "title")?;
    require(&feed.updated, "updated")?;
    for entry in feed.entries.iter().flatten() {
        require(&entry.id, "entry.id")?;
        require(&entry.title, "entry.title")?;
        require(&entry.updated, "entry.updated")?;
    }
    Ok(())
}

pub(crate) fn generate_feed_fields(feed: &Feed, dialect: Dialect) -> Option<Node> {
    let key = |name: &str| dialect.key(name);

    let mut node = Node::new()
        .with(&key("id"), generate_plain_string(feed.id.as_deref()))
        .with(&key("title"), generate_text_construct(feed.title.as_deref()))
        .with(&key("updated"), generate_rfc3339_date(feed.updated))
        .with(&key("author"), generate_people(feed.authors.as_deref(), dialect))
        .with(&key("contributor"), generate_people(feed.contributors.as_deref(), dialect))
        .with(&key("link"), generate_array_of(feed.links.as_deref(), generate_link))
        .with(&key("category"), generate_array_of(feed.categories.as_deref(), generate_category))
        .with(&key("generator"), generate_generator(feed.generator.as_ref()))
        .with(&key("icon"), generate_plain_string(feed.icon.as_deref()))
        .with(&key("logo"), generate_plain_string(feed.logo.as_deref()))
        .with(&key("rights"), generate_text_construct(feed.rights.as_deref()))
        .with(&key("subtitle"), generate_text_construct(feed.subtitle.as_deref()));

    if dialect.standalone {
        node = node
            .merge(feed.dc.as_ref().and_then(dc::generate_item_or_feed))
            .merge(feed.sy.as_ref().and_then(sy::generate_feed))
            .merge(feed.itunes.as_ref().and_then(itunes::generate_feed))
            .merge(feed.podcast.as_ref().and_then(podcast::generate_feed))
            .merge(feed.media.as_ref().and_then(media::generate_item_or_feed))
            .merge(feed.georss.as_ref().and_then(georss::generate_item_or_feed))
            .with(
                &key("entry"),
                generate_array_of(feed.entries.as_deref(), |entry| {
                    generate_entry_fields(entry, dialect).map(Value::Node)
                }),
            );
    }
    node.trimmed()
}

pub(crate) fn generate_entry_fields(entry: &Entry, dialect: Dialect) -> Option<Node> {
    let key = |name: &str| dialect.key(name);

    let mut node = Node::new()
        .with(&key("id"), generate_plain_string(entry.id.as_deref()))
        .with(&key("title"), generate_text_construct(entry.title.as_deref()))
        .with(&key("updated"), generate_rfc3339_date(entry.updated))
        .with(&key("published"), generate_rfc3339_date(entry.published))
        .with(&key("author"), generate_people(entry.authors.as_deref(), dialect))
        .with(&key("contributor"), generate_people(entry.contributors.as_deref(), dialect))
        .with(&key("link"), generate_array_of(entry.links.as_deref(), generate_link))
        .with(&key("category"), generate_array_of(entry.categories.as_deref(), generate_category))
        .with(&key("rights"), generate_text_construct(entry.rights.as_deref()))
        .with(&key("summary"), generate_text_construct(entry.summary.as_deref()))
        .with(&key("content"), generate_text_construct(entry.content.as_deref()))
        .with(&key("source"), generate_source(entry.source.as_ref(), dialect));

    if dialect.standalone {
        node = node
            .merge(entry.dc.as_ref().and_then(dc::generate_item_or_feed))
            .merge(entry.slash.as_ref().and_then(slash::generate_item))
            .merge(entry.itunes.as_ref().and_then(itunes::generate_item))
            .merge(entry.podcast.as_ref().and_then(podcast::generate_item))
            .merge(entry.media.as_ref().and_then(media::generate_item_or_feed))
            .merge(entry.georss.as_ref().and_then(georss::generate_item_or_feed));
    }
    node.trimmed()
}

/// Plain text as-is; markup as `type="html"` CDATA.
fn generate_text_construct(value: Option<&str>) -> Option<Value> {
    let (key, text) = generate_text_or_cdata_string(value)?;
    if key == CDATA_KEY {
        Node::new()
            .with("@type", Some("html"))
            .with(CDATA_KEY, Some(text))
            .into_value()
    } else {
        Some(text)
    }
}

fn generate_link(link: &Link) -> Option<Value> {
    Node::new()
        .with("@href", generate_plain_string(link.href.as_deref()))
        .with("@rel", generate_plain_string(link.rel.as_deref()))
        .with("@type", generate_plain_string(link.kind.as_deref()))
        .with("@hreflang", generate_plain_string(link.hreflang.as_deref()))
        .with("@title", generate_plain_string(link.title.as_deref()))
        .with("@length", generate_number(link.length))
        .into_value()
}

fn generate_person(person: &Person, dialect: Dialect) -> Option<Value> {
    Node::new()
        .with(&dialect.key("name"), generate_cdata_string(person.name.as_deref()))
        .with(&dialect.key("uri"), generate_plain_string(person.uri.as_deref()))
        .with(&dialect.key("email"), generate_plain_string(person.email.as_deref()))
        .into_value()
}

fn generate_people(people: Option<&[Person]>, dialect: Dialect) -> Option<Value> {
    generate_array_of(people, |person| generate_person(person, dialect))
}

fn generate_category(category: &Category) -> Option<Value> {
    Node::new()
        .with("@term", generate_plain_string(category.term.as_deref()))
        .with("@scheme", generate_plain_string(category.scheme.as_deref()))
        .with("@label", generate_plain_string(category.label.as_deref()))
        .into_value()
}

fn generate_generator(generator: Option<&Generator>) -> Option<Value> {
    let generator = generator?;
    Node::new()
        .with("@uri", generate_plain_string(generator.uri.as_deref()))
        .with("@version", generate_plain_string(generator.version.as_deref()))
        .with_entry(generate_text_or_cdata_string(generator.text.as_deref()))
        .into_value()
}

fn generate_source(source: Option<&Source>, dialect: Dialect) -> Option<Value> {
    let source = source?;
    let key = |name: &str| dialect.key(name);
    Node::new()
        .with(&key("id"), generate_plain_string(source.id.as_deref()))
        .with(&key("title"), generate_text_construct(source.title.as_deref()))
        .with(&key("updated"), generate_rfc3339_date(source.updated))
        .with(&key("author"), generate_people(source.authors.as_deref(), dialect))
        .with(&key("contributor"), generate_people(source.contributors.as_deref(), dialect))
        .with(&key("link"), generate_array_of(source.links.as_deref(), generate_link))
        .with(&key("category"), generate_array_of(source.categories.as_deref(), generate_category))
        .with(&key("generator"), generate_generator(source.generator.as_ref()))
        .with(&key("icon"), generate_plain_string(source.icon.as_deref()))
        .with(&key("logo"), generate_plain_string(source.logo.as_deref()))
        .with(&key("rights"), generate_text_construct(source.rights.as_deref()))
        .with(&key("subtitle"), generate_text_construct(source.subtitle.as_deref()))
        .into_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;
    use crate::feeds::atom::parse;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn minimal_feed() -> Feed {
        let updated = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Feed {
            id: Some("urn:feed".to_string()),
            title: Some("Feed & Co".to_string()),
            updated: Some(updated),
            links: Some(vec![Link {
                href: Some("https://example.com/".to_string()),
                ..Default::default()
            }]),
            entries: Some(vec![Entry {
                id: Some("urn:entry:1".to_string()),
                title: Some("First".to_string()),
                updated: Some(updated),
                content: Some("<p>Body</p>".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_declares_atom_namespace() {
        let xml = generate(&minimal_feed(), &GenerateOptions::default())
            .expect("Failed to generate Atom feed");
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#), "{xml}");
        assert!(xml.contains("<updated>2024-05-01T12:00:00.000Z</updated>"), "{xml}");
        assert!(xml.contains("<![CDATA[<p>Body</p>]]>"), "{xml}");
    }

    #[test]
    fn test_round_trip_recovers_required_fields() {
        let feed = minimal_feed();
        let xml = generate(&feed, &GenerateOptions::default()).unwrap();
        let parsed = parse(&xml, &ParseOptions::default()).expect("generated Atom should parse");

        assert_eq!(parsed.id, feed.id);
        assert_eq!(parsed.title, feed.title);
        assert_eq!(parsed.updated, feed.updated);
        assert_eq!(parsed.links, feed.links);
        let entries = parsed.entries.unwrap();
        let expected = feed.entries.unwrap();
        assert_eq!(entries[0].id, expected[0].id);
        assert_eq!(entries[0].title, expected[0].title);
        assert_eq!(entries[0].content, expected[0].content);
    }

    #[test]
    fn test_strict_generation_requires_fields() {
        let mut feed = minimal_feed();
        feed.updated = None;
        assert!(matches!(
            generate(&feed, &GenerateOptions::default()),
            Err(FeedError::MissingField {
                format: Format::Atom,
                field: "updated"
            })
        ));

        let mut feed = minimal_feed();
        if let Some(entries) = feed.entries.as_mut() {
            entries[0].id = None;
        }
        assert!(matches!(
            generate(&feed, &GenerateOptions::default()),
            Err(FeedError::MissingField { field: "entry.id", .. })
        ));
    }

    #[test]
    fn test_lenient_generation_skips_validation_but_not_emptiness() {
        let lenient = GenerateOptions {
            lenient: true,
            ..Default::default()
        };
        let feed = Feed {
            title: Some("Only a title".to_string()),
            ..Default::default()
        };
        assert!(generate(&feed, &lenient).is_ok());
        assert!(matches!(
            generate(&Feed::default(), &lenient),
            Err(FeedError::InvalidInput(Format::Atom))
        ));
    }

    #[test]
    fn test_embedded_dialect_prefixes_keys() {
        let feed = Feed {
            links: Some(vec![Link {
                href: Some("https://example.com/feed.xml".to_string()),
                rel: Some("self".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let node = generate_feed_fields(&feed, Dialect::EMBEDDED).unwrap();
        assert_eq!(node.keys().collect::<Vec<_>>(), vec!["atom:link"]);
    }
}
