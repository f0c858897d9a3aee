//! Integration tests: generate a typed document, parse the output, and get
//! the same document back. Also covers the prefix-independence of extension
//! namespaces and the exact shape of minimal parse results.

use chrono::{TimeZone, Utc};
use feedcraft::feeds::{atom, json, rss};
use feedcraft::namespaces::{dc, georss, itunes, media, podcast};
use feedcraft::opml::{self, Body, Opml, Outline};
use feedcraft::tree::Value;
use feedcraft::{FeedError, Format, GenerateOptions, ParseOptions, Stylesheet};
use pretty_assertions::assert_eq;

fn podcast_feed() -> rss::Feed {
    rss::Feed {
        title: Some("The Show".to_string()),
        link: Some("https://show.example".to_string()),
        description: Some("Weekly <b>talk</b> & news".to_string()),
        language: Some("en-us".to_string()),
        pub_date: Some(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()),
        ttl: Some(60.0),
        itunes: Some(itunes::Feed {
            author: Some("Host".to_string()),
            explicit: Some(false),
            image: Some("https://show.example/cover.jpg".to_string()),
            ..Default::default()
        }),
        dc: Some(dc::ItemOrFeed {
            creators: Some(vec!["Host".to_string()]),
            ..Default::default()
        }),
        podcast: Some(podcast::Feed {
            locked: Some(podcast::Locked {
                value: true,
                owner: Some("host@show.example".to_string()),
            }),
            guid: Some("917393e3-1b1e-5cef-ace4-edaa54e1f810".to_string()),
            ..Default::default()
        }),
        items: Some(vec![rss::Item {
            title: Some("Episode 1".to_string()),
            guid: Some(rss::Guid {
                value: Some("ep-1".to_string()),
                is_perma_link: Some(false),
            }),
            enclosures: Some(vec![rss::Enclosure {
                url: Some("https://show.example/ep1.mp3".to_string()),
                length: Some(12345.0),
                kind: Some("audio/mpeg".to_string()),
            }]),
            itunes: Some(itunes::Item {
                duration: Some(3723.0),
                episode: Some(1.0),
                ..Default::default()
            }),
            podcast: Some(podcast::Item {
                transcripts: Some(vec![podcast::Transcript {
                    url: "https://show.example/ep1.vtt".to_string(),
                    kind: "text/vtt".to_string(),
                    language: Some("en".to_string()),
                    rel: None,
                }]),
                chapters: Some(podcast::Chapters {
                    url: "https://show.example/ep1.json".to_string(),
                    kind: "application/json+chapters".to_string(),
                }),
                ..Default::default()
            }),
            media: Some(media::ItemOrFeed {
                contents: Some(vec![media::Content {
                    url: Some("https://show.example/ep1.mp4".to_string()),
                    medium: Some("video".to_string()),
                    is_default: Some(true),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            georss: Some(georss::ItemOrFeed {
                point: Some(georss::Point {
                    lat: 45.256,
                    lng: -71.92,
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_rss_podcast_round_trip() {
    let feed = podcast_feed();
    let xml = rss::generate(&feed, &GenerateOptions::default()).unwrap();

    assert!(xml.contains(r#"xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd""#));
    assert!(xml.contains(r#"xmlns:podcast="https://podcastindex.org/namespace/1.0""#));
    assert!(xml.contains(r#"xmlns:media="http://search.yahoo.com/mrss/""#));
    assert!(xml.contains(r#"xmlns:georss="http://www.georss.org/georss""#));
    assert!(xml.contains("<![CDATA[Weekly <b>talk</b> & news]]>"));

    let parsed = rss::parse(&xml, &ParseOptions::default()).unwrap();
    assert_eq!(parsed, feed);
}

#[test]
fn test_entity_text_survives_cdata_round_trip() {
    let feed = rss::Feed {
        title: Some("Fish &amp; Chips".to_string()),
        link: Some("https://t.example".to_string()),
        description: Some("Escaped &lt;b&gt; stays escaped".to_string()),
        ..Default::default()
    };

    let xml = rss::generate(&feed, &GenerateOptions::default()).unwrap();
    assert!(xml.contains("<![CDATA[Fish &amp; Chips]]>"));
    assert_eq!(rss::parse(&xml, &ParseOptions::default()).unwrap(), feed);
}

#[test]
fn test_atom_round_trip() {
    let feed = atom::Feed {
        id: Some("urn:uuid:60a76c80-d399-11d9-b93c-0003939e0af6".to_string()),
        title: Some("Example Feed".to_string()),
        updated: Some(Utc.with_ymd_and_hms(2003, 12, 13, 18, 30, 2).unwrap()),
        authors: Some(vec![atom::Person {
            name: Some("John Doe".to_string()),
            ..Default::default()
        }]),
        links: Some(vec![atom::Link {
            href: Some("http://example.org/".to_string()),
            ..Default::default()
        }]),
        entries: Some(vec![atom::Entry {
            id: Some("urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a".to_string()),
            title: Some("Atom-Powered Robots Run Amok".to_string()),
            updated: Some(Utc.with_ymd_and_hms(2003, 12, 13, 18, 30, 2).unwrap()),
            summary: Some("Some text.".to_string()),
            ..Default::default()
        }]),
        ..Default::default()
    };

    let xml = atom::generate(&feed, &GenerateOptions::default()).unwrap();
    assert!(xml.contains(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#));
    assert!(xml.contains("<updated>2003-12-13T18:30:02.000Z</updated>"));

    assert_eq!(atom::parse(&xml, &ParseOptions::default()).unwrap(), feed);
}

#[test]
fn test_json_feed_round_trip_through_text() {
    let feed = json::Feed {
        title: Some("JSON".to_string()),
        authors: Some(vec![json::Author {
            name: Some("Ann".to_string()),
            ..Default::default()
        }]),
        items: Some(vec![json::Item {
            id: Some("1".to_string()),
            content_text: Some("Hello".to_string()),
            ..Default::default()
        }]),
        ..Default::default()
    };

    let generated = json::generate(&feed, &GenerateOptions::default()).unwrap();
    let text = serde_json::to_string(&generated).unwrap();

    match feedcraft::parse(&text, &ParseOptions::default()).unwrap() {
        feedcraft::ParsedFeed::Json(parsed) => assert_eq!(parsed, feed),
        other => panic!("expected JSON Feed, got {}", other.format()),
    }
}

#[test]
fn test_opml_round_trip() {
    let document = Opml {
        head: None,
        body: Some(Body {
            outlines: Some(vec![Outline {
                text: Some("Feeds".to_string()),
                outlines: Some(vec![Outline {
                    text: Some("Example".to_string()),
                    kind: Some("rss".to_string()),
                    xml_url: Some("https://example.com/feed.xml".to_string()),
                    is_comment: Some(true),
                    ..Default::default()
                }]),
                ..Default::default()
            }]),
        }),
    };

    let xml = opml::generate(&document, &GenerateOptions::default()).unwrap();
    assert_eq!(opml::parse(&xml, &ParseOptions::default()).unwrap(), document);
}

// ============================================================================
// Generation Options
// ============================================================================

#[test]
fn test_stylesheet_and_compact_output() {
    let options = GenerateOptions {
        pretty: false,
        stylesheets: vec![Stylesheet {
            kind: "text/xsl".to_string(),
            href: "/feed.xsl".to_string(),
            title: None,
            media: None,
        }],
        ..Default::default()
    };
    let feed = rss::Feed {
        title: Some("T".to_string()),
        link: Some("https://t.example".to_string()),
        description: Some("D".to_string()),
        ..Default::default()
    };

    let xml = rss::generate(&feed, &options).unwrap();
    assert!(xml.contains(r#"<?xml-stylesheet type="text/xsl" href="/feed.xsl"?>"#));
    assert!(!xml.contains('\n'));
}

#[test]
fn test_strict_and_lenient_generation() {
    let incomplete = rss::Feed {
        title: Some("Only a title".to_string()),
        ..Default::default()
    };

    assert!(matches!(
        rss::generate(&incomplete, &GenerateOptions::default()),
        Err(FeedError::MissingField {
            format: Format::Rss,
            field: "link"
        })
    ));

    let lenient = GenerateOptions {
        lenient: true,
        ..Default::default()
    };
    let xml = rss::generate(&incomplete, &lenient).unwrap();
    assert!(xml.contains("<title>Only a title</title>"));
}

// ============================================================================
// Namespace Prefix Invariance
// ============================================================================

fn itunes_author_with_prefix(prefix: &str) -> Option<String> {
    let xml = format!(
        r#"<rss version="2.0" xmlns:{prefix}="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>T</title>
    <{prefix}:author>Jane</{prefix}:author>
  </channel>
</rss>"#
    );
    rss::parse(&xml, &ParseOptions::default())
        .unwrap()
        .itunes
        .and_then(|itunes| itunes.author)
}

#[test]
fn test_extension_fields_do_not_depend_on_prefix() {
    for prefix in ["itunes", "ITUNES", "podcast_itunes", "i"] {
        assert_eq!(
            itunes_author_with_prefix(prefix),
            Some("Jane".to_string()),
            "prefix {prefix}"
        );
    }
}

#[test]
fn test_atom_alias_prefixes_in_rss() {
    for prefix in ["atom", "a10", "atom10"] {
        let xml = format!(
            r#"<rss version="2.0" xmlns:{prefix}="http://www.w3.org/2005/Atom">
  <channel>
    <title>T</title>
    <{prefix}:link href="https://t.example/feed" rel="self"/>
  </channel>
</rss>"#
        );
        let feed = rss::parse(&xml, &ParseOptions::default()).unwrap();
        let links = feed.atom.and_then(|atom| atom.links).expect("atom links");
        assert_eq!(links[0].href.as_deref(), Some("https://t.example/feed"));
        assert_eq!(links[0].rel.as_deref(), Some("self"));
    }
}

#[test]
fn test_content_encoded_does_not_depend_on_prefix() {
    let parse_with = |prefix: &str| {
        let xml = format!(
            r#"<rss version="2.0" xmlns:{prefix}="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>T</title>
    <item>
      <title>I</title>
      <{prefix}:encoded><![CDATA[<p>Full <em>text</em></p>]]></{prefix}:encoded>
    </item>
  </channel>
</rss>"#
        );
        rss::parse(&xml, &ParseOptions::default()).expect("Failed to parse RSS")
    };

    let canonical = parse_with("content");
    let items = canonical.items.as_ref().expect("items");
    assert_eq!(
        items[0].content.as_ref().and_then(|content| content.encoded.as_deref()),
        Some("<p>Full <em>text</em></p>")
    );
    for prefix in ["c", "Content", "fulltext"] {
        assert_eq!(parse_with(prefix), canonical, "prefix {prefix}");
    }
}

#[test]
fn test_atom_document_does_not_depend_on_prefix() {
    let parse_with = |prefix: &str| {
        let xml = format!(
            r#"<?xml version="1.0"?>
<{prefix}:feed xmlns:{prefix}="http://www.w3.org/2005/Atom">
  <{prefix}:id>urn:feed</{prefix}:id>
  <{prefix}:title>Feed</{prefix}:title>
  <{prefix}:link href="https://example.com/" rel="alternate"/>
  <{prefix}:entry>
    <{prefix}:id>urn:entry:1</{prefix}:id>
    <{prefix}:title>First</{prefix}:title>
    <{prefix}:updated>2024-05-01T12:00:00Z</{prefix}:updated>
    <{prefix}:content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml">Body</div></{prefix}:content>
  </{prefix}:entry>
</{prefix}:feed>"#
        );
        atom::parse(&xml, &ParseOptions::default()).expect("Failed to parse Atom")
    };

    let canonical = parse_with("atom");
    assert_eq!(canonical.id.as_deref(), Some("urn:feed"));
    let entries = canonical.entries.as_ref().expect("entries");
    assert_eq!(
        entries[0].content.as_deref(),
        Some(r#"<div xmlns="http://www.w3.org/1999/xhtml">Body</div>"#)
    );
    for prefix in ["a10", "atom10", "syn"] {
        assert_eq!(parse_with(prefix), canonical, "prefix {prefix}");
    }
}

// ============================================================================
// Minimal Documents
// ============================================================================

#[test]
fn test_minimal_rss_yields_exactly_three_fields() {
    let xml = r#"<rss version="2.0"><channel><title>T</title><link>https://x</link><description>D</description></channel></rss>"#;
    let feed = rss::parse(xml, &ParseOptions::default()).unwrap();

    assert_eq!(
        serde_json::to_value(&feed).unwrap(),
        serde_json::json!({"title": "T", "link": "https://x", "description": "D"})
    );
}

#[test]
fn test_json_values_are_accepted_directly() {
    let value = Value::from(serde_json::json!({
        "version": "https://jsonfeed.org/version/1.1",
        "title": "Direct",
        "items": [{"id": "a"}]
    }));
    let feed = json::parse(&value, &ParseOptions::default()).unwrap();
    assert_eq!(feed.items.map(|items| items.len()), Some(1));
}
