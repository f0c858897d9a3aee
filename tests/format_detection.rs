//! Integration tests for format detection and the format-agnostic parser.

use feedcraft::detect::{
    detect_atom_text, detect_chapters, detect_feed_format, detect_rdf_text, detect_rss_text,
    detect_transcripts,
};
use feedcraft::tree::Value;
use feedcraft::{FeedError, Format, ParseOptions};

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>RSS</title><item><title>One</title></item></channel></rss>"#;

const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"><title>Atom</title><entry><title>One</title></entry></feed>"#;

const RDF: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns="http://purl.org/rss/1.0/">
  <channel><title>RDF</title></channel>
  <item><title>One</title></item>
</rdf:RDF>"#;

const JSON_FEED: &str =
    r#"{"version": "https://jsonfeed.org/version/1.1", "title": "JSON", "items": [{"id": "1"}]}"#;

#[test]
fn test_each_feed_format_is_detected_by_its_detector_only() {
    assert!(detect_rss_text(RSS));
    assert!(!detect_atom_text(RSS));
    assert!(!detect_rdf_text(RSS));

    assert!(detect_atom_text(ATOM));
    assert!(!detect_rss_text(ATOM));
    assert!(!detect_rdf_text(ATOM));

    assert!(detect_rdf_text(RDF));
    assert!(!detect_rss_text(RDF));
    assert!(!detect_atom_text(RDF));
}

#[test]
fn test_detect_feed_format() {
    assert_eq!(detect_feed_format(RSS), Some(Format::Rss));
    assert_eq!(detect_feed_format(ATOM), Some(Format::Atom));
    assert_eq!(detect_feed_format(RDF), Some(Format::Rdf));
    assert_eq!(detect_feed_format(JSON_FEED), Some(Format::Json));
    assert_eq!(detect_feed_format("<html><head/></html>"), None);
    assert_eq!(detect_feed_format(""), None);
}

#[test]
fn test_top_level_parse_matches_detection() {
    for text in [RSS, ATOM, RDF, JSON_FEED] {
        let detected = detect_feed_format(text).expect("fixture should be detected");
        let parsed = feedcraft::parse(text, &ParseOptions::default()).unwrap();
        assert_eq!(parsed.format(), detected);
    }
}

#[test]
fn test_top_level_parse_rejects_unknown_text() {
    assert!(matches!(
        feedcraft::parse("just words", &ParseOptions::default()),
        Err(FeedError::UnrecognizedFormat)
    ));
}

#[test]
fn test_companion_document_detection() {
    let chapters = Value::from(r#"{"version": "1.2.0", "chapters": [{"startTime": 0}]}"#);
    let transcript = Value::from_json_str(
        r#"{"segments": [{"speaker": "A", "startTime": 0, "body": "Hi"}]}"#,
    )
    .unwrap();

    assert!(detect_chapters(&chapters));
    assert!(detect_transcripts(&transcript));
    assert!(!detect_chapters(&transcript));
    assert!(!detect_chapters(&Value::from("not json at all")));
}

#[test]
fn test_byte_order_mark_is_tolerated() {
    let with_bom = format!("\u{feff}{RSS}");
    assert!(detect_rss_text(&with_bom));
}
