//! Syndication feed formats and format-agnostic dispatch.
//!
//! Each format module exposes `parse` (and `generate` where the format is
//! writable) over its own typed model. [`parse`] picks the format itself.

use serde::Serialize;

use crate::config::ParseOptions;
use crate::detect::{detect_atom_text, detect_json_feed, detect_rdf_text, detect_rss_text};
use crate::error::{FeedError, Format};
use crate::tree::Value;

pub mod atom;
pub mod json;
pub mod rdf;
pub mod rss;

/// A feed of whichever format [`parse`] recognized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "feed", rename_all = "lowercase")]
pub enum ParsedFeed {
    Rss(rss::Feed),
    Atom(atom::Feed),
    Rdf(rdf::Feed),
    Json(json::Feed),
}

impl ParsedFeed {
    pub fn format(&self) -> Format {
        match self {
            ParsedFeed::Rss(_) => Format::Rss,
            ParsedFeed::Atom(_) => Format::Atom,
            ParsedFeed::Rdf(_) => Format::Rdf,
            ParsedFeed::Json(_) => Format::Json,
        }
    }
}

/// Parses a feed of any supported format.
///
/// Detectors run in a fixed order: RSS, Atom, RDF, then JSON Feed for text
/// that decodes as JSON. The first detector that accepts the text decides
/// the format; its parser's errors are returned as-is.
///
/// # Errors
///
/// - [`FeedError::UnrecognizedFormat`] when no detector accepts the text
/// - any error of the chosen format's parser
///
/// # Examples
///
/// ```
/// use feedcraft::feeds::{parse, ParsedFeed};
/// use feedcraft::ParseOptions;
///
/// let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>T</title></feed>"#;
/// let feed = parse(xml, &ParseOptions::default()).unwrap();
/// assert!(matches!(feed, ParsedFeed::Atom(_)));
/// ```
pub fn parse(text: &str, options: &ParseOptions) -> Result<ParsedFeed, FeedError> {
    if detect_rss_text(text) {
        tracing::debug!(format = %Format::Rss, "Dispatching feed parse");
        return rss::parse(text, options).map(ParsedFeed::Rss);
    }
    if detect_atom_text(text) {
        tracing::debug!(format = %Format::Atom, "Dispatching feed parse");
        return atom::parse(text, options).map(ParsedFeed::Atom);
    }
    if detect_rdf_text(text) {
        tracing::debug!(format = %Format::Rdf, "Dispatching feed parse");
        return rdf::parse(text, options).map(ParsedFeed::Rdf);
    }

    if let Ok(value) = Value::from_json_str(text) {
        if detect_json_feed(&value) {
            tracing::debug!(format = %Format::Json, "Dispatching feed parse");
            return json::parse(&value, options).map(ParsedFeed::Json);
        }
    }

    tracing::debug!(length = text.len(), "No feed detector matched");
    Err(FeedError::UnrecognizedFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatches_each_format() {
        let cases = [
            (
                r#"<rss version="2.0"><channel><title>T</title></channel></rss>"#,
                Format::Rss,
            ),
            (
                r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>T</title></feed>"#,
                Format::Atom,
            ),
            (
                r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><channel><title>T</title></channel></rdf:RDF>"#,
                Format::Rdf,
            ),
            (
                r#"{"version": "https://jsonfeed.org/version/1.1", "title": "T", "items": []}"#,
                Format::Json,
            ),
        ];

        for (text, format) in cases {
            let feed = parse(text, &ParseOptions::default())
                .unwrap_or_else(|e| panic!("{format} should parse: {e}"));
            assert_eq!(feed.format(), format);
        }
    }

    #[test]
    fn test_unrecognized_text() {
        for text in ["", "hello", "<html><body/></html>", r#"{"foo": 1}"#] {
            assert!(matches!(
                parse(text, &ParseOptions::default()),
                Err(FeedError::UnrecognizedFormat)
            ));
        }
    }

    #[test]
    fn test_parsed_feed_serializes_with_format_tag() {
        let feed = parse(
            r#"<rss version="2.0"><channel><title>T</title></channel></rss>"#,
            &ParseOptions::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&feed).unwrap();
        assert_eq!(json["format"], "rss");
        assert_eq!(json["feed"]["title"], "T");
    }
}
