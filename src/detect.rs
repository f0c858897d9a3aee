//! Format detection.
//!
//! One predicate per format. Every detector accepts any [`Value`] and
//! returns `false` for input of the wrong shape (null, numbers, lists, empty
//! strings); none of them can panic. Markup detectors work on raw text with
//! a two-stage check: the first element after the prolog must be the
//! format's root, then any one piece of corroborating evidence (a namespace URI or a format-specific
//! child element). The regex engine runs in linear time, so hostile input
//! cannot trigger catastrophic backtracking.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Format;
use crate::namespaces::NamespaceTable;
use crate::tree::{CaseInsensitive, Node, Value};

/// Byte order mark, whitespace, XML declaration, processing instructions,
/// comments and DOCTYPE (with an optional internal subset) ahead of the root.
static PROLOG: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?is)^\x{feff}?(?:\s+|<\?.*?\?>|<!--.*?-->|<!doctype[^\[>]*(?:\[.*?\])?\s*>)*")
});

/// RSS 1.0 and RSS 0.90 vocabulary URIs, which RDF feeds declare as default.
const RDF_FEED_URIS: &[&str] = &[
    "http://purl.org/rss/1.0/",
    "http://my.netscape.com/rdf/simple/0.9/",
];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("detector pattern is a valid regex")
}

fn uri_alternation(prefix: &str, extra: &[&str]) -> String {
    let uris = NamespaceTable::standard()
        .get(prefix)
        .map(|namespace| namespace.uris.clone())
        .unwrap_or_default();
    uris.iter()
        .map(String::as_str)
        .chain(extra.iter().copied())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

static RSS_ROOT: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^<rss[\s/>]"));
static RSS_VERSION: Lazy<Regex> = Lazy::new(|| compile(r"(?i)<rss[^>]*\sversion\s*="));
static RSS_VOCABULARY: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)<(?:channel|item|title|link|description)[\s/>]"));

static ATOM_ROOT: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^<(?:[a-z0-9_.-]+:)?feed[\s/>]"));
static ATOM_NAMESPACE: Lazy<Regex> =
    Lazy::new(|| compile(&format!("(?i)(?:{})", uri_alternation("atom", &[]))));
static ATOM_VOCABULARY: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)<(?:[a-z0-9_.-]+:)?(?:entry|title|link|id|updated|summary)[\s/>]")
});

static RDF_ROOT: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^<(?:rdf:)?rdf[\s/>]"));
static RDF_NAMESPACE: Lazy<Regex> =
    Lazy::new(|| compile(&format!("(?i)(?:{})", uri_alternation("rdf", RDF_FEED_URIS))));
static RDF_VOCABULARY: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)<(?:[a-z0-9_.-]+:)?(?:channel|item|title|link|description)[\s/>]")
});

/// RSS: an `<rss>` root plus a `version` attribute or RSS vocabulary.
pub fn detect_rss_text(text: &str) -> bool {
    RSS_ROOT.is_match(root_onwards(text)) && (RSS_VERSION.is_match(text) || RSS_VOCABULARY.is_match(text))
}

/// Atom: a `<feed>` root (optionally prefixed) plus an Atom namespace URI
/// or Atom vocabulary.
pub fn detect_atom_text(text: &str) -> bool {
    ATOM_ROOT.is_match(root_onwards(text)) && (ATOM_NAMESPACE.is_match(text) || ATOM_VOCABULARY.is_match(text))
}

/// RDF: an `<rdf:RDF>` or bare `<rdf>` root plus the RDF or RSS 1.0
/// namespace URI or RSS vocabulary.
pub fn detect_rdf_text(text: &str) -> bool {
    RDF_ROOT.is_match(root_onwards(text)) && (RDF_NAMESPACE.is_match(text) || RDF_VOCABULARY.is_match(text))
}

/// The text from the first element onwards.
fn root_onwards(text: &str) -> &str {
    let start = PROLOG.find(text).map_or(0, |prolog| prolog.end());
    &text[start..]
}

pub fn detect_rss_feed(value: &Value) -> bool {
    value.as_str().is_some_and(detect_rss_text)
}

pub fn detect_atom_feed(value: &Value) -> bool {
    value.as_str().is_some_and(detect_atom_text)
}

pub fn detect_rdf_feed(value: &Value) -> bool {
    value.as_str().is_some_and(detect_rdf_text)
}

/// JSON Feed: an object whose `version` names a jsonfeed.org version, or,
/// without a version, a title together with items or another JSON Feed
/// property. Key lookup is case-insensitive.
pub fn detect_json_feed(value: &Value) -> bool {
    let Some(node) = value.as_node() else {
        return false;
    };
    let get = CaseInsensitive::new(node);

    if let Some(version) = non_empty_str(get.get("version")) {
        return version.contains("jsonfeed.org/version/");
    }

    let has_title = non_empty_str(get.get("title")).is_some();
    let has_items = matches!(get.get("items"), Some(Value::List(_)));
    let has_feed_props = ["home_page_url", "feed_url", "authors"]
        .iter()
        .any(|key| get.get(key).is_some_and(is_truthy));

    has_title && (has_items || has_feed_props)
}

/// Podcast chapters: a `1.x` version, or a `chapters` list whose first
/// element has a numeric `startTime`. Text input is parsed as JSON first.
pub fn detect_chapters(value: &Value) -> bool {
    with_json_object(value, |get| match non_empty_str(get.get("version")) {
        Some(version) => version.starts_with("1."),
        None => first_list_node(get.get("chapters")).is_some_and(|chapter| {
            matches!(CaseInsensitive::new(chapter).get("startTime"), Some(Value::Number(_)))
        }),
    })
}

/// Podcast transcripts: a `1.x` version, or a `segments` list whose first
/// element has a numeric `startTime` and string `speaker` and `body`.
pub fn detect_transcripts(value: &Value) -> bool {
    with_json_object(value, |get| match non_empty_str(get.get("version")) {
        Some(version) => version.starts_with("1."),
        None => first_list_node(get.get("segments")).is_some_and(|segment| {
            let segment = CaseInsensitive::new(segment);
            matches!(segment.get("startTime"), Some(Value::Number(_)))
                && matches!(segment.get("speaker"), Some(Value::Text(_)))
                && matches!(segment.get("body"), Some(Value::Text(_)))
        }),
    })
}

/// Runs the feed detectors in dispatch order: RSS, Atom, RDF, then JSON
/// Feed (for text that parses as JSON).
pub fn detect_feed_format(text: &str) -> Option<Format> {
    let format = if detect_rss_text(text) {
        Some(Format::Rss)
    } else if detect_atom_text(text) {
        Some(Format::Atom)
    } else if detect_rdf_text(text) {
        Some(Format::Rdf)
    } else {
        looks_like_json(text)
            .then(|| Value::from_json_str(text).ok())
            .flatten()
            .filter(detect_json_feed)
            .map(|_| Format::Json)
    };
    tracing::debug!(format = ?format, "Detected feed format");
    format
}

fn looks_like_json(text: &str) -> bool {
    text.trim_start_matches('\u{feff}').trim_start().starts_with('{')
}

fn with_json_object(value: &Value, check: impl Fn(CaseInsensitive<'_>) -> bool) -> bool {
    match value {
        Value::Node(node) => check(CaseInsensitive::new(node)),
        Value::Text(text) if looks_like_json(text) => match Value::from_json_str(text) {
            Ok(Value::Node(node)) => check(CaseInsensitive::new(&node)),
            _ => false,
        },
        _ => false,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn first_list_node(value: Option<&Value>) -> Option<&Node> {
    match value {
        Some(Value::List(items)) => items.first().and_then(Value::as_node),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::Text(s) => !s.is_empty(),
        Value::Node(_) | Value::List(_) => true,
    }
}
