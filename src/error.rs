use std::fmt;

use thiserror::Error;

/// Document formats understood by the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Rss,
    Atom,
    Rdf,
    Json,
    Opml,
    Chapters,
    Transcripts,
}

impl Format {
    /// Lower-case identifier used on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            Format::Rss => "rss",
            Format::Atom => "atom",
            Format::Rdf => "rdf",
            Format::Json => "json",
            Format::Opml => "opml",
            Format::Chapters => "chapters",
            Format::Transcripts => "transcripts",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Format::Rss => "RSS",
            Format::Atom => "Atom",
            Format::Rdf => "RDF",
            Format::Json => "JSON Feed",
            Format::Opml => "OPML",
            Format::Chapters => "Chapters",
            Format::Transcripts => "Transcripts",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rss" => Ok(Format::Rss),
            "atom" => Ok(Format::Atom),
            "rdf" => Ok(Format::Rdf),
            "json" | "jsonfeed" => Ok(Format::Json),
            "opml" => Ok(Format::Opml),
            "chapters" => Ok(Format::Chapters),
            "transcripts" => Ok(Format::Transcripts),
            other => Err(format!("unknown format '{other}'")),
        }
    }
}

/// Errors surfaced by parse and generate entry points.
///
/// Individual fields that fail to coerce never produce an error; they are
/// dropped from the result instead. Only document-level failures end up here.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Detection failed or the document holds no recognizable structure.
    #[error("invalid input for format {0}")]
    InvalidInput(Format),

    /// None of the feed detectors accepted the input.
    #[error("unrecognized feed format")]
    UnrecognizedFormat,

    /// Strict generation found a required field absent.
    #[error("missing required field `{field}` for format {format}")]
    MissingField { format: Format, field: &'static str },

    /// The XML tokenizer rejected the markup.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// SEC-003: Element nesting exceeds the safety limit.
    #[error("document nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),

    /// Serializing the generated tree failed.
    #[error("XML write error: {0}")]
    Write(String),

    /// JSON text could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for FeedError {
    fn from(e: quick_xml::Error) -> Self {
        FeedError::Xml(e.to_string())
    }
}
