//! Parse and generate syndication documents.
//!
//! Supported formats: RSS 2.0, Atom 1.0 (plus 0.3 on read), RDF / RSS 1.0
//! (read only), JSON Feed, OPML 2.0, and the podcast chapters and
//! transcripts JSON documents. Extension namespaces such as iTunes, Dublin
//! Core and Syndication are recognized under any prefix a feed declares.
//!
//! Parsing is tolerant: every field is optional and a field that fails to
//! coerce is dropped rather than failing the document. Generation is strict
//! by default and can be relaxed with [`GenerateOptions::lenient`].
//!
//! ```
//! use feedcraft::{feeds, ParseOptions};
//!
//! let xml = r#"<rss version="2.0"><channel><title>Example</title></channel></rss>"#;
//! match feeds::parse(xml, &ParseOptions::default()).unwrap() {
//!     feeds::ParsedFeed::Rss(feed) => assert_eq!(feed.title.as_deref(), Some("Example")),
//!     other => panic!("unexpected format {}", other.format()),
//! }
//! ```

pub mod config;
pub mod detect;
pub mod error;
pub mod feeds;
pub mod namespaces;
pub mod opml;
pub mod related;
pub mod tree;
pub mod util;

pub use config::{Config, ConfigError, GenerateOptions, ParseOptions, Stylesheet};
pub use error::{FeedError, Format};
pub use feeds::{parse, ParsedFeed};
