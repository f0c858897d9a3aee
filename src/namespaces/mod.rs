//! Namespace table, prefix normalization and per-namespace field mappings.
//!
//! # Architecture
//!
//! - [`NamespaceTable`] - canonical prefix, known URIs and alternate prefixes
//!   for every supported namespace
//! - [`NamespaceNormalizer`] - rewrites a raw tree so each known namespace
//!   uses its canonical prefix and every key is lower-case
//! - [`atom`], [`content`], [`dc`], [`itunes`], [`podcast`], [`media`],
//!   [`georss`], [`slash`], [`sy`], [`acast`] - field mappings for namespaces
//!   embedded in RSS, Atom and RDF documents
//!
//! Adding a namespace only requires a new [`Namespace`] entry; the
//! normalizer and the generators' `xmlns` declarations pick it up from the
//! table.

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub mod acast;
pub mod atom;
pub mod content;
pub mod dc;
pub mod georss;
pub mod itunes;
pub mod media;
mod normalize;
pub mod podcast;
pub mod slash;
pub mod sy;

pub use normalize::{create_namespace_normalizator, NamespaceNormalizer};

/// One XML vocabulary extension.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    /// Canonical lower-case prefix, e.g. `itunes`.
    pub prefix: String,
    /// Known URIs; the first is emitted in generated `xmlns` declarations.
    pub uris: Vec<String>,
    /// Alternate prefixes seen in the wild, e.g. `a10` for Atom.
    pub aliases: Vec<String>,
}

impl Namespace {
    pub fn new(prefix: &str, uris: &[&str], aliases: &[&str]) -> Self {
        Self {
            prefix: prefix.to_ascii_lowercase(),
            uris: uris.iter().map(|uri| uri.to_string()).collect(),
            aliases: aliases.iter().map(|alias| alias.to_ascii_lowercase()).collect(),
        }
    }
}

/// Immutable lookup structure over a set of [`Namespace`]s.
///
/// Prefix lookups are case-insensitive. URI lookups ignore case, the
/// `http`/`https` scheme and a trailing slash, all of which vary in
/// real-world declarations.
#[derive(Debug, Clone)]
pub struct NamespaceTable {
    namespaces: Vec<Namespace>,
    by_prefix: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
    by_uri: HashMap<String, usize>,
}

static STANDARD: Lazy<NamespaceTable> = Lazy::new(|| NamespaceTable::new(standard_namespaces()));

impl NamespaceTable {
    pub fn new(namespaces: Vec<Namespace>) -> Self {
        let mut by_prefix = HashMap::new();
        let mut by_alias = HashMap::new();
        let mut by_uri = HashMap::new();
        for (index, namespace) in namespaces.iter().enumerate() {
            by_prefix.insert(namespace.prefix.clone(), index);
            by_alias.insert(namespace.prefix.clone(), index);
            for alias in &namespace.aliases {
                by_alias.entry(alias.clone()).or_insert(index);
            }
            for uri in &namespace.uris {
                by_uri.entry(uri_key(uri)).or_insert(index);
            }
        }
        Self {
            namespaces,
            by_prefix,
            by_alias,
            by_uri,
        }
    }

    /// The process-wide table of every namespace the crate understands.
    pub fn standard() -> &'static NamespaceTable {
        &STANDARD
    }

    /// A copy of this table with one more namespace. An existing namespace
    /// with the same canonical prefix is replaced.
    pub fn with(&self, namespace: Namespace) -> Self {
        let mut namespaces = self
            .namespaces
            .iter()
            .filter(|existing| existing.prefix != namespace.prefix)
            .cloned()
            .collect::<Vec<_>>();
        namespaces.push(namespace);
        Self::new(namespaces)
    }

    /// Looks up a namespace by canonical prefix.
    pub fn get(&self, prefix: &str) -> Option<&Namespace> {
        self.by_prefix
            .get(&prefix.to_ascii_lowercase())
            .map(|&index| &self.namespaces[index])
    }

    /// Looks up a namespace by canonical or alternate prefix.
    pub fn resolve_prefix(&self, prefix: &str) -> Option<&Namespace> {
        self.by_alias
            .get(&prefix.to_ascii_lowercase())
            .map(|&index| &self.namespaces[index])
    }

    /// Looks up a namespace by one of its URIs.
    pub fn resolve_uri(&self, uri: &str) -> Option<&Namespace> {
        self.by_uri
            .get(&uri_key(uri))
            .map(|&index| &self.namespaces[index])
    }

    /// Lower-cases `name` and rewrites a known prefix to its canonical form.
    /// `uri` is the namespace the prefix is declared for, if any; a known URI
    /// takes precedence over matching the prefix itself.
    pub fn canonical_name(&self, name: &str, uri: Option<&str>) -> String {
        let lower = name.to_ascii_lowercase();
        let Some((prefix, local)) = lower.split_once(':') else {
            return lower;
        };
        match uri
            .and_then(|uri| self.resolve_uri(uri))
            .or_else(|| self.resolve_prefix(prefix))
        {
            Some(namespace) => format!("{}:{}", namespace.prefix, local),
            None => lower,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }
}

fn uri_key(uri: &str) -> String {
    let uri = uri.trim().to_ascii_lowercase();
    let uri = uri
        .strip_prefix("https://")
        .or_else(|| uri.strip_prefix("http://"))
        .unwrap_or(&uri);
    uri.trim_end_matches('/').to_string()
}

fn standard_namespaces() -> Vec<Namespace> {
    vec![
        Namespace::new(
            "atom",
            &["http://www.w3.org/2005/Atom", "http://purl.org/atom/ns#"],
            &["a10", "atom10", "atom03"],
        ),
        Namespace::new("content", &["http://purl.org/rss/1.0/modules/content/"], &[]),
        Namespace::new("dc", &["http://purl.org/dc/elements/1.1/"], &[]),
        Namespace::new("dcterms", &["http://purl.org/dc/terms/"], &[]),
        Namespace::new("sy", &["http://purl.org/rss/1.0/modules/syndication/"], &[]),
        Namespace::new("slash", &["http://purl.org/rss/1.0/modules/slash/"], &[]),
        Namespace::new("itunes", &["http://www.itunes.com/dtds/podcast-1.0.dtd"], &[]),
        Namespace::new(
            "podcast",
            &[
                "https://podcastindex.org/namespace/1.0",
                "https://github.com/Podcastindex-org/podcast-namespace/blob/main/docs/1.0.md",
            ],
            &[],
        ),
        Namespace::new("googleplay", &["http://www.google.com/schemas/play-podcasts/1.0"], &[]),
        Namespace::new("media", &["http://search.yahoo.com/mrss/"], &[]),
        Namespace::new("georss", &["http://www.georss.org/georss"], &[]),
        Namespace::new("geo", &["http://www.w3.org/2003/01/geo/wgs84_pos#"], &[]),
        Namespace::new("thr", &["http://purl.org/syndication/thread/1.0"], &[]),
        Namespace::new("wfw", &["http://wellformedweb.org/CommentAPI/"], &[]),
        Namespace::new("rdf", &["http://www.w3.org/1999/02/22-rdf-syntax-ns#"], &[]),
        Namespace::new("psc", &["http://podlove.org/simple-chapters"], &[]),
        Namespace::new("spotify", &["http://www.spotify.com/ns/rss"], &[]),
        Namespace::new("acast", &["https://schema.acast.com/1.0/"], &[]),
        Namespace::new("opensearch", &["http://a9.com/-/spec/opensearch/1.1/"], &[]),
        Namespace::new("yt", &["http://www.youtube.com/xml/schemas/2015"], &[]),
        Namespace::new(
            "creativecommons",
            &["http://backend.userland.com/creativeCommonsRssModule"],
            &[],
        ),
        Namespace::new("cc", &["http://web.resource.org/cc/"], &[]),
        Namespace::new("admin", &["http://webns.net/mvcb/"], &[]),
        Namespace::new("app", &["http://www.w3.org/2007/app"], &[]),
        Namespace::new(
            "trackback",
            &["http://madskills.com/public/xml/rss/module/trackback/"],
            &[],
        ),
        Namespace::new(
            "pingback",
            &["http://madskills.com/public/xml/rss/module/pingback/"],
            &[],
        ),
        Namespace::new("feedpress", &["https://feed.press/xmlns"], &[]),
        Namespace::new("rawvoice", &["http://www.rawvoice.com/rawvoiceRssModule/"], &[]),
        Namespace::new("blogchannel", &["http://backend.userland.com/blogChannelModule"], &[]),
        Namespace::new("prism", &["http://prismstandard.org/namespaces/basic/2.0/"], &[]),
        Namespace::new("source", &["http://source.scripting.com/"], &[]),
        Namespace::new("arxiv", &["http://arxiv.org/schemas/atom"], &[]),
        Namespace::new("g", &["http://base.google.com/ns/1.0"], &[]),
        Namespace::new("opds", &["http://opds-spec.org/2010/catalog"], &[]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefix_is_case_insensitive_and_alias_aware() {
        let table = NamespaceTable::standard();
        assert_eq!(table.resolve_prefix("ITUNES").map(|ns| ns.prefix.as_str()), Some("itunes"));
        assert_eq!(table.resolve_prefix("a10").map(|ns| ns.prefix.as_str()), Some("atom"));
        assert_eq!(table.resolve_prefix("Atom10").map(|ns| ns.prefix.as_str()), Some("atom"));
        assert!(table.resolve_prefix("unknown").is_none());
    }

    #[test]
    fn test_resolve_uri_tolerates_scheme_case_and_trailing_slash() {
        let table = NamespaceTable::standard();
        for uri in [
            "http://www.itunes.com/dtds/podcast-1.0.dtd",
            "https://www.itunes.com/dtds/podcast-1.0.dtd",
            "http://www.itunes.com/DTDs/Podcast-1.0.dtd/",
        ] {
            assert_eq!(
                table.resolve_uri(uri).map(|ns| ns.prefix.as_str()),
                Some("itunes"),
                "uri: {uri}"
            );
        }
        assert_eq!(
            table.resolve_uri("http://purl.org/dc/elements/1.1").map(|ns| ns.prefix.as_str()),
            Some("dc")
        );
        assert!(table.resolve_uri("http://example.com/custom").is_none());
    }

    #[test]
    fn test_canonical_name() {
        let table = NamespaceTable::standard();
        assert_eq!(table.canonical_name("Title", None), "title");
        assert_eq!(table.canonical_name("a10:Link", None), "atom:link");
        assert_eq!(
            table.canonical_name("x:encoded", Some("http://purl.org/rss/1.0/modules/content/")),
            "content:encoded"
        );
        assert_eq!(
            table.canonical_name("atom:link", Some("http://example.com/not-atom")),
            "atom:link"
        );
        assert_eq!(table.canonical_name("zz:thing", None), "zz:thing");
    }

    #[test]
    fn test_get_only_matches_canonical_prefix() {
        let table = NamespaceTable::standard();
        assert!(table.get("atom").is_some());
        assert!(table.get("a10").is_none());
    }

    #[test]
    fn test_with_adds_namespace() {
        let table = NamespaceTable::standard().with(Namespace::new(
            "custom",
            &["http://example.com/custom"],
            &["cst"],
        ));
        assert_eq!(table.resolve_prefix("cst").map(|ns| ns.prefix.as_str()), Some("custom"));
        assert!(table.get("itunes").is_some());
    }
}
