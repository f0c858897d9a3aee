//! Configuration file parser for ~/.config/feedcraft/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! It only carries defaults for the parse and generate options; library
//! callers can build [`ParseOptions`] and [`GenerateOptions`] directly.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Option Structs
// ============================================================================

/// Options applied while extracting typed documents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Upper bound on items, entries, outlines, chapters and segments kept
    /// per list. `Some(0)` drops the list entirely; `None` keeps everything.
    pub max_items: Option<usize>,

    /// Additional OPML outline attributes to capture, matched
    /// case-insensitively and reported under the spelling given here.
    pub extra_outline_attributes: Vec<String>,
}

/// Options applied while generating markup or JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Indent nested elements. When false the document is a single line.
    pub pretty: bool,

    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,

    /// Skip required-field validation and emit whatever is present.
    pub lenient: bool,

    /// `xml-stylesheet` processing instructions placed after the declaration.
    pub stylesheets: Vec<Stylesheet>,

    /// Extra OPML outline attributes to emit from each outline's extras.
    pub extra_outline_attributes: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
            lenient: false,
            stylesheets: Vec::new(),
            extra_outline_attributes: Vec::new(),
        }
    }
}

/// A stylesheet reference for generated XML documents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stylesheet {
    /// MIME type, e.g. `text/xsl` or `text/css`.
    #[serde(rename = "type")]
    pub kind: String,
    pub href: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub media: Option<String>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parse: ParseOptions,
    pub generate: GenerateOptions,
}

impl Config {
    /// SEC-014: Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // SEC-014: Check file size before reading
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            warn_unknown_keys(&raw);
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            pretty = config.generate.pretty,
            lenient = config.generate.lenient,
            "Loaded configuration"
        );
        Ok(config)
    }
}

fn warn_unknown_keys(raw: &toml::Table) {
    const PARSE_KEYS: [&str; 2] = ["max_items", "extra_outline_attributes"];
    const GENERATE_KEYS: [&str; 5] = [
        "pretty",
        "indent",
        "lenient",
        "stylesheets",
        "extra_outline_attributes",
    ];

    for (key, value) in raw {
        let known: &[&str] = match key.as_str() {
            "parse" => &PARSE_KEYS,
            "generate" => &GENERATE_KEYS,
            _ => {
                tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                continue;
            }
        };
        if let Some(table) = value.as_table() {
            for nested in table.keys() {
                if !known.contains(&nested.as_str()) {
                    let full_key = format!("{key}.{nested}");
                    tracing::warn!(key = %full_key, "Unknown key in config file, ignoring");
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.parse.max_items, None);
        assert!(config.parse.extra_outline_attributes.is_empty());
        assert!(config.generate.pretty);
        assert_eq!(config.generate.indent, 2);
        assert!(!config.generate.lenient);
        assert!(config.generate.stylesheets.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/feedcraft_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("feedcraft_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "   \n  \n  ").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("feedcraft_config_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[generate]\nlenient = true\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.generate.lenient);
        assert!(config.generate.pretty); // default
        assert_eq!(config.parse, ParseOptions::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = std::env::temp_dir().join("feedcraft_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
[parse]
max_items = 10
extra_outline_attributes = ["customAttr"]

[generate]
pretty = false
indent = 4
lenient = true
extra_outline_attributes = ["customAttr"]

[[generate.stylesheets]]
type = "text/xsl"
href = "/feed.xsl"
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.parse.max_items, Some(10));
        assert_eq!(config.parse.extra_outline_attributes, vec!["customAttr"]);
        assert!(!config.generate.pretty);
        assert_eq!(config.generate.indent, 4);
        assert!(config.generate.lenient);
        assert_eq!(config.generate.stylesheets.len(), 1);
        assert_eq!(config.generate.stylesheets[0].kind, "text/xsl");
        assert_eq!(config.generate.stylesheets[0].href, "/feed.xsl");
        assert_eq!(config.generate.stylesheets[0].title, None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = std::env::temp_dir().join("feedcraft_config_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let dir = std::env::temp_dir().join("feedcraft_config_test_unknown");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "theme = \"dark\"\n[parse]\nbogus = 1\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let dir = std::env::temp_dir().join("feedcraft_config_test_wrongtype");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[generate]\npretty = \"yes\"\n").unwrap();

        assert!(Config::load(&path).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    // SEC-014: File size limit
    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("feedcraft_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "a".repeat(1_048_577)).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
