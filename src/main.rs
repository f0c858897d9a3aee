use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::{Path, PathBuf};

use feedcraft::detect::{detect_chapters, detect_feed_format, detect_transcripts};
use feedcraft::feeds::{atom, json, rdf, rss};
use feedcraft::related::{chapters, transcripts};
use feedcraft::tree::Value;
use feedcraft::{opml, Config, Format};

/// SEC-014: Inputs larger than this are refused before reading.
const MAX_INPUT_SIZE: u64 = 64 * 1_048_576;

#[derive(Parser, Debug)]
#[command(
    name = "feedcraft",
    version,
    about = "Detect, parse and generate RSS, Atom, RDF, JSON Feed and OPML documents"
)]
struct Args {
    /// Config file (default: ~/.config/feedcraft/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the format of a document
    Detect {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Parse a document and print the result as JSON
    Parse {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Skip detection and parse as this format
        #[arg(long, short)]
        format: Option<Format>,
    },

    /// Generate a document from its JSON representation
    Generate {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(long, short)]
        format: Format,

        /// Write to this file instead of stdout (replaced atomically)
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Get the default config path (~/.config/feedcraft/config.toml)
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("feedcraft")
            .join("config.toml"),
    )
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => {
                tracing::debug!("HOME not set, using default config");
                return Ok(Config::default());
            }
        },
    };
    Config::load(&path).with_context(|| format!("Failed to load config '{}'", path.display()))
}

/// Reads an input document after checking it is a regular file of sane size.
fn read_input(path: &Path) -> Result<String> {
    // SEC-008: Canonicalize to resolve symlinks before inspecting the target
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve input file: {}", path.display()))?;

    let metadata = std::fs::metadata(&canonical)?;
    if !metadata.is_file() {
        bail!("Input path must be a regular file: {}", canonical.display());
    }
    if metadata.len() > MAX_INPUT_SIZE {
        bail!(
            "Input file is {} bytes (max {} bytes)",
            metadata.len(),
            MAX_INPUT_SIZE
        );
    }

    std::fs::read_to_string(&canonical)
        .with_context(|| format!("Failed to read input file: {}", canonical.display()))
}

/// Writes `content` next to `dst` under a random name, syncs it, then renames
/// it over `dst` so readers never see a partial file.
fn write_atomically(dst: &Path, content: &[u8]) -> Result<()> {
    // SEC-009: Randomized temp filename to prevent TOCTOU race conditions
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .with_context(|| {
            format!(
                "Failed to create temporary file '{}': check directory permissions",
                temp_path.display()
            )
        })?;

    temp_file.write_all(content).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to write to temporary file '{}': disk may be full",
            temp_path.display()
        )
    })?;

    temp_file.sync_all().with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!("Failed to sync temporary file '{}' to disk", temp_path.display())
    })?;

    drop(temp_file);

    // On Windows, rename fails if destination exists, so remove it first
    #[cfg(windows)]
    if dst.exists() {
        std::fs::remove_file(dst).with_context(|| {
            let _ = std::fs::remove_file(&temp_path);
            format!(
                "Failed to remove existing '{}' before atomic replace",
                dst.display()
            )
        })?;
    }

    std::fs::rename(&temp_path, dst).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to rename '{}' to '{}': check permissions",
            temp_path.display(),
            dst.display()
        )
    })
}

/// Feed formats first, then the JSON companion documents, then OPML.
fn detect_format(text: &str) -> Option<Format> {
    if let Some(format) = detect_feed_format(text) {
        return Some(format);
    }
    if let Ok(value) = Value::from_json_str(text) {
        if detect_chapters(&value) {
            return Some(Format::Chapters);
        }
        if detect_transcripts(&value) {
            return Some(Format::Transcripts);
        }
        return None;
    }
    opml::parse(text, &Default::default())
        .is_ok()
        .then_some(Format::Opml)
}

fn parse_as(format: Format, text: &str, config: &Config) -> Result<serde_json::Value> {
    let options = &config.parse;
    let parsed = match format {
        Format::Rss => serde_json::to_value(rss::parse(text, options)?)?,
        Format::Atom => serde_json::to_value(atom::parse(text, options)?)?,
        Format::Rdf => serde_json::to_value(rdf::parse(text, options)?)?,
        Format::Opml => serde_json::to_value(opml::parse(text, options)?)?,
        Format::Json => {
            let value = Value::from_json_str(text)?;
            serde_json::to_value(json::parse(&value, options)?)?
        }
        Format::Chapters => {
            serde_json::to_value(chapters::parse(&Value::from(text), options)?)?
        }
        Format::Transcripts => {
            serde_json::to_value(transcripts::parse(&Value::from(text), options)?)?
        }
    };
    Ok(parsed)
}

fn read_model<T: DeserializeOwned>(text: &str, format: Format) -> Result<T> {
    serde_json::from_str(text)
        .with_context(|| format!("Input is not a valid {format} document in JSON form"))
}

fn generate_as(format: Format, text: &str, config: &Config) -> Result<String> {
    let options = &config.generate;
    let pretty_json = |value: serde_json::Value| -> Result<String> {
        Ok(serde_json::to_string_pretty(&value)?)
    };

    match format {
        Format::Rss => Ok(rss::generate(&read_model(text, format)?, options)?),
        Format::Atom => Ok(atom::generate(&read_model(text, format)?, options)?),
        Format::Opml => Ok(opml::generate(&read_model(text, format)?, options)?),
        Format::Json => pretty_json(json::generate(&read_model(text, format)?, options)?),
        Format::Chapters => pretty_json(chapters::generate(&read_model(text, format)?, options)?),
        Format::Transcripts => {
            pretty_json(transcripts::generate(&read_model(text, format)?, options)?)
        }
        Format::Rdf => bail!("{format} documents can be parsed but not generated"),
    }
}

fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Detect { input } => {
            let text = read_input(&input)?;
            match detect_format(&text) {
                Some(format) => println!("{}", format.name()),
                None => {
                    eprintln!("Error: {} is not a recognized document", input.display());
                    std::process::exit(1);
                }
            }
        }
        Command::Parse { input, format } => {
            let text = read_input(&input)?;
            let format = match format.or_else(|| detect_format(&text)) {
                Some(format) => format,
                None => bail!("Could not detect the format of {}", input.display()),
            };
            tracing::info!(%format, path = %input.display(), "Parsing document");

            let parsed = parse_as(format, &text, &config)
                .with_context(|| format!("Failed to parse {} as {format}", input.display()))?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Command::Generate {
            input,
            format,
            output,
        } => {
            let text = read_input(&input)?;
            let generated = generate_as(format, &text, &config)
                .with_context(|| format!("Failed to generate {format} document"))?;

            match output {
                Some(path) => {
                    write_atomically(&path, generated.as_bytes())?;
                    tracing::info!(path = %path.display(), "Wrote generated document");
                }
                None => println!("{generated}"),
            }
        }
    }

    Ok(())
}
