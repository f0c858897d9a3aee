//! Podcast chapters (the Podcasting 2.0 JSON chapters format).

use serde::{Deserialize, Serialize};

use super::{json_object, view};
use crate::config::{GenerateOptions, ParseOptions};
use crate::detect::detect_chapters;
use crate::error::{FeedError, Format};
use crate::tree::{Node, Value};
use crate::util::{
    generate_array_of, generate_boolean, generate_number, generate_plain_string,
    parse_array_of_limited, parse_boolean, parse_number, parse_singular_of, parse_string,
    trim_object,
};

/// The version written into every generated document.
pub const CHAPTERS_VERSION: &str = "1.2.0";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A `geo:` URI, e.g. `geo:30.2672,-97.7431`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osm: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Seconds from the start of the media.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// `false` hides the chapter from a table of contents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podcast_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<Chapter>>,
}

/// Parses a chapters document. Keys are matched case-insensitively.
///
/// # Errors
///
/// - [`FeedError::Json`] when text input is not valid JSON
/// - [`FeedError::InvalidInput`] when the document is not recognized as
///   chapters or yields nothing
pub fn parse(value: &Value, options: &ParseOptions) -> Result<Chapters, FeedError> {
    let value = json_object(value, Format::Chapters)?;
    if !detect_chapters(&value) {
        return Err(FeedError::InvalidInput(Format::Chapters));
    }

    parse_document(&value, options.max_items).ok_or(FeedError::InvalidInput(Format::Chapters))
}

fn parse_document(value: &Value, max_items: Option<usize>) -> Option<Chapters> {
    let get = view(value)?;
    let text = |key: &str| parse_singular_of(get.get(key), parse_string);

    trim_object(Chapters {
        version: text("version"),
        author: text("author"),
        title: text("title"),
        podcast_name: text("podcastName"),
        description: text("description"),
        file_name: text("fileName"),
        waypoints: parse_singular_of(get.get("waypoints"), parse_boolean),
        chapters: parse_array_of_limited(get.get("chapters"), parse_chapter, max_items),
    })
}

fn parse_chapter(value: &Value) -> Option<Chapter> {
    let get = view(value)?;
    let text = |key: &str| parse_singular_of(get.get(key), parse_string);

    trim_object(Chapter {
        start_time: parse_singular_of(get.get("startTime"), parse_number),
        end_time: parse_singular_of(get.get("endTime"), parse_number),
        title: text("title"),
        img: text("img"),
        url: text("url"),
        toc: parse_singular_of(get.get("toc"), parse_boolean),
        location: parse_singular_of(get.get("location"), parse_location),
    })
}

fn parse_location(value: &Value) -> Option<Location> {
    let get = view(value)?;
    let text = |key: &str| parse_singular_of(get.get(key), parse_string);

    trim_object(Location {
        name: text("name"),
        geo: text("geo"),
        osm: text("osm"),
    })
}

/// Generates a chapters document with version [`CHAPTERS_VERSION`].
///
/// # Errors
///
/// - [`FeedError::MissingField`] when strict and there are no chapters, a
///   chapter lacks `startTime`, or a location lacks `name` or `geo`
/// - [`FeedError::InvalidInput`] when nothing can be generated
pub fn generate(
    chapters: &Chapters,
    options: &GenerateOptions,
) -> Result<serde_json::Value, FeedError> {
    if !options.lenient {
        validate(chapters)?;
    }

    let body = Node::new()
        .with(
            "chapters",
            generate_array_of(chapters.chapters.as_deref(), generate_chapter),
        )
        .with("author", text(&chapters.author))
        .with("title", text(&chapters.title))
        .with("podcastName", text(&chapters.podcast_name))
        .with("description", text(&chapters.description))
        .with("fileName", text(&chapters.file_name))
        .with("waypoints", generate_boolean(chapters.waypoints))
        .trimmed()
        .ok_or(FeedError::InvalidInput(Format::Chapters))?;

    let document = Node::new()
        .with("version", Some(CHAPTERS_VERSION))
        .merge(Some(body));
    Ok(Value::Node(document).to_json())
}

fn missing(field: &'static str) -> FeedError {
    FeedError::MissingField {
        format: Format::Chapters,
        field,
    }
}

fn validate(chapters: &Chapters) -> Result<(), FeedError> {
    let list = chapters
        .chapters
        .as_deref()
        .filter(|list| !list.is_empty())
        .ok_or_else(|| missing("chapters"))?;

    for chapter in list {
        chapter
            .start_time
            .ok_or_else(|| missing("chapter.startTime"))?;
        if let Some(location) = &chapter.location {
            location.name.as_ref().ok_or_else(|| missing("location.name"))?;
            location.geo.as_ref().ok_or_else(|| missing("location.geo"))?;
        }
    }
    Ok(())
}

fn text(value: &Option<String>) -> Option<Value> {
    generate_plain_string(value.as_deref())
}

fn generate_chapter(chapter: &Chapter) -> Option<Value> {
    Node::new()
        .with("startTime", generate_number(chapter.start_time))
        .with("title", text(&chapter.title))
        .with("img", text(&chapter.img))
        .with("url", text(&chapter.url))
        .with("toc", generate_boolean(chapter.toc))
        .with("endTime", generate_number(chapter.end_time))
        .with("location", chapter.location.as_ref().and_then(generate_location))
        .into_value()
}

fn generate_location(location: &Location) -> Option<Value> {
    Node::new()
        .with("name", text(&location.name))
        .with("geo", text(&location.geo))
        .with("osm", text(&location.osm))
        .into_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const DOCUMENT: &str = r#"{
        "version": "1.2.0",
        "author": "John Doe",
        "title": "Episode 7 - Making Progress",
        "podcastName": "John's Awesome Podcast",
        "chapters": [
            {"startTime": 0, "title": "Intro"},
            {"startTime": 168, "title": "Hearing Aids", "img": "https://example.com/images/hearing.jpg", "toc": false},
            {"startTime": 260, "title": "Progress", "location": {"name": "Austin, TX", "geo": "geo:30.2672,-97.7431"}}
        ]
    }"#;

    #[test]
    fn test_parse_from_text() {
        let chapters = parse(&Value::from(DOCUMENT), &ParseOptions::default())
            .expect("Failed to parse chapters");

        assert_eq!(chapters.version.as_deref(), Some("1.2.0"));
        assert_eq!(chapters.podcast_name.as_deref(), Some("John's Awesome Podcast"));

        let list = chapters.chapters.expect("chapters should parse");
        assert_eq!(list.len(), 3);
        assert_eq!(list[1].start_time, Some(168.0));
        assert_eq!(list[1].toc, Some(false));
        assert_eq!(
            list[2].location,
            Some(Location {
                name: Some("Austin, TX".to_string()),
                geo: Some("geo:30.2672,-97.7431".to_string()),
                osm: None,
            })
        );
    }

    #[test]
    fn test_parse_without_version_infers_from_shape() {
        let value = Value::from_json_str(r#"{"CHAPTERS": [{"StartTime": 5, "TITLE": "x"}]}"#).unwrap();
        let chapters = parse(&value, &ParseOptions::default()).unwrap();
        assert_eq!(
            chapters.chapters,
            Some(vec![Chapter {
                start_time: Some(5.0),
                title: Some("x".to_string()),
                ..Default::default()
            }])
        );
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            parse(&Value::from("not json"), &ParseOptions::default()),
            Err(FeedError::Json(_))
        ));
        assert!(matches!(
            parse(&Value::from_json_str("[]").unwrap(), &ParseOptions::default()),
            Err(FeedError::InvalidInput(Format::Chapters))
        ));
        assert!(matches!(
            parse(&Value::from_json_str(r#"{"segments": []}"#).unwrap(), &ParseOptions::default()),
            Err(FeedError::InvalidInput(Format::Chapters))
        ));
    }

    #[test]
    fn test_generate_writes_current_version() {
        let chapters = Chapters {
            version: Some("1.0.0".to_string()),
            title: Some("Ep".to_string()),
            chapters: Some(vec![Chapter {
                start_time: Some(0.0),
                title: Some("Intro".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let value = generate(&chapters, &GenerateOptions::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "version": "1.2.0",
                "chapters": [{"startTime": 0, "title": "Intro"}],
                "title": "Ep"
            })
        );
    }

    #[test]
    fn test_round_trip() {
        let parsed = parse(&Value::from(DOCUMENT), &ParseOptions::default()).unwrap();
        let generated = generate(&parsed, &GenerateOptions::default()).unwrap();
        let reparsed = parse(&Value::from(generated), &ParseOptions::default()).unwrap();
        assert_eq!(reparsed, parsed);
    }

    #[test]
    fn test_strict_validation() {
        let no_start = Chapters {
            chapters: Some(vec![Chapter {
                title: Some("x".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        assert!(matches!(
            generate(&no_start, &GenerateOptions::default()),
            Err(FeedError::MissingField { field: "chapter.startTime", .. })
        ));

        let lenient = GenerateOptions {
            lenient: true,
            ..Default::default()
        };
        assert!(generate(&no_start, &lenient).is_ok());
        assert!(matches!(
            generate(&Chapters::default(), &lenient),
            Err(FeedError::InvalidInput(Format::Chapters))
        ));
    }
}
