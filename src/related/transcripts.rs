//! Podcast transcripts in the JSON transcript format.

use serde::{Deserialize, Serialize};

use super::{json_object, view};
use crate::config::{GenerateOptions, ParseOptions};
use crate::detect::detect_transcripts;
use crate::error::{FeedError, Format};
use crate::tree::{Node, Value};
use crate::util::{
    generate_array_of, generate_number, generate_plain_string, parse_array_of_limited,
    parse_number, parse_singular_of, parse_string, trim_object,
};

pub const TRANSCRIPTS_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
}

/// Parses a transcript document. Keys are matched case-insensitively.
///
/// # Errors
///
/// - [`FeedError::Json`] when text input is not valid JSON
/// - [`FeedError::InvalidInput`] when the document is not recognized as a
///   transcript or yields nothing
pub fn parse(value: &Value, options: &ParseOptions) -> Result<Transcript, FeedError> {
    let value = json_object(value, Format::Transcripts)?;
    if !detect_transcripts(&value) {
        return Err(FeedError::InvalidInput(Format::Transcripts));
    }

    let get = view(&value).ok_or(FeedError::InvalidInput(Format::Transcripts))?;
    trim_object(Transcript {
        version: parse_singular_of(get.get("version"), parse_string),
        segments: parse_array_of_limited(get.get("segments"), parse_segment, options.max_items),
    })
    .ok_or(FeedError::InvalidInput(Format::Transcripts))
}

fn parse_segment(value: &Value) -> Option<Segment> {
    let get = view(value)?;

    trim_object(Segment {
        speaker: parse_singular_of(get.get("speaker"), parse_string),
        start_time: parse_singular_of(get.get("startTime"), parse_number),
        end_time: parse_singular_of(get.get("endTime"), parse_number),
        body: parse_singular_of(get.get("body"), parse_string),
    })
}

/// Generates a transcript with version [`TRANSCRIPTS_VERSION`].
///
/// # Errors
///
/// - [`FeedError::MissingField`] when strict and there are no segments or a
///   segment lacks `speaker`, `startTime` or `body`
/// - [`FeedError::InvalidInput`] when no segment can be generated
pub fn generate(
    transcript: &Transcript,
    options: &GenerateOptions,
) -> Result<serde_json::Value, FeedError> {
    if !options.lenient {
        validate(transcript)?;
    }

    let segments = generate_array_of(transcript.segments.as_deref(), generate_segment)
        .ok_or(FeedError::InvalidInput(Format::Transcripts))?;

    let document = Node::new()
        .with("version", Some(TRANSCRIPTS_VERSION))
        .with("segments", Some(segments));
    Ok(Value::Node(document).to_json())
}

fn missing(field: &'static str) -> FeedError {
    FeedError::MissingField {
        format: Format::Transcripts,
        field,
    }
}

fn validate(transcript: &Transcript) -> Result<(), FeedError> {
    let segments = transcript
        .segments
        .as_deref()
        .filter(|segments| !segments.is_empty())
        .ok_or_else(|| missing("segments"))?;

    for segment in segments {
        segment.speaker.as_ref().ok_or_else(|| missing("segment.speaker"))?;
        segment.start_time.ok_or_else(|| missing("segment.startTime"))?;
        segment.body.as_ref().ok_or_else(|| missing("segment.body"))?;
    }
    Ok(())
}

fn generate_segment(segment: &Segment) -> Option<Value> {
    Node::new()
        .with("speaker", generate_plain_string(segment.speaker.as_deref()))
        .with("startTime", generate_number(segment.start_time))
        .with("endTime", generate_number(segment.end_time))
        .with("body", generate_plain_string(segment.body.as_deref()))
        .into_value()
}
