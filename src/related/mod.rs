//! JSON companion documents referenced from podcast feeds.
//!
//! Both accept either an already-decoded [`Value`] or JSON text wrapped in
//! [`Value::Text`], and both generate a [`serde_json::Value`].

use std::borrow::Cow;

use crate::error::{FeedError, Format};
use crate::tree::{CaseInsensitive, Value};

pub mod chapters;
pub mod transcripts;

/// Decodes JSON text when needed and returns a case-insensitive view of the
/// top-level object.
fn json_object(value: &Value, format: Format) -> Result<Cow<'_, Value>, FeedError> {
    let value = match value {
        Value::Text(text) => Cow::Owned(Value::from_json_str(text)?),
        other => Cow::Borrowed(other),
    };
    if value.as_node().is_none() {
        return Err(FeedError::InvalidInput(format));
    }
    Ok(value)
}

fn view(value: &Value) -> Option<CaseInsensitive<'_>> {
    value.as_node().map(CaseInsensitive::new)
}
