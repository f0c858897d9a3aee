//! Date parsing and generation.
//!
//! Parsing accepts the date encodings feeds use in practice; generation
//! always emits one canonical encoding per target format.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::tree::Value;
use crate::util::parse_text_string;

/// Naive date-time layouts tried after the zoned RFC parsers, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%d %H:%M",
];

/// Zoned layouts that RFC 3339 rejects but ISO 8601 allows.
/// W3C-DTF also allows minute precision (`1997-07-16T19:20+01:00`).
const ZONED_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

/// A date field as it may arrive from a caller: a native value, or a string
/// that still has to be parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum DateLike {
    Date(DateTime<Utc>),
    Text(String),
}

impl DateLike {
    /// Resolves to a point in time; unparseable text gives `None`.
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            DateLike::Date(date) => Some(*date),
            DateLike::Text(text) => parse_date(text),
        }
    }
}

impl From<DateTime<Utc>> for DateLike {
    fn from(date: DateTime<Utc>) -> Self {
        DateLike::Date(date)
    }
}

impl From<&DateTime<Utc>> for DateLike {
    fn from(date: &DateTime<Utc>) -> Self {
        DateLike::Date(*date)
    }
}

impl From<&str> for DateLike {
    fn from(text: &str) -> Self {
        DateLike::Text(text.to_string())
    }
}

impl From<String> for DateLike {
    fn from(text: String) -> Self {
        DateLike::Text(text)
    }
}

/// Parses a date string in any supported encoding.
///
/// Tried in order: RFC 2822 (which covers RFC 822 with four-digit years and
/// `GMT`/`UT`/military zones), RFC 3339, other zoned ISO 8601 variants,
/// zone-less ISO date-times (taken as UTC), and the W3C-DTF reduced forms
/// `YYYY-MM-DD`, `YYYY-MM` and `YYYY` (midnight UTC on the first day).
///
/// # Examples
///
/// ```
/// use feedcraft::util::parse_date;
///
/// let a = parse_date("Sat, 07 Sep 2002 00:00:01 GMT").unwrap();
/// let b = parse_date("2002-09-07T00:00:01Z").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_date("not a date").is_none());
/// ```
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc2822(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    for format in ZONED_DATETIME_FORMATS {
        if let Ok(date) = DateTime::parse_from_str(text, format) {
            return Some(date.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    parse_reduced_date(text)
}

fn parse_reduced_date(text: &str) -> Option<DateTime<Utc>> {
    let mut parts = text.splitn(3, '-');
    let year = parts.next()?;
    if year.len() != 4 {
        return None;
    }
    let year = year.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(m) if m.len() == 2 => m.parse::<u32>().ok()?,
        Some(_) => return None,
        None => 1,
    };
    let day = match parts.next() {
        Some(d) if d.len() == 2 => d.parse::<u32>().ok()?,
        Some(_) => return None,
        None => 1,
    };
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Extractor form of [`parse_date`] for tree values.
pub fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    parse_text_string(value).and_then(|text| parse_date(&text))
}

/// RFC 3339 with millisecond precision in UTC, e.g. `2002-09-07T00:00:01.000Z`.
///
/// Used by JSON Feed, Atom and the W3C-DTF namespaces (Dublin Core,
/// Syndication). String input is re-parsed first; unparseable input gives
/// `None`.
pub fn generate_rfc3339_date<D: Into<DateLike>>(date: Option<D>) -> Option<String> {
    let date = date?.into().resolve()?;
    Some(date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// RFC 822 in UTC, e.g. `Sat, 07 Sep 2002 00:00:01 GMT`. Used by RSS and OPML.
pub fn generate_rfc822_date<D: Into<DateLike>>(date: Option<D>) -> Option<String> {
    let date = date?.into().resolve()?;
    Some(date.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}
