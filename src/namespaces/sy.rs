//! Syndication module (`sy:`): how often a feed is refreshed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tree::Node;
use crate::util::{
    generate_number, generate_plain_string, generate_rfc3339_date, parse_date_value,
    parse_singular_of, parse_text_number, parse_text_string, trim_object,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    /// `hourly`, `daily`, `weekly`, `monthly` or `yearly`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_frequency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_base: Option<DateTime<Utc>>,
}

pub fn retrieve_feed(node: &Node) -> Option<Feed> {
    trim_object(Feed {
        update_period: parse_singular_of(node.get("sy:updateperiod"), parse_text_string),
        update_frequency: parse_singular_of(node.get("sy:updatefrequency"), parse_text_number),
        update_base: parse_singular_of(node.get("sy:updatebase"), parse_date_value),
    })
}

pub fn generate_feed(feed: &Feed) -> Option<Node> {
    Node::new()
        .with("sy:updatePeriod", generate_plain_string(feed.update_period.as_deref()))
        .with("sy:updateFrequency", generate_number(feed.update_frequency))
        .with("sy:updateBase", generate_rfc3339_date(feed.update_base))
        .trimmed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Value;
    use chrono::TimeZone;

    #[test]
    fn test_retrieve_feed() {
        let node = Node::new()
            .with("sy:updateperiod", Some("hourly"))
            .with("sy:updatefrequency", Some("2"))
            .with("sy:updatebase", Some("2000-01-01T12:00+00:00"));
        assert_eq!(
            retrieve_feed(&node),
            Some(Feed {
                update_period: Some("hourly".to_string()),
                update_frequency: Some(2.0),
                update_base: Some(Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()),
            })
        );
    }

    #[test]
    fn test_retrieve_drops_non_numeric_frequency() {
        let node = Node::new()
            .with("sy:updateperiod", Some("daily"))
            .with("sy:updatefrequency", Some("often"));
        assert_eq!(retrieve_feed(&node).and_then(|f| f.update_frequency), None);
    }

    #[test]
    fn test_generate_feed() {
        let feed = Feed {
            update_period: Some("daily".to_string()),
            update_frequency: Some(1.0),
            update_base: None,
        };
        let node = generate_feed(&feed).unwrap();
        assert_eq!(node.get("sy:updatePeriod"), Some(&Value::from("daily")));
        assert_eq!(node.get("sy:updateFrequency"), Some(&Value::Number(1.0)));
        assert!(!node.contains_key("sy:updateBase"));
    }
}
