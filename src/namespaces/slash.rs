//! Slash module (`slash:`): discussion metadata on items.

use serde::{Deserialize, Serialize};

use crate::tree::Node;
use crate::util::{
    generate_csv_of, generate_number, generate_plain_string, parse_csv_of, parse_number,
    parse_singular_of, parse_text_number, parse_text_string, trim_object,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<f64>,
    /// Comment counts per threshold, e.g. `12,10,7,6,4,2,1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_parade: Option<Vec<f64>>,
}

pub fn retrieve_item(node: &Node) -> Option<Item> {
    trim_object(Item {
        section: parse_singular_of(node.get("slash:section"), parse_text_string),
        department: parse_singular_of(node.get("slash:department"), parse_text_string),
        comments: parse_singular_of(node.get("slash:comments"), parse_text_number),
        hit_parade: parse_singular_of(node.get("slash:hit_parade"), |value| {
            parse_csv_of(value, parse_number)
        }),
    })
}

pub fn generate_item(item: &Item) -> Option<Node> {
    Node::new()
        .with("slash:section", generate_plain_string(item.section.as_deref()))
        .with("slash:department", generate_plain_string(item.department.as_deref()))
        .with("slash:comments", generate_number(item.comments))
        .with("slash:hit_parade", generate_csv_of(item.hit_parade.as_deref()))
        .trimmed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Value;

    #[test]
    fn test_retrieve_item() {
        let node = Node::new()
            .with("slash:section", Some("news"))
            .with("slash:comments", Some("42"))
            .with("slash:hit_parade", Some("12,10,7,x,1"));
        assert_eq!(
            retrieve_item(&node),
            Some(Item {
                section: Some("news".to_string()),
                department: None,
                comments: Some(42.0),
                hit_parade: Some(vec![12.0, 10.0, 7.0, 1.0]),
            })
        );
    }

    #[test]
    fn test_generate_item_joins_hit_parade() {
        let item = Item {
            hit_parade: Some(vec![3.0, 2.0, 1.0]),
            ..Default::default()
        };
        let node = generate_item(&item).unwrap();
        assert_eq!(node.get("slash:hit_parade"), Some(&Value::from("3,2,1")));
        assert_eq!(generate_item(&Item::default()), None);
    }
}
