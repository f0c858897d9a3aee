//! GeoRSS-Simple (`georss:`) geometries and feature metadata.
//!
//! Geometries are whitespace-separated `lat lng` pairs. A geometry whose
//! text has an odd number of values, a non-numeric value or the wrong
//! number of pairs for its shape is dropped.

use serde::{Deserialize, Serialize};

use crate::tree::{format_number, Node, Value};
use crate::util::{
    generate_cdata_string, generate_number, generate_plain_string, parse_singular_of,
    parse_text_number, parse_text_string, trim_object,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub lower_corner: Point,
    pub upper_corner: Point,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOrFeed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Polygon>,
    #[serde(rename = "box", skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_type_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// Splits coordinate text into points, requiring at least `min` and at
/// most `max` pairs.
pub fn parse_lat_lng_pairs(text: &str, min: usize, max: Option<usize>) -> Option<Vec<Point>> {
    let numbers = text
        .split_whitespace()
        .map(|part| part.parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect::<Option<Vec<_>>>()?;
    if numbers.is_empty() || numbers.len() % 2 != 0 {
        return None;
    }

    let points = numbers
        .chunks_exact(2)
        .map(|pair| Point {
            lat: pair[0],
            lng: pair[1],
        })
        .collect::<Vec<_>>();
    if points.len() < min || max.is_some_and(|max| points.len() > max) {
        return None;
    }
    Some(points)
}

fn parse_pairs(value: &Value, min: usize, max: Option<usize>) -> Option<Vec<Point>> {
    parse_text_string(value).and_then(|text| parse_lat_lng_pairs(&text, min, max))
}

fn parse_point(value: &Value) -> Option<Point> {
    parse_pairs(value, 1, Some(1))?.into_iter().next()
}

fn parse_line(value: &Value) -> Option<Line> {
    Some(Line {
        points: parse_pairs(value, 2, None)?,
    })
}

/// A closed ring needs at least four pairs, the last repeating the first.
fn parse_polygon(value: &Value) -> Option<Polygon> {
    Some(Polygon {
        points: parse_pairs(value, 4, None)?,
    })
}

fn parse_box(value: &Value) -> Option<BoundingBox> {
    let points = parse_pairs(value, 2, Some(2))?;
    Some(BoundingBox {
        lower_corner: points[0],
        upper_corner: points[1],
    })
}

pub fn retrieve_item_or_feed(node: &Node) -> Option<ItemOrFeed> {
    let text = |key: &str| parse_singular_of(node.get(key), parse_text_string);
    let number = |key: &str| parse_singular_of(node.get(key), parse_text_number);

    trim_object(ItemOrFeed {
        point: parse_singular_of(node.get("georss:point"), parse_point),
        line: parse_singular_of(node.get("georss:line"), parse_line),
        polygon: parse_singular_of(node.get("georss:polygon"), parse_polygon),
        bbox: parse_singular_of(node.get("georss:box"), parse_box),
        feature_type_tag: text("georss:featuretypetag"),
        relationship_tag: text("georss:relationshiptag"),
        feature_name: text("georss:featurename"),
        elev: number("georss:elev"),
        floor: number("georss:floor"),
        radius: number("georss:radius"),
    })
}

fn generate_points(points: &[Point]) -> Option<Value> {
    let text = points
        .iter()
        .filter(|point| point.lat.is_finite() && point.lng.is_finite())
        .map(|point| format!("{} {}", format_number(point.lat), format_number(point.lng)))
        .collect::<Vec<_>>()
        .join(" ");
    generate_plain_string(Some(&text))
}

pub fn generate_item_or_feed(value: &ItemOrFeed) -> Option<Node> {
    Node::new()
        .with("georss:point", value.point.and_then(|point| generate_points(&[point])))
        .with("georss:line", value.line.as_ref().and_then(|line| generate_points(&line.points)))
        .with(
            "georss:polygon",
            value.polygon.as_ref().and_then(|polygon| generate_points(&polygon.points)),
        )
        .with(
            "georss:box",
            value
                .bbox
                .as_ref()
                .and_then(|bbox| generate_points(&[bbox.lower_corner, bbox.upper_corner])),
        )
        .with("georss:featureTypeTag", generate_cdata_string(value.feature_type_tag.as_deref()))
        .with("georss:relationshipTag", generate_cdata_string(value.relationship_tag.as_deref()))
        .with("georss:featureName", generate_cdata_string(value.feature_name.as_deref()))
        .with("georss:elev", generate_number(value.elev))
        .with("georss:floor", generate_number(value.floor))
        .with("georss:radius", generate_number(value.radius))
        .trimmed()
}
