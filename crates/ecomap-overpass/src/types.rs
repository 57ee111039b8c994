//! Overpass interpreter response types (`[out:json]` with `out center;`).
//!
//! ## Observed shape
//!
//! ### Elements
//! The body is an object with an `elements` array. Nodes carry `lat`/`lon`
//! directly; ways and relations only carry them when the query asks for
//! `out center;`, in which case they arrive as a nested `center` object.
//!
//! ### `tags`
//! Omitted entirely on untagged elements, so it defaults to an empty map.
//! Values are always strings, including affirmative flags (`"yes"`).
//!
//! ### `elements`
//! Missing when the interpreter reports a runtime error in `remark`. We treat
//! a missing or non-array `elements` field as an empty result rather than a
//! malformed one, and skip individual elements of the wrong shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Top-level interpreter response.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default, deserialize_with = "elements_or_empty")]
    pub elements: Vec<RawRecord>,

    /// Interpreter diagnostics, e.g. `"runtime error: Query timed out"`.
    #[serde(default)]
    pub remark: Option<String>,
}

/// One tagged element, consumed once by the classifier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    /// `node`, `way`, or `relation`.
    #[serde(rename = "type", default)]
    pub element_type: Option<String>,
    /// Element IDs are only unique per element type.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// Centroid emitted for way/relation geometries.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

impl RawRecord {
    /// Returns the tag value for `key`, treating empty strings as absent.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Returns the tag value for `key` exactly as tagged, blanks included.
    #[must_use]
    pub fn raw_tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// `true` when `key` is tagged with the affirmative value `yes`.
    #[must_use]
    pub fn is_yes(&self, key: &str) -> bool {
        self.tag(key) == Some("yes")
    }

    /// Direct point coordinate when both parts are present, else the centroid.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Some((lat, lon));
        }
        self.center.map(|c| (c.lat, c.lon))
    }
}

fn elements_or_empty<'de, D>(deserializer: D) -> Result<Vec<RawRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    // Elements that do not fit the record shape (e.g. a string `lat`) are
    // skipped individually; they could never produce a point anyway.
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_node_and_way_with_center() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 3.1, "lon": 101.6,
                 "tags": {"amenity": "hospital", "name": "General Hospital"}},
                {"type": "way", "id": 2, "center": {"lat": 3.2, "lon": 101.7},
                 "tags": {"amenity": "recycling"}}
            ]
        }"#;
        let parsed: OverpassResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.elements.len(), 2);
        assert_eq!(parsed.elements[0].position(), Some((3.1, 101.6)));
        assert_eq!(parsed.elements[1].position(), Some((3.2, 101.7)));
        assert_eq!(parsed.elements[1].element_type.as_deref(), Some("way"));
    }

    #[test]
    fn missing_tags_default_to_empty() {
        let parsed: OverpassResponse =
            serde_json::from_str(r#"{"elements": [{"type": "node", "id": 5, "lat": 1.0, "lon": 2.0}]}"#)
                .unwrap();
        assert!(parsed.elements[0].tags.is_empty());
    }

    #[test]
    fn missing_elements_is_empty() {
        let parsed: OverpassResponse =
            serde_json::from_str(r#"{"remark": "runtime error: Query timed out"}"#).unwrap();
        assert!(parsed.elements.is_empty());
        assert_eq!(
            parsed.remark.as_deref(),
            Some("runtime error: Query timed out")
        );
    }

    #[test]
    fn non_array_elements_is_empty() {
        let parsed: OverpassResponse = serde_json::from_str(r#"{"elements": {"oops": 1}}"#).unwrap();
        assert!(parsed.elements.is_empty());
    }

    #[test]
    fn ill_typed_element_is_skipped() {
        let parsed: OverpassResponse = serde_json::from_str(
            r#"{"elements": [
                {"type": "node", "id": 1, "lat": "3.1", "lon": 101.6},
                {"type": "node", "id": 2, "lat": 3.2, "lon": 101.7}
            ]}"#,
        )
        .unwrap();
        assert_eq!(parsed.elements.len(), 1);
        assert_eq!(parsed.elements[0].id, Some(2));
    }

    #[test]
    fn position_prefers_direct_point_over_center() {
        let record = RawRecord {
            element_type: Some("node".to_owned()),
            id: Some(1),
            lat: Some(1.0),
            lon: Some(2.0),
            center: Some(Center { lat: 9.0, lon: 9.0 }),
            tags: BTreeMap::new(),
        };
        assert_eq!(record.position(), Some((1.0, 2.0)));
    }

    #[test]
    fn position_ignores_half_a_direct_point() {
        let record = RawRecord {
            element_type: None,
            id: None,
            lat: Some(1.0),
            lon: None,
            center: None,
            tags: BTreeMap::new(),
        };
        assert_eq!(record.position(), None);
    }

    #[test]
    fn blank_tag_values_are_absent() {
        let mut tags = BTreeMap::new();
        tags.insert("name".to_owned(), "   ".to_owned());
        tags.insert("recycling:glass".to_owned(), "yes".to_owned());
        let record = RawRecord {
            element_type: None,
            id: None,
            lat: None,
            lon: None,
            center: None,
            tags,
        };
        assert_eq!(record.tag("name"), None);
        assert!(record.is_yes("recycling:glass"));
        assert!(!record.is_yes("recycling:paper"));
    }
}
