//! Overpass QL for the nationwide point-of-interest query.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Server-side execution limit requested in the query header, in seconds.
const SERVER_TIMEOUT_SECS: u32 = 120;

/// Tag filters requested for every element type, in query order.
const TAG_FILTERS: [(&str, &str); 4] = [
    ("amenity", "hospital"),
    ("amenity", "recycling"),
    ("emergency", "shelter"),
    ("amenity", "shelter"),
];

const ELEMENT_TYPES: [&str; 3] = ["node", "way", "relation"];

/// Builds the aggregated query scoped to the country's `admin_level=2` area.
///
/// `country_code` is an ISO 3166-1 alpha-2 code such as `MY`.
#[must_use]
pub fn build_country_query(country_code: &str) -> String {
    let mut query = format!(
        "[out:json][timeout:{SERVER_TIMEOUT_SECS}];\n\
         area[\"ISO3166-1\"=\"{country_code}\"][admin_level=2]->.searchArea;\n(\n"
    );
    for (key, value) in TAG_FILTERS {
        for element in ELEMENT_TYPES {
            query.push_str(&format!(
                "  {element}[\"{key}\"=\"{value}\"](area.searchArea);\n"
            ));
        }
    }
    query.push_str(");\nout center;\n");
    query
}

/// Encodes `query` as the `application/x-www-form-urlencoded` POST body.
#[must_use]
pub fn form_body(query: &str) -> String {
    format!("data={}", utf8_percent_encode(query, NON_ALPHANUMERIC))
}
