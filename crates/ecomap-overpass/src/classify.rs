//! Classification of raw Overpass elements into [`PointOfInterest`]s.
//!
//! Each record is handled independently: the output depends only on that
//! record's coordinates and tags, so re-running the classifier over the same
//! input yields the same points in the same order.

use ecomap_core::{Category, Coordinates, Material, PointOfInterest};

use crate::types::RawRecord;

/// Sub-tags that turn a generic recycling amenity into an e-waste point.
const EWASTE_TAGS: [&str; 3] = [
    "recycling:electronics",
    "recycling:electrical_items",
    "recycling:batteries",
];

/// Shelter subtypes that are not emergency shelters.
const NON_EMERGENCY_SHELTER_TYPES: [&str; 2] = ["public_transport", "weather_shelter"];

/// Address parts joined when `addr:full` is absent, in output order.
const ADDRESS_PARTS: [&str; 4] = ["addr:housenumber", "addr:street", "addr:city", "addr:state"];

/// Why a record produced no point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Neither a direct coordinate nor a centroid.
    NoCoordinate,
    /// Coordinate present but NaN, infinite or outside WGS84.
    InvalidCoordinate,
    /// Tags match none of the four categories.
    Unclassified,
}

/// Per-run counts, logged after each classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifySummary {
    pub kept: usize,
    pub no_coordinate: usize,
    pub invalid_coordinate: usize,
    pub unclassified: usize,
}

impl ClassifySummary {
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.no_coordinate + self.invalid_coordinate + self.unclassified
    }

    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::NoCoordinate => self.no_coordinate += 1,
            DropReason::InvalidCoordinate => self.invalid_coordinate += 1,
            DropReason::Unclassified => self.unclassified += 1,
        }
    }
}

/// Resolves the category of a record by tag precedence: hospital, then
/// recycling (e-waste when an electronics or battery sub-tag is `yes`), then
/// shelter.
#[must_use]
pub fn classify_category(record: &RawRecord) -> Option<Category> {
    let amenity = record.tag("amenity");
    if amenity == Some("hospital") {
        return Some(Category::Hospital);
    }
    if amenity == Some("recycling") {
        let is_ewaste = EWASTE_TAGS.iter().any(|tag| record.is_yes(tag));
        return Some(if is_ewaste {
            Category::Ewaste
        } else {
            Category::Recycling
        });
    }
    let general_shelter = amenity == Some("shelter")
        && !record
            .tag("shelter_type")
            .is_some_and(|t| NON_EMERGENCY_SHELTER_TYPES.contains(&t));
    if record.tag("emergency") == Some("shelter") || general_shelter {
        return Some(Category::Shelter);
    }
    None
}

/// Converts one record into a point.
///
/// `index` is the record's position in the response; it stands in for the
/// identifier when the element carries none.
///
/// # Errors
///
/// Returns the [`DropReason`] when the record cannot become a point.
pub fn classify_record(
    record: &RawRecord,
    index: usize,
    country_name: &str,
) -> Result<PointOfInterest, DropReason> {
    let (lat, lng) = record.position().ok_or(DropReason::NoCoordinate)?;
    let coordinates = Coordinates::new(lat, lng).map_err(|_| DropReason::InvalidCoordinate)?;
    let category = classify_category(record).ok_or(DropReason::Unclassified)?;

    let id = record
        .id
        .unwrap_or_else(|| i64::try_from(index).unwrap_or(i64::MAX));
    let name = record
        .tag("name")
        .map_or_else(|| category.default_name().to_owned(), str::to_owned);
    let accepts = category
        .accepts_materials()
        .then(|| resolve_accepts(record));

    Ok(PointOfInterest {
        id,
        name,
        category,
        coordinates,
        address: resolve_address(record, country_name),
        hours: record.raw_tag("opening_hours").map(str::to_owned),
        phone: record
            .raw_tag("phone")
            .filter(|v| !v.is_empty())
            .or_else(|| record.raw_tag("contact:phone"))
            .map(str::to_owned),
        accepts,
        capacity: None,
    })
}

/// Classifies every record, preserving input order.
#[must_use]
pub fn classify_records(
    records: &[RawRecord],
    country_name: &str,
) -> (Vec<PointOfInterest>, ClassifySummary) {
    let mut summary = ClassifySummary::default();
    let mut points = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        match classify_record(record, index, country_name) {
            Ok(point) => points.push(point),
            Err(reason) => summary.record(reason),
        }
    }
    summary.kept = points.len();

    tracing::debug!(
        input = records.len(),
        kept = summary.kept,
        no_coordinate = summary.no_coordinate,
        invalid_coordinate = summary.invalid_coordinate,
        unclassified = summary.unclassified,
        "classified Overpass elements"
    );
    (points, summary)
}

fn resolve_address(record: &RawRecord, country_name: &str) -> String {
    if let Some(full) = record.tag("addr:full") {
        return full.to_owned();
    }
    let joined = ADDRESS_PARTS
        .iter()
        .filter_map(|key| record.tag(key))
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        country_name.to_owned()
    } else {
        joined
    }
}

fn resolve_accepts(record: &RawRecord) -> Vec<Material> {
    let electronics = record.is_yes("recycling:electronics")
        || record.is_yes("recycling:electrical_items");
    [
        (record.is_yes("recycling:glass"), Material::Glass),
        (record.is_yes("recycling:paper"), Material::Paper),
        (record.is_yes("recycling:plastic"), Material::Plastic),
        (record.is_yes("recycling:metal"), Material::Metal),
        (record.is_yes("recycling:cardboard"), Material::Cardboard),
        (electronics, Material::Electronics),
        (record.is_yes("recycling:batteries"), Material::Batteries),
    ]
    .into_iter()
    .filter_map(|(accepted, material)| accepted.then_some(material))
    .collect()
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
