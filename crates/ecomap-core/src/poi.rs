//! Normalized points of interest.
//!
//! The serialized shape matches the bundled `data/locations.json` dataset:
//! the category is written under `type` and the coordinate pair is flattened
//! into `lat`/`lng`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of point categories shown on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Recycling,
    Ewaste,
    Hospital,
    Shelter,
}

impl Category {
    /// All categories in legend order.
    pub const ALL: [Category; 4] = [
        Category::Recycling,
        Category::Ewaste,
        Category::Hospital,
        Category::Shelter,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Recycling => "recycling",
            Category::Ewaste => "ewaste",
            Category::Hospital => "hospital",
            Category::Shelter => "shelter",
        }
    }

    /// Human-readable legend label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Recycling => "Recycling Centers",
            Category::Ewaste => "E-Waste Points",
            Category::Hospital => "Hospitals",
            Category::Shelter => "Flood Shelters",
        }
    }

    /// Placeholder name used when the upstream record carries no `name` tag.
    #[must_use]
    pub fn default_name(self) -> &'static str {
        match self {
            Category::Hospital => "Hospital",
            Category::Shelter => "Shelter",
            Category::Recycling | Category::Ewaste => "Recycling Point",
        }
    }

    /// Only recycling and e-waste points carry an `accepts` list.
    #[must_use]
    pub fn accepts_materials(self) -> bool {
        matches!(self, Category::Recycling | Category::Ewaste)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recycling" => Ok(Category::Recycling),
            "ewaste" | "e-waste" => Ok(Category::Ewaste),
            "hospital" => Ok(Category::Hospital),
            "shelter" => Ok(Category::Shelter),
            other => Err(format!(
                "unknown category \"{other}\"; expected one of recycling, ewaste, hospital, shelter"
            )),
        }
    }
}

/// Material accepted at a recycling or e-waste point, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Glass,
    Paper,
    Plastic,
    Metal,
    Cardboard,
    Electronics,
    Batteries,
}

impl Material {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Material::Glass => "glass",
            Material::Paper => "paper",
            Material::Plastic => "plastic",
            Material::Metal => "metal",
            Material::Cardboard => "cardboard",
            Material::Electronics => "electronics",
            Material::Batteries => "batteries",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("coordinate is not a finite number (lat={lat}, lng={lng})")]
    NonFinite { lat: f64, lng: f64 },

    #[error("coordinate out of range (lat={lat}, lng={lng})")]
    OutOfRange { lat: f64, lng: f64 },
}

/// WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Builds a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either component is NaN/infinite or
    /// lies outside the WGS84 range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        let coordinates = Self { lat, lng };
        coordinates.validate()?;
        Ok(coordinates)
    }

    /// # Errors
    ///
    /// See [`Coordinates::new`].
    pub fn validate(&self) -> Result<(), CoordinateError> {
        let Self { lat, lng } = *self;
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateError::NonFinite { lat, lng });
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::OutOfRange { lat, lng });
        }
        Ok(())
    }
}

/// A categorized location ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Unique within one load cycle only; upstream element IDs are not stable
    /// across node/way/relation types.
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepts: Option<Vec<Material>>,
    /// Free-text shelter capacity; only the bundled dataset carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
}
