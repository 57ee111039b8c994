//! The packaged fallback dataset.
//!
//! Entries are pre-normalized points. Because the file is maintained by hand
//! it is checked against the same rules live points satisfy before use:
//! entries that do not deserialize, carry invalid coordinates, or attach an
//! `accepts` list to a hospital or shelter are skipped with a warning.

use std::path::{Path, PathBuf};

use ecomap_core::PointOfInterest;

use crate::error::FallbackError;

/// Dataset compiled into the binary.
const BUNDLED_LOCATIONS: &str = include_str!("../data/locations.json");

/// Where the fallback points come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackSource {
    Bundled,
    File(PathBuf),
}

impl FallbackSource {
    #[must_use]
    pub fn from_config(config: &ecomap_core::AppConfig) -> Self {
        config
            .fallback_path
            .clone()
            .map_or(FallbackSource::Bundled, FallbackSource::File)
    }

    fn origin(&self) -> String {
        match self {
            FallbackSource::Bundled => "<bundled>".to_owned(),
            FallbackSource::File(path) => path.display().to_string(),
        }
    }
}

/// Points that passed the compatibility check, plus how many were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackDataset {
    pub points: Vec<PointOfInterest>,
    pub skipped: usize,
}

/// Loads the fallback dataset from `source`.
///
/// # Errors
///
/// - [`FallbackError::Io`] if the file cannot be read.
/// - [`FallbackError::Json`] if the document is not JSON.
/// - [`FallbackError::NotAnArray`] if the document is not a JSON array.
pub fn load_fallback(source: &FallbackSource) -> Result<FallbackDataset, FallbackError> {
    match source {
        FallbackSource::Bundled => parse_fallback(BUNDLED_LOCATIONS, &source.origin()),
        FallbackSource::File(path) => {
            let content = read_file(path)?;
            parse_fallback(&content, &source.origin())
        }
    }
}

fn read_file(path: &Path) -> Result<String, FallbackError> {
    std::fs::read_to_string(path).map_err(|source| FallbackError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Parses and validates a fallback document.
///
/// # Errors
///
/// See [`load_fallback`].
pub fn parse_fallback(content: &str, origin: &str) -> Result<FallbackDataset, FallbackError> {
    let document: serde_json::Value =
        serde_json::from_str(content).map_err(|source| FallbackError::Json {
            origin: origin.to_owned(),
            source,
        })?;
    let serde_json::Value::Array(entries) = document else {
        return Err(FallbackError::NotAnArray {
            origin: origin.to_owned(),
        });
    };

    let total = entries.len();
    let mut points = Vec::with_capacity(total);
    for (index, entry) in entries.into_iter().enumerate() {
        match check_entry(entry) {
            Ok(point) => points.push(point),
            Err(reason) => {
                tracing::warn!(origin, index, reason = %reason, "skipping incompatible fallback entry");
            }
        }
    }

    let skipped = total - points.len();
    tracing::debug!(origin, loaded = points.len(), skipped, "loaded fallback dataset");
    Ok(FallbackDataset { points, skipped })
}

fn check_entry(entry: serde_json::Value) -> Result<PointOfInterest, String> {
    let point: PointOfInterest = serde_json::from_value(entry).map_err(|e| e.to_string())?;
    point.coordinates.validate().map_err(|e| e.to_string())?;
    if point.accepts.is_some() && !point.category.accepts_materials() {
        return Err(format!(
            "{} entry {} must not carry an accepts list",
            point.category, point.id
        ));
    }
    if point.name.trim().is_empty() {
        return Err(format!("entry {} has an empty name", point.id));
    }
    Ok(point)
}
