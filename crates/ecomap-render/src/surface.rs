//! The drawing seam between the renderer and a concrete map.

use std::fmt;
use std::io::Write;
use std::path::Path;

use ecomap_core::{Category, Coordinates};
use serde_json::json;

use crate::error::RenderError;
use crate::style::{MarkerIcon, MarkerStyle};

/// Position of a marker within the current render pass.
///
/// Identifiers are reassigned on every pass because every pass starts from
/// a cleared surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub usize);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything a surface needs to draw one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub point_id: i64,
    pub category: Category,
    pub coordinates: Coordinates,
    pub style: MarkerStyle,
    pub popup_html: String,
    pub icon: &'static MarkerIcon,
}

/// A map the renderer can draw on.
pub trait MapSurface {
    fn set_view(&mut self, center: Coordinates, zoom: u8);

    fn clear_markers(&mut self);

    /// Places one marker.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MarkerRejected`] if the surface cannot draw it.
    fn add_marker(&mut self, marker: Marker) -> Result<(), RenderError>;
}

/// In-memory surface that records every call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    markers: Vec<Marker>,
    view: Option<(Coordinates, u8)>,
    clear_count: usize,
    limit: Option<usize>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that rejects every marker beyond the first `limit`.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn view(&self) -> Option<(Coordinates, u8)> {
        self.view
    }

    /// How many times the surface was cleared.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clear_count
    }
}

impl MapSurface for RecordingSurface {
    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.view = Some((center, zoom));
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
        self.clear_count += 1;
    }

    fn add_marker(&mut self, marker: Marker) -> Result<(), RenderError> {
        if self.limit.is_some_and(|limit| self.markers.len() >= limit) {
            return Err(RenderError::MarkerRejected {
                marker: marker.id,
                reason: "surface is full".to_owned(),
            });
        }
        self.markers.push(marker);
        Ok(())
    }
}

/// Surface that collects markers into a GeoJSON `FeatureCollection`.
#[derive(Debug, Default)]
pub struct GeoJsonSurface {
    features: Vec<serde_json::Value>,
    view: Option<(Coordinates, u8)>,
}

impl GeoJsonSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a surface whose collection will be written to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SurfaceUnavailable`] if the containing
    /// directory does not exist.
    pub fn for_output(path: &Path) -> Result<Self, RenderError> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !parent.is_dir() {
            return Err(RenderError::SurfaceUnavailable {
                reason: format!("output directory {} does not exist", parent.display()),
            });
        }
        Ok(Self::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The collected markers. The current view, if any, is stored in the
    /// collection's `properties` as `center` (`[lng, lat]`) and `zoom`.
    #[must_use]
    pub fn to_feature_collection(&self) -> serde_json::Value {
        let mut collection = json!({
            "type": "FeatureCollection",
            "features": self.features,
        });
        if let Some((center, zoom)) = self.view {
            collection["properties"] = json!({
                "center": [center.lng, center.lat],
                "zoom": zoom,
            });
        }
        collection
    }

    /// Writes the collection as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns any I/O or serialization error from the writer.
    pub fn write_to<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, &self.to_feature_collection())
    }
}

impl MapSurface for GeoJsonSurface {
    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.view = Some((center, zoom));
    }

    fn clear_markers(&mut self) {
        self.features.clear();
    }

    fn add_marker(&mut self, marker: Marker) -> Result<(), RenderError> {
        self.features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [marker.coordinates.lng, marker.coordinates.lat],
            },
            "properties": {
                "marker": marker.id.0,
                "id": marker.point_id,
                "category": marker.category,
                "style": marker.style,
                "popup": marker.popup_html,
            },
        }));
        Ok(())
    }
}
