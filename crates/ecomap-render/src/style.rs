//! Marker appearance: category colors, circle style, popup markup, and the
//! shared default icon.

use std::sync::OnceLock;

use ecomap_core::{Category, PointOfInterest};
use serde::Serialize;

/// Fill color for a category's markers.
#[must_use]
pub const fn category_color(category: Category) -> &'static str {
    match category {
        Category::Recycling => "#10b981",
        Category::Ewaste => "#3b82f6",
        Category::Hospital => "#ef4444",
        Category::Shelter => "#f59e0b",
    }
}

/// Circle-marker style, serialized with the option names map libraries use.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: u32,
    /// Stroke color.
    pub color: &'static str,
    pub weight: u32,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
}

impl MarkerStyle {
    #[must_use]
    pub fn for_category(category: Category) -> Self {
        Self {
            radius: 6,
            color: "#ffffff",
            weight: 1,
            fill_color: category_color(category),
            fill_opacity: 0.9,
        }
    }
}

/// Popup markup for a point: bold name, line break, address.
///
/// Both values come from free-form upstream tags and are escaped.
#[must_use]
pub fn popup_html(point: &PointOfInterest) -> String {
    format!(
        "<strong>{}</strong><br>{}",
        escape_html(&point.name),
        escape_html(&point.address)
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Default pin icon shared by every marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub icon_url: &'static str,
    pub shadow_url: &'static str,
    pub icon_size: [u32; 2],
    pub icon_anchor: [u32; 2],
}

/// Returns the process-wide default icon, creating it on first call.
///
/// The icon is immutable once created; callers only ever see a shared
/// reference.
pub fn bootstrap_marker_icon() -> &'static MarkerIcon {
    static ICON: OnceLock<MarkerIcon> = OnceLock::new();
    ICON.get_or_init(|| {
        tracing::debug!("initializing default marker icon");
        MarkerIcon {
            icon_url: "images/marker-icon.png",
            shadow_url: "images/marker-shadow.png",
            icon_size: [25, 41],
            icon_anchor: [12, 41],
        }
    })
}
