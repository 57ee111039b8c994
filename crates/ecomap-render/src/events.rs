//! Events reported upward to the hosting page.

use ecomap_core::{PointOfInterest, Selection};

use crate::surface::MarkerId;

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/?api=1&destination=";

/// A marker was activated. The page applies it to its [`Selection`].
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerActivated {
    pub marker: MarkerId,
    pub point: PointOfInterest,
}

impl MarkerActivated {
    /// Makes the activated point the page's selection, returning the
    /// previous one.
    pub fn apply_to(self, selection: &mut Selection) -> Option<PointOfInterest> {
        selection.select(self.point)
    }
}

/// External directions link for a point.
#[must_use]
pub fn directions_url(point: &PointOfInterest) -> String {
    format!(
        "{DIRECTIONS_BASE}{},{}",
        point.coordinates.lat, point.coordinates.lng
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecomap_core::{Category, Coordinates};

    fn point(id: i64) -> PointOfInterest {
        PointOfInterest {
            id,
            name: "Shelter".to_owned(),
            category: Category::Shelter,
            coordinates: Coordinates {
                lat: 3.1707,
                lng: 101.7006,
            },
            address: "Malaysia".to_owned(),
            hours: None,
            phone: None,
            accepts: None,
            capacity: None,
        }
    }

    #[test]
    fn directions_url_uses_lat_then_lng() {
        assert_eq!(
            directions_url(&point(1)),
            "https://www.google.com/maps/dir/?api=1&destination=3.1707,101.7006"
        );
    }

    #[test]
    fn activation_replaces_selection() {
        let mut selection = Selection::default();
        let first = MarkerActivated {
            marker: MarkerId(0),
            point: point(1),
        };
        assert!(first.apply_to(&mut selection).is_none());

        let second = MarkerActivated {
            marker: MarkerId(1),
            point: point(2),
        };
        let previous = second.apply_to(&mut selection);
        assert_eq!(previous.map(|p| p.id), Some(1));
        assert_eq!(selection.current().map(|p| p.id), Some(2));
    }
}
