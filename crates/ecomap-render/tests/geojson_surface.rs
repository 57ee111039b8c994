//! Rendering into a GeoJSON `FeatureCollection`.

use ecomap_core::{ActiveFilterSet, Category, Coordinates, InputVersion, MountGuard, PointOfInterest};
use ecomap_render::{GeoJsonSurface, IncrementalRenderer, RenderError, RenderOutcome};

fn point(id: i64, category: Category, lat: f64, lng: f64) -> PointOfInterest {
    PointOfInterest {
        id,
        name: format!("Point {id}"),
        category,
        coordinates: Coordinates { lat, lng },
        address: "Kuala Lumpur".to_owned(),
        hours: None,
        phone: None,
        accepts: None,
        capacity: None,
    }
}

#[tokio::test]
async fn features_use_lng_lat_order_and_category_color() {
    let points = vec![
        point(1, Category::Hospital, 3.1, 101.6),
        point(2, Category::Shelter, 6.1, 102.2),
    ];
    let mut renderer = IncrementalRenderer::new(Ok(GeoJsonSurface::new()), 300);
    let outcome = renderer
        .render(
            &points,
            &ActiveFilterSet::all(),
            &InputVersion::default(),
            &MountGuard::new(),
        )
        .await;
    assert!(matches!(outcome, RenderOutcome::Complete(_)), "got: {outcome:?}");

    let collection = renderer.into_surface().unwrap().to_feature_collection();
    assert_eq!(collection["type"], "FeatureCollection");
    let features = collection["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["geometry"]["coordinates"][0], 101.6);
    assert_eq!(features[0]["geometry"]["coordinates"][1], 3.1);
    assert_eq!(features[0]["properties"]["category"], "hospital");
    assert_eq!(features[0]["properties"]["style"]["fillColor"], "#ef4444");
    assert_eq!(features[1]["properties"]["id"], 2);
    assert_eq!(collection["properties"]["zoom"], 7);
}

#[test]
fn missing_output_directory_is_surface_unavailable() {
    let err = GeoJsonSurface::for_output(std::path::Path::new("/nonexistent/ecomap/map.geojson"))
        .unwrap_err();
    assert!(matches!(err, RenderError::SurfaceUnavailable { .. }), "got: {err:?}");
}

#[test]
fn written_collection_is_valid_json() {
    let surface = GeoJsonSurface::new();
    let mut buf = Vec::new();
    surface.write_to(&mut buf).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(parsed["features"].as_array().map(Vec::len), Some(0));
}
