use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use ecomap_core::{ActiveFilterSet, Category, PointOfInterest};
use ecomap_render::{category_color, directions_url};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PinsQuery {
    /// Comma-separated category list; absent or empty means all.
    pub categories: Option<String>,
}

/// A point plus the marker color the map draws it with.
#[derive(Debug, Serialize)]
pub(super) struct LocationPinItem {
    #[serde(flatten)]
    pub point: PointOfInterest,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct CategoryItem {
    pub id: Category,
    pub label: &'static str,
    pub color: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct DirectionsItem {
    pub id: i64,
    pub name: String,
    pub url: String,
}

/// Legend entries in display order, with per-category counts.
pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CategoryItem>>> {
    let data = Category::ALL
        .iter()
        .map(|&category| CategoryItem {
            id: category,
            label: category.label(),
            color: category_color(category),
            count: state
                .points
                .iter()
                .filter(|p| p.category == category)
                .count(),
        })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn list_location_pins(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PinsQuery>,
) -> Result<Json<ApiResponse<Vec<LocationPinItem>>>, ApiError> {
    let filters = query
        .categories
        .as_deref()
        .unwrap_or_default()
        .parse::<ActiveFilterSet>()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e))?;

    let data = filters
        .apply(&state.points)
        .map(|point| LocationPinItem {
            point: point.clone(),
            color: category_color(point.category),
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<LocationPinItem>>, ApiError> {
    let point = find_point(&state, id, &req_id)?;
    Ok(Json(ApiResponse {
        data: LocationPinItem {
            point: point.clone(),
            color: category_color(point.category),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_directions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DirectionsItem>>, ApiError> {
    let point = find_point(&state, id, &req_id)?;
    Ok(Json(ApiResponse {
        data: DirectionsItem {
            id: point.id,
            name: point.name.clone(),
            url: directions_url(point),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// First point with `id`. Identifiers may repeat across element types; the
/// first occurrence in load order wins.
fn find_point<'a>(
    state: &'a AppState,
    id: i64,
    req_id: &RequestId,
) -> Result<&'a PointOfInterest, ApiError> {
    state.points.iter().find(|p| p.id == id).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("location {id} not found"),
        )
    })
}
