use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::map::dtos::{MapConfigDto, MarkerDto, PointCheckDto};
use crate::features::map::services::MapService;
use crate::shared::geo::GeoPoint;
use crate::shared::types::{ApiResponse, Meta};

/// Map settings: city, initial view, bounds, tiles and priority legend
#[utoipa::path(
    get,
    path = "/api/map/config",
    tag = "map",
    responses(
        (status = 200, description = "Map configuration", body = ApiResponse<MapConfigDto>)
    )
)]
pub async fn get_map_config(
    State(service): State<Arc<MapService>>,
) -> Json<ApiResponse<MapConfigDto>> {
    Json(ApiResponse::success(Some(service.config()), None, None))
}

/// Markers for approved reports inside the city
#[utoipa::path(
    get,
    path = "/api/map/markers",
    tag = "map",
    responses(
        (status = 200, description = "Report markers", body = ApiResponse<Vec<MarkerDto>>)
    )
)]
pub async fn list_markers(
    State(service): State<Arc<MapService>>,
) -> Result<Json<ApiResponse<Vec<MarkerDto>>>> {
    let markers = service.markers().await?;
    let total = markers.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(markers),
        None,
        Some(Meta { total }),
    )))
}

/// Check that a picked location lies inside the city
#[utoipa::path(
    post,
    path = "/api/map/validate-point",
    tag = "map",
    request_body = GeoPoint,
    responses(
        (status = 200, description = "Point is inside the city", body = ApiResponse<PointCheckDto>),
        (status = 400, description = "Point is outside the city")
    )
)]
pub async fn validate_point(
    State(service): State<Arc<MapService>>,
    AppJson(point): AppJson<GeoPoint>,
) -> Result<Json<ApiResponse<PointCheckDto>>> {
    let check = service.validate_point(point)?;
    Ok(Json(ApiResponse::success(Some(check), None, None)))
}
