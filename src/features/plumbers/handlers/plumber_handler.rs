use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::plumbers::dtos::{PlumberOptionsDto, PlumberResponseDto};
use crate::features::plumbers::services::PlumberService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List approved plumbers (public)
#[utoipa::path(
    get,
    path = "/api/plumbers",
    tag = "plumbers",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Approved plumbers, best rated first", body = ApiResponse<Vec<PlumberResponseDto>>)
    )
)]
pub async fn list_plumbers(
    State(service): State<Arc<PlumberService>>,
    Query(page): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<PlumberResponseDto>>>> {
    let (plumbers, total) = service.list_approved(&page).await?;
    let data = plumbers.into_iter().map(PlumberResponseDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(data),
        None,
        Some(Meta { total }),
    )))
}

/// Specialty and working-area choices for plumber sign-up
#[utoipa::path(
    get,
    path = "/api/plumbers/options",
    tag = "plumbers",
    responses(
        (status = 200, description = "Registration options", body = ApiResponse<PlumberOptionsDto>)
    )
)]
pub async fn get_plumber_options() -> Json<ApiResponse<PlumberOptionsDto>> {
    Json(ApiResponse::success(
        Some(PlumberOptionsDto::default()),
        None,
        None,
    ))
}

/// Get an approved plumber by ID (public)
#[utoipa::path(
    get,
    path = "/api/plumbers/{id}",
    tag = "plumbers",
    params(
        ("id" = Uuid, Path, description = "Plumber ID")
    ),
    responses(
        (status = 200, description = "Plumber found", body = ApiResponse<PlumberResponseDto>),
        (status = 404, description = "Plumber not found")
    )
)]
pub async fn get_plumber(
    State(service): State<Arc<PlumberService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PlumberResponseDto>>> {
    let plumber = service.get_approved(id).await?;

    Ok(Json(ApiResponse::success(
        Some(plumber.into()),
        None,
        None,
    )))
}
