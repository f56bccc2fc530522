use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::DashboardDto;
use crate::features::admin::services::AdminService;
use crate::features::auth::guards::RequireAdmin;
use crate::features::moderation::dtos::RejectDto;
use crate::features::news::dtos::NewsDetailResponseDto;
use crate::features::plumbers::dtos::PlumberRegistrationDto;
use crate::features::reports::dtos::ReportDetailResponseDto;
use crate::shared::types::{ApiResponse, Meta};

fn listed<T>(items: Vec<T>) -> Json<ApiResponse<Vec<T>>> {
    let total = items.len() as i64;
    Json(ApiResponse::success(Some(items), None, Some(Meta { total })))
}

fn reviewed<T>(item: T, message: &str) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(
        Some(item),
        Some(message.to_string()),
        None,
    ))
}

fn reason(dto: &RejectDto) -> Result<&str> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(dto.reason.trim())
}

/// Pending counts and number of accounts
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard counters", body = ApiResponse<DashboardDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<DashboardDto>>> {
    let dashboard = service.dashboard().await?;
    Ok(Json(ApiResponse::success(Some(dashboard), None, None)))
}

// =============================================================================
// REPORTS
// =============================================================================

/// List reports awaiting review, newest first
#[utoipa::path(
    get,
    path = "/api/admin/reports/pending",
    responses(
        (status = 200, description = "Pending reports", body = ApiResponse<Vec<ReportDetailResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_pending_reports(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<Vec<ReportDetailResponseDto>>>> {
    let items = service.reports().list_pending().await?;
    Ok(listed(items.into_iter().map(Into::into).collect()))
}

/// Approve a report, making it public and placing it on the map
#[utoipa::path(
    post,
    path = "/api/admin/reports/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report approved (or already approved)", body = ApiResponse<ReportDetailResponseDto>),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report was already rejected")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn approve_report(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let report = service.reports().approve(id, admin.id).await?;
    Ok(reviewed(report.into(), "Report approved"))
}

/// Reject a report with a reason
#[utoipa::path(
    post,
    path = "/api/admin/reports/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = RejectDto,
    responses(
        (status = 200, description = "Report rejected (or already rejected)", body = ApiResponse<ReportDetailResponseDto>),
        (status = 400, description = "Rejection reason is required"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report was already approved")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reject_report(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<RejectDto>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let report = service.reports().reject(id, admin.id, reason(&dto)?).await?;
    Ok(reviewed(report.into(), "Report rejected"))
}

// =============================================================================
// NEWS
// =============================================================================

/// List news awaiting review, newest first
#[utoipa::path(
    get,
    path = "/api/admin/news/pending",
    responses(
        (status = 200, description = "Pending news", body = ApiResponse<Vec<NewsDetailResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_pending_news(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<Vec<NewsDetailResponseDto>>>> {
    let items = service.news().list_pending().await?;
    Ok(listed(items.into_iter().map(Into::into).collect()))
}

/// Approve and publish a news item
#[utoipa::path(
    post,
    path = "/api/admin/news/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "News ID")
    ),
    responses(
        (status = 200, description = "News published (or already published)", body = ApiResponse<NewsDetailResponseDto>),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "News not found"),
        (status = 409, description = "News was already rejected")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn approve_news(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NewsDetailResponseDto>>> {
    let news = service.news().approve(id, admin.id).await?;
    Ok(reviewed(news.into(), "News approved and published"))
}

/// Reject a news item with a reason
#[utoipa::path(
    post,
    path = "/api/admin/news/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "News ID")
    ),
    request_body = RejectDto,
    responses(
        (status = 200, description = "News rejected (or already rejected)", body = ApiResponse<NewsDetailResponseDto>),
        (status = 400, description = "Rejection reason is required"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "News not found"),
        (status = 409, description = "News was already published")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reject_news(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<RejectDto>,
) -> Result<Json<ApiResponse<NewsDetailResponseDto>>> {
    let news = service.news().reject(id, admin.id, reason(&dto)?).await?;
    Ok(reviewed(news.into(), "News rejected"))
}

// =============================================================================
// PLUMBERS
// =============================================================================

/// List plumber registrations awaiting review, newest first
#[utoipa::path(
    get,
    path = "/api/admin/plumbers/pending",
    responses(
        (status = 200, description = "Pending plumber registrations", body = ApiResponse<Vec<PlumberRegistrationDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_pending_plumbers(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<Vec<PlumberRegistrationDto>>>> {
    let items = service.plumbers().list_pending().await?;
    Ok(listed(items.into_iter().map(Into::into).collect()))
}

/// Approve a plumber registration, listing the plumber in the directory
#[utoipa::path(
    post,
    path = "/api/admin/plumbers/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Plumber ID")
    ),
    responses(
        (status = 200, description = "Plumber approved (or already approved)", body = ApiResponse<PlumberRegistrationDto>),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Plumber not found"),
        (status = 409, description = "Registration was already rejected")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn approve_plumber(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PlumberRegistrationDto>>> {
    let plumber = service.plumbers().approve(id, admin.id).await?;
    Ok(reviewed(plumber.into(), "Plumber approved"))
}

/// Reject a plumber registration with a reason
#[utoipa::path(
    post,
    path = "/api/admin/plumbers/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Plumber ID")
    ),
    request_body = RejectDto,
    responses(
        (status = 200, description = "Registration rejected (or already rejected)", body = ApiResponse<PlumberRegistrationDto>),
        (status = 400, description = "Rejection reason is required"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Plumber not found"),
        (status = 409, description = "Registration was already approved")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reject_plumber(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<RejectDto>,
) -> Result<Json<ApiResponse<PlumberRegistrationDto>>> {
    let plumber = service
        .plumbers()
        .reject(id, admin.id, reason(&dto)?)
        .await?;
    Ok(reviewed(plumber.into(), "Plumber registration rejected"))
}
