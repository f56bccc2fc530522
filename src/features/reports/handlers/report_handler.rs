use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    ReportDetailResponseDto, ReportResponseDto, SubmitReportFormDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};
use crate::shared::uploads::SubmissionForm;

/// Submit a water problem report
///
/// Accepts multipart/form-data with the report fields and up to 5 `images`.
/// The report starts pending and becomes public once an admin approves it.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "reports",
    request_body(
        content = SubmitReportFormDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Report submitted for review", body = ApiResponse<ReportDetailResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 502, description = "Image storage unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn submit_report(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ReportDetailResponseDto>>)> {
    let mut form = SubmissionForm::read(multipart, "images").await?;
    let data = service.parse_submission(&user, &mut form)?;

    let report = service.submit(data, form.images).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted and awaiting review".to_string()),
            None,
        )),
    ))
}

/// List approved reports (public)
#[utoipa::path(
    get,
    path = "/api/reports/approved",
    tag = "reports",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Approved reports, newest first", body = ApiResponse<Vec<ReportResponseDto>>)
    )
)]
pub async fn list_approved_reports(
    State(service): State<Arc<ReportService>>,
    Query(page): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = service.list_approved(&page).await?;
    let data = reports.into_iter().map(ReportResponseDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(data),
        None,
        Some(Meta { total }),
    )))
}

/// List the caller's own reports in any review state
#[utoipa::path(
    get,
    path = "/api/reports/mine",
    tag = "reports",
    responses(
        (status = 200, description = "Own reports", body = ApiResponse<Vec<ReportDetailResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_my_reports(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportDetailResponseDto>>>> {
    let reports = service.list_by_reporter(user.id).await?;
    let total = reports.len() as i64;
    let data = reports
        .into_iter()
        .map(ReportDetailResponseDto::from)
        .collect();

    Ok(Json(ApiResponse::success(
        Some(data),
        None,
        Some(Meta { total }),
    )))
}

/// Get a report by ID
///
/// Approved reports are visible to any signed-in user; pending and rejected
/// ones only to their reporter and admins. Contact details are only
/// included for the reporter and admins.
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    tag = "reports",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Report not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let report = service.get_visible(id, &user).await?;
    let include_contact = user.can_view_owned_by(report.reporter_id);

    Ok(Json(ApiResponse::success(
        Some(ReportDetailResponseDto::from_report(report, include_contact)),
        None,
        None,
    )))
}
