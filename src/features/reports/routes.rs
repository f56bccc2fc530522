use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;
use crate::shared::constants::MAX_SUBMISSION_BODY_SIZE;

/// Create routes for the reports feature
///
/// `/api/reports/approved` is public, the rest need a session
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            post(handlers::submit_report).layer(DefaultBodyLimit::max(MAX_SUBMISSION_BODY_SIZE)),
        )
        .route("/api/reports/approved", get(handlers::list_approved_reports))
        .route("/api/reports/mine", get(handlers::list_my_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .with_state(service)
}
