use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Create admin routes (all require admin access), nested under `/api/admin`
pub fn routes(admin_service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/reports/pending", get(handlers::list_pending_reports))
        .route("/reports/{id}/approve", post(handlers::approve_report))
        .route("/reports/{id}/reject", post(handlers::reject_report))
        .route("/news/pending", get(handlers::list_pending_news))
        .route("/news/{id}/approve", post(handlers::approve_news))
        .route("/news/{id}/reject", post(handlers::reject_news))
        .route("/plumbers/pending", get(handlers::list_pending_plumbers))
        .route("/plumbers/{id}/approve", post(handlers::approve_plumber))
        .route("/plumbers/{id}/reject", post(handlers::reject_plumber))
        .with_state(admin_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{with_admin_auth, with_plumber_auth, with_user_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    fn admin_router() -> Router {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        Router::new().nest("/api/admin", routes(Arc::new(AdminService::new(pool))))
    }

    #[tokio::test]
    async fn test_anonymous_caller_is_unauthorized() {
        let server = TestServer::new(admin_router()).unwrap();

        let response = server.get("/api/admin/dashboard").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_regular_user_is_forbidden() {
        let server = TestServer::new(with_user_auth(admin_router())).unwrap();

        let response = server.get("/api/admin/reports/pending").await;
        response.assert_status(StatusCode::FORBIDDEN);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Admin access required");
    }

    #[tokio::test]
    async fn test_plumber_cannot_approve() {
        let server = TestServer::new(with_plumber_auth(admin_router())).unwrap();

        let response = server
            .post(&format!("/api/admin/plumbers/{}/approve", Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let server = TestServer::new(with_admin_auth(admin_router())).unwrap();

        let response = server
            .post(&format!("/api/admin/news/{}/reject", Uuid::new_v4()))
            .json(&json!({ "reason": "   " }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reject_with_malformed_body() {
        let server = TestServer::new(with_admin_auth(admin_router())).unwrap();

        let response = server
            .post(&format!("/api/admin/reports/{}/reject", Uuid::new_v4()))
            .json(&json!({ "why": "duplicate" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
