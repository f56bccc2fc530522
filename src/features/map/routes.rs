use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::map::handlers;
use crate::features::map::services::MapService;

/// Create routes for the public map feed
pub fn routes(service: Arc<MapService>) -> Router {
    Router::new()
        .route("/api/map/config", get(handlers::get_map_config))
        .route("/api/map/markers", get(handlers::list_markers))
        .route("/api/map/validate-point", post(handlers::validate_point))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::test_map_config;
    use crate::features::reports::ReportService;
    use crate::modules::storage::test_client;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server() -> TestServer {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let reports = Arc::new(ReportService::new(
            pool,
            Arc::new(test_client()),
            test_map_config(),
        ));
        TestServer::new(routes(Arc::new(MapService::new(test_map_config(), reports)))).unwrap()
    }

    #[tokio::test]
    async fn test_config_is_served() {
        let response = server().get("/api/map/config").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["center"]["zoom"], 13);
        assert_eq!(body["data"]["bounds"]["south_west"]["lat"], 30.92);
        assert_eq!(body["data"]["legend"][3]["priority"], "urgent");
    }

    #[tokio::test]
    async fn test_validate_point() {
        let server = server();

        server
            .post("/api/map/validate-point")
            .json(&json!({ "lat": 30.97, "lng": 31.17 }))
            .await
            .assert_status_ok();

        server
            .post("/api/map/validate-point")
            .json(&json!({ "lat": 30.0444, "lng": 31.2357 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
