use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::plumbers::handlers;
use crate::features::plumbers::services::PlumberService;

/// Create routes for the public plumber directory
pub fn routes(service: Arc<PlumberService>) -> Router {
    Router::new()
        .route("/api/plumbers", get(handlers::list_plumbers))
        .route("/api/plumbers/options", get(handlers::get_plumber_options))
        .route("/api/plumbers/{id}", get(handlers::get_plumber))
        .with_state(service)
}
