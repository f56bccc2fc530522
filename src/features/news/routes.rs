use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};

use crate::features::news::handlers;
use crate::features::news::services::NewsService;
use crate::shared::constants::MAX_SUBMISSION_BODY_SIZE;

/// Create routes for the news feature
///
/// Reading published news is public, publishing needs a session
pub fn routes(service: Arc<NewsService>) -> Router {
    Router::new()
        .route(
            "/api/news",
            get(handlers::list_published_news)
                .post(handlers::submit_news)
                .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BODY_SIZE)),
        )
        .route("/api/news/mine", get(handlers::list_my_news))
        .route("/api/news/{id}", get(handlers::get_news))
        .with_state(service)
}
