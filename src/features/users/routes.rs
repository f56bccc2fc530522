use crate::features::users::handlers;
use crate::features::users::services::UserService;
use crate::shared::constants::MAX_IMAGE_SIZE;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/users/me",
            get(handlers::get_profile).patch(handlers::update_basic_profile),
        )
        .route(
            "/api/users/me/profile",
            put(handlers::update_extended_profile),
        )
        .route(
            "/api/users/me/avatar",
            post(handlers::upload_avatar).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 64 * 1024)),
        )
        .with_state(service)
}
