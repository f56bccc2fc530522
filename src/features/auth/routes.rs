use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Auth routes. Sign-up, login and password reset are on the public
/// allow-list; logout and `me` need a session.
pub fn routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/register/plumber", post(handlers::register_plumber))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/me", get(handlers::get_me))
        .route("/api/auth/password-reset", post(handlers::request_password_reset))
        .route(
            "/api/auth/password-reset/confirm",
            post(handlers::confirm_password_reset),
        )
        .with_state(service)
}
