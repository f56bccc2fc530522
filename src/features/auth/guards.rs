//! Role-based authorization guards.
//!
//! These guards read the authenticated user placed in the request extensions
//! by the access gate and verify the role required by the handler.
//!
//! Roles:
//! - admin: moderates reports, news and plumber registrations
//! - plumber: listed in the directory once approved, cannot publish news
//! - user: submits reports and news

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn current_user(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for admin-only handlers.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(admin): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

/// Guard for handlers plumber accounts may not use (news publishing).
pub struct RequireNonPlumber(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireNonPlumber
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if user.is_plumber() {
            return Err(AppError::Forbidden(
                "Plumber accounts cannot publish news".to_string(),
            ));
        }

        Ok(RequireNonPlumber(user.clone()))
    }
}
