use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, PasswordResetConfirmDto,
    PasswordResetRequestDto, RegisterPlumberRequestDto, RegisterRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(auth_response), None, None)),
    ))
}

/// Register a plumber
///
/// Creates the account and a plumber registration that stays out of the
/// public directory until an admin approves it.
#[utoipa::path(
    post,
    path = "/api/auth/register/plumber",
    request_body = RegisterPlumberRequestDto,
    responses(
        (status = 201, description = "Plumber registered, awaiting review", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register_plumber(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterPlumberRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.register_plumber(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(auth_response),
            Some("Registration submitted and awaiting review".to_string()),
            None,
        )),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account deactivated")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(auth_response), None, None)))
}

/// Logout, revoking the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<()>>> {
    service.logout(&user).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Logged out".to_string()),
        None,
    )))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<AuthUserDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<AuthUserDto>>> {
    let user_data = service.me(&user).await?;
    Ok(Json(ApiResponse::success(Some(user_data), None, None)))
}

/// Request a password reset link
///
/// Always answers 202 whether or not the email is registered.
#[utoipa::path(
    post,
    path = "/api/auth/password-reset",
    request_body = PasswordResetRequestDto,
    responses(
        (status = 202, description = "Reset link issued if the account exists"),
        (status = 400, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn request_password_reset(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<PasswordResetRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.request_password_reset(dto).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::success(
            None,
            Some("If the email is registered, a reset link has been sent".to_string()),
            None,
        )),
    ))
}

/// Set a new password with a reset token
#[utoipa::path(
    post,
    path = "/api/auth/password-reset/confirm",
    request_body = PasswordResetConfirmDto,
    responses(
        (status = 200, description = "Password changed, all sessions revoked"),
        (status = 400, description = "Invalid or expired token")
    ),
    tag = "auth"
)]
pub async fn confirm_password_reset(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<PasswordResetConfirmDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.confirm_password_reset(dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Password has been reset, please sign in again".to_string()),
        None,
    )))
}
