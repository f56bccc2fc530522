use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{
    AvatarResponseDto, UpdateBasicProfileDto, UpdateExtendedProfileDto, UserProfileResponseDto,
};
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;
use crate::shared::uploads::SubmissionForm;
use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<UserProfileResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<UserProfileResponseDto>>> {
    let profile = service.get_me(user.id).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateBasicProfileDto,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<UserProfileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_basic_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<UpdateBasicProfileDto>,
) -> Result<Json<ApiResponse<UserProfileResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let profile = service.update_basic(user.id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(profile),
        Some("Profile updated successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/users/me/profile",
    request_body = UpdateExtendedProfileDto,
    responses(
        (status = 200, description = "Extended profile saved successfully", body = ApiResponse<UserProfileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_extended_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<UpdateExtendedProfileDto>,
) -> Result<Json<ApiResponse<UserProfileResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let profile = service.upsert_profile(user.id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(profile),
        Some("Extended profile saved successfully".to_string()),
        None,
    )))
}

/// Upload a profile picture
///
/// Accepts multipart/form-data with a single image in the `file` field.
#[utoipa::path(
    post,
    path = "/api/users/me/avatar",
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 200, description = "Avatar updated", body = ApiResponse<AvatarResponseDto>),
        (status = 400, description = "Missing or invalid image"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Image storage unavailable")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_avatar(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<AvatarResponseDto>>> {
    let form = SubmissionForm::read(multipart, "file").await?;

    let mut images = form.images.into_iter();
    let image = match (images.next(), images.next()) {
        (Some(image), None) => image,
        (None, _) => return Err(AppError::BadRequest("No file provided".to_string())),
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "Only one avatar image may be uploaded".to_string(),
            ))
        }
    };

    let profile_image_url = service.upload_avatar(user.id, image).await?;
    Ok(Json(ApiResponse::success(
        Some(AvatarResponseDto { profile_image_url }),
        Some("Avatar updated successfully".to_string()),
        None,
    )))
}
