use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::guards::RequireNonPlumber;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::news::dtos::{
    NewsDetailResponseDto, NewsFilterQuery, NewsResponseDto, SubmitNewsFormDto,
};
use crate::features::news::services::NewsService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};
use crate::shared::uploads::SubmissionForm;

/// Publish a news item
///
/// Accepts multipart/form-data with the news fields and up to 5 `images`.
/// The item is published once an admin approves it. Plumber accounts
/// cannot publish news.
#[utoipa::path(
    post,
    path = "/api/news",
    tag = "news",
    request_body(
        content = SubmitNewsFormDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "News submitted for review", body = ApiResponse<NewsDetailResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Plumber accounts cannot publish news"),
        (status = 502, description = "Image storage unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn submit_news(
    RequireNonPlumber(user): RequireNonPlumber,
    State(service): State<Arc<NewsService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<NewsDetailResponseDto>>)> {
    let mut form = SubmissionForm::read(multipart, "images").await?;
    let data = NewsService::parse_submission(&user, &mut form)?;

    let news = service.submit(data, form.images).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(news.into()),
            Some("News submitted and awaiting review".to_string()),
            None,
        )),
    ))
}

/// List published news (public)
#[utoipa::path(
    get,
    path = "/api/news",
    tag = "news",
    params(PaginationQuery, NewsFilterQuery),
    responses(
        (status = 200, description = "Published news, newest first", body = ApiResponse<Vec<NewsResponseDto>>)
    )
)]
pub async fn list_published_news(
    State(service): State<Arc<NewsService>>,
    Query(page): Query<PaginationQuery>,
    Query(filter): Query<NewsFilterQuery>,
) -> Result<Json<ApiResponse<Vec<NewsResponseDto>>>> {
    let (items, total) = service.list_published(filter.category, &page).await?;
    let data = items.into_iter().map(NewsResponseDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(data),
        None,
        Some(Meta { total }),
    )))
}

/// List the caller's own news in any review state
#[utoipa::path(
    get,
    path = "/api/news/mine",
    tag = "news",
    responses(
        (status = 200, description = "Own news", body = ApiResponse<Vec<NewsDetailResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_my_news(
    user: AuthenticatedUser,
    State(service): State<Arc<NewsService>>,
) -> Result<Json<ApiResponse<Vec<NewsDetailResponseDto>>>> {
    let items = service.list_by_author(user.id).await?;
    let total = items.len() as i64;
    let data = items.into_iter().map(NewsDetailResponseDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(data),
        None,
        Some(Meta { total }),
    )))
}

/// Get a news item by ID
///
/// Published news is public. Unpublished items are only visible to their
/// author and admins.
#[utoipa::path(
    get,
    path = "/api/news/{id}",
    tag = "news",
    params(
        ("id" = Uuid, Path, description = "News ID")
    ),
    responses(
        (status = 200, description = "News found", body = ApiResponse<NewsDetailResponseDto>),
        (status = 404, description = "News not found")
    )
)]
pub async fn get_news(
    user: Option<AuthenticatedUser>,
    State(service): State<Arc<NewsService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NewsDetailResponseDto>>> {
    let news = service.get_visible(id, user.as_ref()).await?;

    Ok(Json(ApiResponse::success(Some(news.into()), None, None)))
}
