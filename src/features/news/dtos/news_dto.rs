use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::moderation::dtos::ModerationInfoDto;
use crate::features::news::models::{News, NewsCategory};

/// News submission form for OpenAPI documentation.
/// The handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitNewsFormDto {
    pub title: String,
    pub content: String,
    pub category: Option<NewsCategory>,
    /// Comma separated tags
    #[schema(example = "مياه, صيانة")]
    pub tags: Option<String>,
    /// Up to 5 images, 5MB each
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub images: Vec<String>,
}

/// Filter for the public news list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct NewsFilterQuery {
    /// Only news of this category
    pub category: Option<NewsCategory>,
}

/// Published news item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsResponseDto {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: NewsCategory,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub author_name: String,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&News> for NewsResponseDto {
    fn from(n: &News) -> Self {
        Self {
            id: n.id,
            title: n.title.clone(),
            content: n.content.clone(),
            category: n.category,
            tags: n.tags.clone(),
            images: n.images.clone(),
            author_name: n.author_name.clone(),
            is_published: n.is_published,
            published_at: n.published_at,
            created_at: n.created_at,
        }
    }
}

impl From<News> for NewsResponseDto {
    fn from(n: News) -> Self {
        Self::from(&n)
    }
}

/// News item with review state, shown to its author and to admins
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsDetailResponseDto {
    #[serde(flatten)]
    pub news: NewsResponseDto,
    pub author_id: Uuid,
    #[serde(flatten)]
    pub moderation: ModerationInfoDto,
    pub updated_at: DateTime<Utc>,
}

impl From<News> for NewsDetailResponseDto {
    fn from(n: News) -> Self {
        Self {
            news: NewsResponseDto::from(&n),
            author_id: n.author_id,
            moderation: ModerationInfoDto {
                status: n.status,
                is_approved: n.is_approved,
                approved_at: n.approved_at,
                approved_by: n.approved_by,
                rejected_at: n.rejected_at,
                rejected_by: n.rejected_by,
                rejection_reason: n.rejection_reason,
            },
            updated_at: n.updated_at,
        }
    }
}
