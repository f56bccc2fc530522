use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::moderation::submission::finish_submission;
use crate::features::moderation::{Moderated, ModerationRepository};
use crate::features::news::models::{parse_tags, CreateNews, News, NewsCategory};
use crate::modules::storage::MinIOClient;
use crate::shared::constants::{MAX_SHORT_TEXT_LENGTH, NEWS_FOLDER};
use crate::shared::types::PaginationQuery;
use crate::shared::uploads::{validate_images, ImageUpload, SubmissionForm};
use crate::shared::validation::{optional_text, required_text, required_text_max};

const PUBLISHED_FILTER: &str = "t.is_published AND t.status = 'approved' AND t.is_approved";

/// Service for community news
pub struct NewsService {
    pool: PgPool,
    storage: Arc<MinIOClient>,
    records: ModerationRepository<News>,
}

impl NewsService {
    pub fn new(pool: PgPool, storage: Arc<MinIOClient>) -> Self {
        Self {
            records: ModerationRepository::new(pool.clone()),
            pool,
            storage,
        }
    }

    /// Turn a multipart submission into validated news data
    pub fn parse_submission(
        author: &AuthenticatedUser,
        form: &mut SubmissionForm,
    ) -> Result<CreateNews> {
        let title = required_text_max("title", form.take("title"), MAX_SHORT_TEXT_LENGTH)?;
        let content = required_text("content", form.take("content"))?;

        let category = match optional_text(form.take("category")) {
            Some(raw) => raw.parse::<NewsCategory>().map_err(AppError::Validation)?,
            None => NewsCategory::default(),
        };

        let tags = form
            .take("tags")
            .map(|raw| parse_tags(&raw))
            .unwrap_or_default();

        validate_images(&form.images)?;

        Ok(CreateNews {
            title,
            content,
            category,
            tags,
            author_id: author.id,
            author_name: author.display_name.clone(),
        })
    }

    /// Store a new pending news item with its images as one unit
    pub async fn submit(&self, data: CreateNews, images: Vec<ImageUpload>) -> Result<News> {
        validate_images(&images)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin news transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO news (
                title, content, category, tags, author_id, author_name,
                status, is_approved, is_published
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', FALSE, FALSE)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(&data.content)
        .bind(data.category)
        .bind(&data.tags)
        .bind(data.author_id)
        .bind(&data.author_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create news item: {:?}", e);
            AppError::Database(e)
        })?;

        let image_count = images.len();
        finish_submission(tx, &self.storage, News::TABLE, NEWS_FOLDER, id, images).await?;

        tracing::info!(
            "Created news item {} with {} image(s) by user {}",
            id,
            image_count,
            data.author_id
        );

        self.records
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("news item {} not found", id)))
    }

    /// Published news, most recently published first
    pub async fn list_published(
        &self,
        category: Option<NewsCategory>,
        page: &PaginationQuery,
    ) -> Result<(Vec<News>, i64)> {
        let sql = format!(
            "{} WHERE {} AND ($1::news_category IS NULL OR t.category = $1) \
             ORDER BY t.published_at DESC NULLS LAST, t.created_at DESC LIMIT $2 OFFSET $3",
            News::SELECT,
            PUBLISHED_FILTER
        );

        let items = sqlx::query_as::<_, News>(&sql)
            .bind(category)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list published news: {:?}", e);
                AppError::Database(e)
            })?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM news t WHERE {} AND ($1::news_category IS NULL OR t.category = $1)",
            PUBLISHED_FILTER
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(category)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count published news: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    /// News written by one user in any state, newest first
    pub async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<News>> {
        let sql = format!(
            "{} WHERE t.author_id = $1 ORDER BY t.created_at DESC",
            News::SELECT
        );

        sqlx::query_as::<_, News>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list news of user {}: {:?}", author_id, e);
                AppError::Database(e)
            })
    }

    /// A news item visible to the viewer: published items to anyone,
    /// others only to their author and admins
    pub async fn get_visible(&self, id: Uuid, viewer: Option<&AuthenticatedUser>) -> Result<News> {
        self.records
            .find(id)
            .await?
            .filter(|n| {
                n.is_published || viewer.is_some_and(|v| v.can_view_owned_by(n.author_id))
            })
            .ok_or_else(|| AppError::NotFound(format!("News item {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::UserRole;
    use crate::shared::uploads::fake_image;

    fn author() -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            email: "writer@example.com".to_string(),
            display_name: "سارة".to_string(),
            role: UserRole::User,
        }
    }

    #[test]
    fn test_parse_submission_defaults() {
        let mut form = SubmissionForm::with_fields(
            &[("title", " انقطاع المياه "), ("content", "غدا من 8 إلى 12"), ("tags", "مياه, ,صيانة")],
            vec![fake_image("a.png", 10)],
        );

        let data = NewsService::parse_submission(&author(), &mut form).unwrap();

        assert_eq!(data.title, "انقطاع المياه");
        assert_eq!(data.category, NewsCategory::General);
        assert_eq!(data.tags, vec!["مياه".to_string(), "صيانة".to_string()]);
        assert_eq!(data.author_name, "سارة");
    }

    #[test]
    fn test_parse_submission_rejects_unknown_category() {
        let mut form = SubmissionForm::with_fields(
            &[("title", "t"), ("content", "c"), ("category", "sports")],
            vec![],
        );
        assert!(matches!(
            NewsService::parse_submission(&author(), &mut form),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_submission_rejects_blank_content() {
        let mut form = SubmissionForm::with_fields(&[("title", "t"), ("content", " ")], vec![]);
        assert!(NewsService::parse_submission(&author(), &mut form).is_err());
    }

    #[test]
    fn test_parse_submission_rejects_overlong_title() {
        let title = "ن".repeat(MAX_SHORT_TEXT_LENGTH + 1);
        let mut form =
            SubmissionForm::with_fields(&[("title", title.as_str()), ("content", "c")], vec![]);
        assert!(matches!(
            NewsService::parse_submission(&author(), &mut form),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_submission_rejects_six_images() {
        let images = (0..6).map(|i| fake_image(&format!("{}.png", i), 1)).collect();
        let mut form = SubmissionForm::with_fields(&[("title", "t"), ("content", "c")], images);
        assert!(NewsService::parse_submission(&author(), &mut form).is_err());
    }
}
