use std::sync::Arc;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{
    UpdateBasicProfileDto, UpdateExtendedProfileDto, UserProfileResponseDto,
};
use crate::features::users::models::{
    CreateUser, User, UserProfile, PROFILE_COLUMNS, USER_COLUMNS,
};
use crate::modules::storage::MinIOClient;
use crate::shared::constants::AVATARS_FOLDER;
use crate::shared::uploads::{validate_image, ImageUpload};
use crate::shared::validation::{normalize_phone, optional_text};

/// Service for accounts and their extended profiles
pub struct UserService {
    pool: PgPool,
    storage: Arc<MinIOClient>,
}

impl UserService {
    pub fn new(pool: PgPool, storage: Arc<MinIOClient>) -> Self {
        Self { pool, storage }
    }

    /// Insert an account with an empty extended profile on the caller's
    /// connection. A taken email is a conflict.
    pub async fn create(conn: &mut PgConnection, data: &CreateUser) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, display_name, phone_number, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&data.email)
            .bind(&data.password_hash)
            .bind(&data.display_name)
            .bind(&data.phone_number)
            .bind(data.role)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                let error = AppError::from_unique_violation(e, "Email is already registered");
                if matches!(error, AppError::Database(_)) {
                    tracing::error!("Failed to create user: {:?}", error);
                }
                error
            })?;

        sqlx::query("INSERT INTO user_profiles (id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create profile for user {}: {:?}", user.id, e);
                AppError::Database(e)
            })?;

        tracing::info!("Created {} account {}", user.role, user.id);
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user by email: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let sql = format!("SELECT {} FROM user_profiles WHERE id = $1", PROFILE_COLUMNS);

        sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch profile of user {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    /// Account plus extended profile
    pub async fn get_me(&self, id: Uuid) -> Result<UserProfileResponseDto> {
        let user = self.get(id).await?;
        let profile = self.find_profile(id).await?;

        Ok(UserProfileResponseDto {
            user: user.into(),
            profile: profile.map(Into::into),
        })
    }

    /// Update name and phone; absent fields keep their value
    pub async fn update_basic(
        &self,
        id: Uuid,
        dto: UpdateBasicProfileDto,
    ) -> Result<UserProfileResponseDto> {
        let display_name = optional_text(dto.display_name);
        let phone_number = dto.phone_number.map(|p| normalize_phone(&p));

        let result = sqlx::query(
            r#"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                phone_number = COALESCE($3, phone_number),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(display_name)
        .bind(phone_number)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update user {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        self.get_me(id).await
    }

    /// Create or update the extended profile; absent fields keep their value
    pub async fn upsert_profile(
        &self,
        id: Uuid,
        dto: UpdateExtendedProfileDto,
    ) -> Result<UserProfileResponseDto> {
        let sql = format!(
            r#"
            INSERT INTO user_profiles (
                id, bio, location, website, social_links, preferences, notification_settings
            )
            VALUES (
                $1, $2, $3, $4,
                COALESCE($5, '{{}}'::jsonb), COALESCE($6, '{{}}'::jsonb), COALESCE($7, '{{}}'::jsonb)
            )
            ON CONFLICT (id) DO UPDATE SET
                bio = COALESCE(EXCLUDED.bio, user_profiles.bio),
                location = COALESCE(EXCLUDED.location, user_profiles.location),
                website = COALESCE(EXCLUDED.website, user_profiles.website),
                social_links = COALESCE($5, user_profiles.social_links),
                preferences = COALESCE($6, user_profiles.preferences),
                notification_settings = COALESCE($7, user_profiles.notification_settings),
                updated_at = NOW()
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .bind(dto.bio)
            .bind(dto.location)
            .bind(dto.website)
            .bind(dto.social_links)
            .bind(dto.preferences)
            .bind(dto.notification_settings)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save profile of user {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        tracing::info!("Updated extended profile of user {}", id);
        self.get_me(id).await
    }

    /// Store a new avatar and point the account at it. A previous avatar
    /// stored under a different key is removed afterwards.
    pub async fn upload_avatar(&self, id: Uuid, image: ImageUpload) -> Result<String> {
        validate_image(&image)?;

        let user = self.get(id).await?;
        let key = self.storage.public_key(&avatar_path(id, &image));

        self.storage
            .upload(&key, image.data, &image.content_type)
            .await?;
        let url = self.storage.get_file_url(&key);

        if let Err(e) = sqlx::query(
            "UPDATE users SET profile_image_url = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(&url)
        .execute(&self.pool)
        .await
        {
            tracing::error!("Failed to save avatar of user {}: {:?}", id, e);
            self.storage.delete_all(std::slice::from_ref(&key)).await;
            return Err(AppError::Database(e));
        }

        if let Some(old_key) = user
            .profile_image_url
            .as_deref()
            .and_then(|old| self.storage.extract_key_from_url(old))
            .filter(|old_key| *old_key != key)
        {
            self.storage.delete_all(&[old_key]).await;
        }

        tracing::info!("Updated avatar of user {}", id);
        Ok(url)
    }
}

/// `avatars/<user id>/avatar.<ext>`
fn avatar_path(id: Uuid, image: &ImageUpload) -> String {
    format!("{}/{}/avatar.{}", AVATARS_FOLDER, id, image.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::test_client;
    use crate::shared::uploads::fake_image;

    #[test]
    fn test_avatar_path() {
        let id = Uuid::new_v4();
        let image = fake_image("me.png", 10);
        assert_eq!(avatar_path(id, &image), format!("avatars/{}/avatar.png", id));
    }

    #[tokio::test]
    async fn test_non_image_avatar_rejected_before_storage() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let service = UserService::new(pool, Arc::new(test_client()));

        let mut file = fake_image("notes.txt", 10);
        file.content_type = "text/plain".to_string();

        let result = service.upload_avatar(Uuid::new_v4(), file).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
