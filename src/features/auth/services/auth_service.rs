use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, PasswordResetConfirmDto,
    PasswordResetRequestDto, RegisterPlumberRequestDto, RegisterRequestDto,
};
use crate::features::auth::model::{AuthenticatedUser, UserRole};
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::auth::services::{
    generate_reset_token, hash_reset_token, IssuedSession, SessionService,
};
use crate::features::plumbers::models::CreatePlumber;
use crate::features::plumbers::PlumberService;
use crate::features::users::models::{CreateUser, User};
use crate::features::users::UserService;
use crate::shared::validation::{normalize_phone, optional_text};

/// Service for sign-up, sign-in and password recovery
pub struct AuthService {
    pool: PgPool,
    sessions: Arc<SessionService>,
    users: Arc<UserService>,
    config: AuthConfig,
    frontend_url: String,
}

impl AuthService {
    pub fn new(
        pool: PgPool,
        sessions: Arc<SessionService>,
        users: Arc<UserService>,
        config: AuthConfig,
        frontend_url: String,
    ) -> Self {
        Self {
            pool,
            sessions,
            users,
            config,
            frontend_url,
        }
    }

    async fn new_account(&self, dto: &RegisterRequestDto, role: UserRole) -> Result<CreateUser> {
        Ok(CreateUser {
            email: dto.email.trim().to_lowercase(),
            password_hash: hash_password(&dto.password).await?,
            display_name: dto.display_name.trim().to_string(),
            phone_number: Some(normalize_phone(&dto.phone_number)),
            role,
        })
    }

    /// Register a citizen account. Emails on the admin list get the admin role.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let role = if self.config.is_admin_email(&dto.email) {
            UserRole::Admin
        } else {
            UserRole::User
        };
        let data = self.new_account(&dto, role).await?;

        let mut tx = self.begin().await?;
        let user = UserService::create(&mut *tx, &data).await?;
        let session = self.sessions.open(&mut *tx, user.id).await?;
        self.commit(tx).await?;

        Ok(auth_response(session, user))
    }

    /// Register a plumber account together with its pending directory entry
    pub async fn register_plumber(&self, dto: RegisterPlumberRequestDto) -> Result<AuthResponseDto> {
        let data = self.new_account(&dto.account, UserRole::Plumber).await?;
        let registration = CreatePlumber {
            experience: dto.experience,
            specialties: dto.specialties,
            working_areas: dto.working_areas,
            certifications: dto
                .certifications
                .into_iter()
                .filter_map(|c| optional_text(Some(c)))
                .collect(),
            license_number: optional_text(dto.license_number),
            description: optional_text(dto.description),
            hourly_rate: dto.hourly_rate,
        };

        let mut tx = self.begin().await?;
        let user = UserService::create(&mut *tx, &data).await?;
        PlumberService::create_registration(&mut *tx, user.id, &registration).await?;
        let session = self.sessions.open(&mut *tx, user.id).await?;
        self.commit(tx).await?;

        Ok(auth_response(session, user))
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .users
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

        if !verify_password(&dto.password, &user.password_hash).await? {
            return Err(AppError::Auth("Invalid email or password".to_string()));
        }

        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        let session = self.sessions.open(&self.pool, user.id).await?;
        tracing::info!("User {} signed in", user.id);

        Ok(auth_response(session, user))
    }

    /// End the caller's current session
    pub async fn logout(&self, user: &AuthenticatedUser) -> Result<()> {
        self.sessions.revoke(user.session_id).await
    }

    /// Current account as stored, not as cached in the token
    pub async fn me(&self, user: &AuthenticatedUser) -> Result<AuthUserDto> {
        Ok(self.users.get(user.id).await?.into())
    }

    /// Issue a reset token for an active account. Unknown emails are ignored
    /// so the response does not reveal which emails are registered.
    pub async fn request_password_reset(&self, dto: PasswordResetRequestDto) -> Result<()> {
        let user = match self.users.find_by_email(&dto.email).await? {
            Some(user) if user.is_active => user,
            _ => {
                tracing::debug!("Password reset requested for an unknown or inactive email");
                return Ok(());
            }
        };

        let ttl = chrono::Duration::from_std(self.config.password_reset_ttl)
            .map_err(|e| AppError::Internal(format!("Invalid password reset TTL: {}", e)))?;
        let (token, token_hash) = generate_reset_token();

        sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(user.id)
        .bind(&token_hash)
        .bind(Utc::now() + ttl)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store password reset token: {:?}", e);
            AppError::Database(e)
        })?;

        // Mail delivery is handled outside this service; the link goes to the log
        tracing::info!(
            user_id = %user.id,
            "Password reset link: {}",
            reset_link(&self.frontend_url, &token)
        );

        Ok(())
    }

    /// Set a new password with a valid reset token and sign the user out everywhere
    pub async fn confirm_password_reset(&self, dto: PasswordResetConfirmDto) -> Result<()> {
        let token_hash = hash_reset_token(dto.token.trim());
        let password_hash = hash_password(&dto.new_password).await?;

        let mut tx = self.begin().await?;

        let reset: Option<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            SELECT id, user_id FROM password_reset_tokens
            WHERE token_hash = $1 AND used_at IS NULL AND expires_at > NOW()
            FOR UPDATE
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up password reset token: {:?}", e);
            AppError::Database(e)
        })?;

        let (reset_id, user_id) = reset.ok_or_else(|| {
            AppError::BadRequest("Reset token is invalid or has expired".to_string())
        })?;

        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(&password_hash)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update password of user {}: {:?}", user_id, e);
                AppError::Database(e)
            })?;

        sqlx::query("UPDATE password_reset_tokens SET used_at = NOW() WHERE id = $1")
            .bind(reset_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to mark reset token {} used: {:?}", reset_id, e);
                AppError::Database(e)
            })?;

        let revoked = self.sessions.revoke_all(&mut *tx, user_id).await?;
        self.commit(tx).await?;

        tracing::info!(
            "Password reset for user {}, {} session(s) revoked",
            user_id,
            revoked
        );
        Ok(())
    }

    async fn begin(&self) -> Result<sqlx::Transaction<'static, sqlx::Postgres>> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn commit(&self, tx: sqlx::Transaction<'static, sqlx::Postgres>) -> Result<()> {
        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })
    }
}

fn auth_response(session: IssuedSession, user: User) -> AuthResponseDto {
    AuthResponseDto {
        access_token: session.token,
        token_type: "Bearer".to_string(),
        expires_at: session.expires_at,
        user: user.into(),
    }
}

fn reset_link(frontend_url: &str, token: &str) -> String {
    format!(
        "{}/reset-password?token={}",
        frontend_url.trim_end_matches('/'),
        token
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_link() {
        assert_eq!(
            reset_link("https://water.example.com/", "abc"),
            "https://water.example.com/reset-password?token=abc"
        );
        assert_eq!(
            reset_link("http://localhost:3000", "abc"),
            "http://localhost:3000/reset-password?token=abc"
        );
    }
}
