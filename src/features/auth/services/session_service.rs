use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool};
use std::time::Duration;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, UserRole};
use crate::features::auth::services::TokenService;

/// A freshly opened session and its bearer token
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SessionUserRow {
    user_id: Uuid,
    session_id: Uuid,
    email: String,
    display_name: String,
    role: UserRole,
}

/// Server-side sessions backing the bearer tokens
pub struct SessionService {
    pool: PgPool,
    tokens: TokenService,
    ttl: Duration,
}

impl SessionService {
    pub fn new(pool: PgPool, tokens: TokenService, ttl: Duration) -> Self {
        Self { pool, tokens, ttl }
    }

    /// Open a session for the user and sign its token.
    /// Takes an executor so sign-up can open the session inside its transaction.
    pub async fn open<'e, E>(&self, executor: E, user_id: Uuid) -> Result<IssuedSession>
    where
        E: PgExecutor<'e>,
    {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AppError::Internal(format!("Invalid session TTL: {}", e)))?;
        let expires_at = Utc::now() + ttl;

        let session_id: Uuid = sqlx::query_scalar(
            "INSERT INTO sessions (user_id, expires_at) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            tracing::error!("Failed to open session: {:?}", e);
            AppError::Database(e)
        })?;

        let token = self.tokens.issue(user_id, session_id, expires_at)?;

        tracing::debug!("Opened session {} for user {}", session_id, user_id);

        Ok(IssuedSession { token, expires_at })
    }

    /// Resolve a bearer token to the current user.
    /// The user row is re-read so role changes and deactivation apply immediately.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.tokens.verify(token)?;

        let row = sqlx::query_as::<_, SessionUserRow>(
            r#"
            SELECT u.id AS user_id, s.id AS session_id, u.email, u.display_name, u.role
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
              AND s.user_id = $2
              AND s.revoked_at IS NULL
              AND s.expires_at > NOW()
              AND u.is_active
            "#,
        )
        .bind(claims.sid)
        .bind(claims.sub)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve session: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::Auth("Session expired or revoked".to_string()))?;

        Ok(AuthenticatedUser {
            id: row.user_id,
            session_id: row.session_id,
            email: row.email,
            display_name: row.display_name,
            role: row.role,
        })
    }

    pub async fn revoke(&self, session_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to revoke session {}: {:?}", session_id, e);
                AppError::Database(e)
            })?;

        tracing::info!("Revoked session {}", session_id);
        Ok(())
    }

    /// Revoke every open session of a user (after a password reset)
    pub async fn revoke_all<'e, E>(&self, executor: E, user_id: Uuid) -> Result<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(executor)
        .await
        .map_err(|e| {
            tracing::error!("Failed to revoke sessions of user {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected())
    }
}
