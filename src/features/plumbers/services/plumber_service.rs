use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::moderation::{Moderated, ModerationRepository};
use crate::features::plumbers::models::{CreatePlumber, Plumber};
use crate::shared::types::PaginationQuery;

const APPROVED_FILTER: &str = "t.status = 'approved' AND t.is_approved AND u.is_active";

/// Service for the plumber directory
pub struct PlumberService {
    pool: PgPool,
    records: ModerationRepository<Plumber>,
}

impl PlumberService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            records: ModerationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Store a pending registration for a freshly created plumber account.
    /// Runs on the caller's connection so it shares the sign-up transaction.
    pub async fn create_registration(
        conn: &mut PgConnection,
        user_id: Uuid,
        data: &CreatePlumber,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO plumbers (
                id, experience, specialties, working_areas, certifications,
                license_number, description, hourly_rate, status, is_approved
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', FALSE)
            "#,
        )
        .bind(user_id)
        .bind(data.experience)
        .bind(&data.specialties)
        .bind(&data.working_areas)
        .bind(&data.certifications)
        .bind(&data.license_number)
        .bind(&data.description)
        .bind(data.hourly_rate)
        .execute(conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create plumber registration for {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        tracing::info!("Created pending plumber registration for user {}", user_id);
        Ok(())
    }

    /// Approved plumbers, best rated first
    pub async fn list_approved(&self, page: &PaginationQuery) -> Result<(Vec<Plumber>, i64)> {
        let sql = format!(
            "{} WHERE {} ORDER BY t.rating DESC, t.completed_jobs DESC, t.created_at ASC \
             LIMIT $1 OFFSET $2",
            Plumber::SELECT,
            APPROVED_FILTER
        );

        let plumbers = sqlx::query_as::<_, Plumber>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list plumbers: {:?}", e);
                AppError::Database(e)
            })?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM plumbers t JOIN users u ON u.id = t.id WHERE {}",
            APPROVED_FILTER
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count plumbers: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((plumbers, total))
    }

    /// An approved plumber; pending and rejected registrations are not found
    pub async fn get_approved(&self, id: Uuid) -> Result<Plumber> {
        self.records
            .find(id)
            .await?
            .filter(|p| p.is_approved)
            .ok_or_else(|| AppError::NotFound(format!("Plumber {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_joins_account_and_profile() {
        assert!(Plumber::SELECT.contains("JOIN users u ON u.id = t.id"));
        assert!(Plumber::SELECT.contains("LEFT JOIN user_profiles up ON up.id = t.id"));
        assert!(APPROVED_FILTER.contains("t.status = 'approved' AND t.is_approved"));
    }
}
