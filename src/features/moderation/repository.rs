use std::marker::PhantomData;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::moderation::state::{ModerationAction, ModerationStatus, Transition};

/// A record kind that goes through admin review.
///
/// `SELECT` must read from the kind's table aliased as `t`; it may join
/// other tables for display columns.
pub trait Moderated: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    /// Human readable kind used in messages and logs
    const KIND: &'static str;
    const TABLE: &'static str;
    const SELECT: &'static str;
    /// Extra `SET` assignments written together with an approval, starting with a comma
    const ON_APPROVE: &'static str = "";

    fn status(&self) -> ModerationStatus;
}

pub fn find_sql<E: Moderated>() -> String {
    format!("{} WHERE t.id = $1", E::SELECT)
}

pub fn pending_sql<E: Moderated>() -> String {
    format!(
        "{} WHERE t.status = 'pending' ORDER BY t.created_at DESC",
        E::SELECT
    )
}

pub fn count_pending_sql<E: Moderated>() -> String {
    format!("SELECT COUNT(*) FROM {} WHERE status = 'pending'", E::TABLE)
}

/// Approval only applies to pending rows, so concurrent approvals have a single winner
pub fn approve_sql<E: Moderated>() -> String {
    format!(
        "UPDATE {} SET status = 'approved', is_approved = TRUE, approved_by = $2, \
         approved_at = NOW(), updated_at = NOW(){} \
         WHERE id = $1 AND status = 'pending' RETURNING id",
        E::TABLE,
        E::ON_APPROVE
    )
}

pub fn reject_sql<E: Moderated>() -> String {
    format!(
        "UPDATE {} SET status = 'rejected', is_approved = FALSE, rejected_by = $2, \
         rejected_at = NOW(), rejection_reason = $3, updated_at = NOW() \
         WHERE id = $1 AND status = 'pending' RETURNING id",
        E::TABLE
    )
}

/// Review operations shared by reports, news and plumber registrations
pub struct ModerationRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Moderated> ModerationRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<E>> {
        sqlx::query_as::<_, E>(&find_sql::<E>())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch {} {}: {:?}", E::KIND, id, e);
                AppError::Database(e)
            })
    }

    /// Every pending record, newest first
    pub async fn list_pending(&self) -> Result<Vec<E>> {
        sqlx::query_as::<_, E>(&pending_sql::<E>())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list pending {}s: {:?}", E::KIND, e);
                AppError::Database(e)
            })
    }

    pub async fn count_pending(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(&count_pending_sql::<E>())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count pending {}s: {:?}", E::KIND, e);
                AppError::Database(e)
            })
    }

    /// Approve a pending record. Approving an approved record returns it
    /// unchanged; approving a rejected one is a conflict.
    pub async fn approve(&self, id: Uuid, admin_id: Uuid) -> Result<E> {
        let updated: Option<Uuid> = sqlx::query_scalar(&approve_sql::<E>())
            .bind(id)
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to approve {} {}: {:?}", E::KIND, id, e);
                AppError::Database(e)
            })?;

        let record = self.resolve(id, updated, ModerationAction::Approve).await?;

        if updated.is_some() {
            tracing::info!("Approved {} {} by admin {}", E::KIND, id, admin_id);
        }
        Ok(record)
    }

    /// Reject a pending record with a reason. Rejecting a rejected record
    /// returns it unchanged; rejecting an approved one is a conflict.
    pub async fn reject(&self, id: Uuid, admin_id: Uuid, reason: &str) -> Result<E> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(
                "Rejection reason is required".to_string(),
            ));
        }

        let updated: Option<Uuid> = sqlx::query_scalar(&reject_sql::<E>())
            .bind(id)
            .bind(admin_id)
            .bind(reason)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to reject {} {}: {:?}", E::KIND, id, e);
                AppError::Database(e)
            })?;

        let record = self.resolve(id, updated, ModerationAction::Reject).await?;

        if updated.is_some() {
            tracing::info!(
                "Rejected {} {} by admin {}: {}",
                E::KIND,
                id,
                admin_id,
                reason
            );
        }
        Ok(record)
    }

    /// Load the record after a guarded update and decide the outcome when
    /// the update matched no pending row
    async fn resolve(&self, id: Uuid, updated: Option<Uuid>, action: ModerationAction) -> Result<E> {
        let record = self
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", E::KIND, id)))?;

        if updated.is_some() {
            return Ok(record);
        }

        match record.status().apply(action)? {
            Transition::Unchanged => {
                tracing::debug!(
                    "{} {} already {}, nothing to do",
                    E::KIND,
                    id,
                    record.status()
                );
                Ok(record)
            }
            // Still pending although the guarded update missed it
            Transition::Applied(_) => Err(AppError::Conflict(format!(
                "{} {} was modified concurrently, retry the request",
                E::KIND,
                id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(FromRow)]
    struct Widget {
        status: ModerationStatus,
    }

    impl Moderated for Widget {
        const KIND: &'static str = "widget";
        const TABLE: &'static str = "widgets";
        const SELECT: &'static str = "SELECT t.status FROM widgets t";
        const ON_APPROVE: &'static str = ", is_published = TRUE";

        fn status(&self) -> ModerationStatus {
            self.status
        }
    }

    #[test]
    fn test_approve_is_guarded_on_pending() {
        let sql = approve_sql::<Widget>();
        assert!(sql.starts_with("UPDATE widgets SET status = 'approved', is_approved = TRUE"));
        assert!(sql.contains("WHERE id = $1 AND status = 'pending'"));
        assert!(sql.contains("approved_by = $2"));
        assert!(sql.contains(", is_published = TRUE WHERE"));
    }

    #[test]
    fn test_reject_sets_flag_and_reason() {
        let sql = reject_sql::<Widget>();
        assert!(sql.contains("status = 'rejected', is_approved = FALSE"));
        assert!(sql.contains("rejection_reason = $3"));
        assert!(sql.contains("WHERE id = $1 AND status = 'pending'"));
        assert!(!sql.contains("is_published"));
    }

    #[test]
    fn test_pending_listing_is_newest_first() {
        assert_eq!(
            pending_sql::<Widget>(),
            "SELECT t.status FROM widgets t WHERE t.status = 'pending' ORDER BY t.created_at DESC"
        );
        assert_eq!(find_sql::<Widget>(), "SELECT t.status FROM widgets t WHERE t.id = $1");
        assert_eq!(
            count_pending_sql::<Widget>(),
            "SELECT COUNT(*) FROM widgets WHERE status = 'pending'"
        );
    }

    #[tokio::test]
    async fn test_blank_reason_rejected_before_database() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let repo = ModerationRepository::<Widget>::new(pool);

        let result = repo.reject(Uuid::new_v4(), Uuid::new_v4(), "   ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
