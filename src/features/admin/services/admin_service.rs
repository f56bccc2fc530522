use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::DashboardDto;
use crate::features::moderation::ModerationRepository;
use crate::features::news::models::News;
use crate::features::plumbers::models::Plumber;
use crate::features::reports::models::Report;

/// Service for the admin review queues
pub struct AdminService {
    pool: PgPool,
    reports: ModerationRepository<Report>,
    news: ModerationRepository<News>,
    plumbers: ModerationRepository<Plumber>,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reports: ModerationRepository::new(pool.clone()),
            news: ModerationRepository::new(pool.clone()),
            plumbers: ModerationRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn reports(&self) -> &ModerationRepository<Report> {
        &self.reports
    }

    pub fn news(&self) -> &ModerationRepository<News> {
        &self.news
    }

    pub fn plumbers(&self) -> &ModerationRepository<Plumber> {
        &self.plumbers
    }

    /// Pending counts per kind plus the number of accounts
    pub async fn dashboard(&self) -> Result<DashboardDto> {
        let (pending_reports, pending_news, pending_plumbers) = tokio::try_join!(
            self.reports.count_pending(),
            self.news.count_pending(),
            self.plumbers.count_pending(),
        )?;

        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(DashboardDto {
            pending_reports,
            pending_news,
            pending_plumbers,
            total_users,
        })
    }
}
