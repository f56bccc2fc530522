use crate::core::config::DatabaseConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Schema for users, sessions, plumbers, reports and news
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        "Connecting to PostgreSQL (max_connections={}, min_connections={})",
        config.max_connections,
        config.min_connections
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_embedded() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();

        assert!(!versions.is_empty());
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }
}
