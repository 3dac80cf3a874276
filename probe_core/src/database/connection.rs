use sqlx::{sqlite::SqlitePoolOptions, Connection, Row, SqlitePool};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::health::StoreClient;

#[derive(Clone)]
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Acquires a pooled connection and pings it. Stale connections are
    /// discarded and re-established by the pool (`test_before_acquire`).
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            error!("Failed to acquire database connection: {}", e);
            AppError::from(e)
        })?;

        conn.ping().await.map_err(AppError::from)?;

        Ok(())
    }

    /// Runs a single-row, single-column query and returns the value as text.
    /// Integer scalars are stringified so callers can compare uniformly.
    pub async fn select_scalar(&self, sql: &str) -> Result<Option<String>> {
        let row = sqlx::query(sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        let value = match row {
            Some(row) => Some(
                row.try_get::<i64, _>(0)
                    .map(|v| v.to_string())
                    .or_else(|_| row.try_get::<String, _>(0))
                    .map_err(AppError::from)?,
            ),
            None => None,
        };

        Ok(value)
    }
}

#[async_trait::async_trait]
impl StoreClient for DatabaseManager {
    async fn check_connection(&self) -> bool {
        match self.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Store connection check failed: {}", e);
                false
            }
        }
    }

    async fn query_scalar(&self, sql: &str) -> Option<String> {
        match self.select_scalar(sql).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Store scalar query failed: {}", e);
                None
            }
        }
    }
}

pub async fn get_database_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    info!("Connecting to database: {}", config.url);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .test_before_acquire(true)
        .connect(&config.url)
        .await
        .map_err(|e| {
            error!("Failed to create database pool: {}", e);
            AppError::from(e)
        })?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .map_err(AppError::from)?;

    sqlx::query("PRAGMA busy_timeout = 30000")
        .execute(&pool)
        .await
        .map_err(AppError::from)?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn test_config(url: String) -> DatabaseConfig {
        DatabaseConfig {
            url,
            ..DatabaseConfig::default()
        }
    }

    #[tokio::test]
    async fn test_database_connection() {
        let temp_file = NamedTempFile::new().unwrap();
        let database_url = format!("sqlite:{}", temp_file.path().display());

        let pool = get_database_pool(&test_config(database_url)).await.unwrap();
        let db_manager = DatabaseManager::new(pool);

        db_manager.ping().await.unwrap();

        let value = db_manager.select_scalar("SELECT 1").await.unwrap();
        assert_eq!(value.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_select_scalar_stringifies_text_and_integers() {
        let temp_file = NamedTempFile::new().unwrap();
        let database_url = format!("sqlite:{}", temp_file.path().display());

        let pool = get_database_pool(&test_config(database_url)).await.unwrap();
        let db_manager = DatabaseManager::new(pool);

        assert_eq!(
            db_manager.select_scalar("SELECT 0").await.unwrap().as_deref(),
            Some("0")
        );
        assert_eq!(
            db_manager
                .select_scalar("SELECT 'abc'")
                .await
                .unwrap()
                .as_deref(),
            Some("abc")
        );
        assert_eq!(
            db_manager
                .select_scalar("SELECT 1 WHERE 1 = 0")
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_store_client_on_closed_pool() {
        let temp_file = NamedTempFile::new().unwrap();
        let database_url = format!("sqlite:{}", temp_file.path().display());

        let pool = get_database_pool(&test_config(database_url)).await.unwrap();
        let db_manager = DatabaseManager::new(pool.clone());

        assert!(db_manager.check_connection().await);

        pool.close().await;

        assert!(!db_manager.check_connection().await);
        assert_eq!(db_manager.query_scalar("SELECT 1").await, None);
    }
}
