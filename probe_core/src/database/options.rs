//! Key-value options store backing the runtime-mutable application settings.
//!
//! The probe path and the site base URL live here rather than in the static
//! file/environment configuration: operators change them while the server is
//! running, and readers always see the persisted value.

use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::health::ConfigReader;

/// Option holding the URL path the probe answers on.
pub const PROBE_PATH_OPTION: &str = "probe_path";

/// Option holding the externally visible base URL of the application.
pub const SITE_URL_OPTION: &str = "site_url";

#[derive(Clone)]
pub struct OptionsRepository {
    pool: SqlitePool,
}

impl OptionsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_option(&self, name: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM options WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    pub async fn set_option(&self, name: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO options (name, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
        "#,
        )
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        debug!(option = name, "Option updated");
        Ok(())
    }

    /// Writes an option only when it does not exist yet. Returns whether a
    /// row was inserted. Used for first-start seeding of defaults.
    pub async fn seed_option(&self, name: &str, value: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO options (name, value)
            VALUES (?, ?)
            ON CONFLICT(name) DO NOTHING
        "#,
        )
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl ConfigReader for OptionsRepository {
    async fn get_value(&self, key: &str) -> Option<String> {
        match self.get_option(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(option = key, "Option read failed: {}", e);
                None
            }
        }
    }
}
