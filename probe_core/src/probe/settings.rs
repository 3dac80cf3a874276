//! Read/write surface over the persisted probe path.

use tracing::{info, warn};

use crate::database::options::{OptionsRepository, PROBE_PATH_OPTION};
use crate::error::Result;
use crate::probe::path::sanitize_probe_path;

/// Path the probe answers on when the operator never configured one.
pub const DEFAULT_PROBE_PATH: &str = "ur-probe";

#[derive(Clone)]
pub struct ProbeSettings {
    options: OptionsRepository,
}

impl ProbeSettings {
    pub fn new(options: OptionsRepository) -> Self {
        Self { options }
    }

    /// The currently configured probe path. Read from the store on every
    /// call: the value can change at any time through the settings API, and
    /// a stale cached copy would serve the probe on a retired path.
    pub async fn path(&self) -> String {
        match self.options.get_option(PROBE_PATH_OPTION).await {
            Ok(Some(path)) if !path.is_empty() => path,
            Ok(_) => DEFAULT_PROBE_PATH.to_string(),
            Err(e) => {
                warn!("Probe path read failed, using default: {}", e);
                DEFAULT_PROBE_PATH.to_string()
            }
        }
    }

    /// Sanitizes and persists a new probe path, returning what was actually
    /// stored. Input that normalizes to nothing falls back to the default
    /// silently.
    pub async fn set_path(&self, input: &str) -> Result<String> {
        let mut path = sanitize_probe_path(input);
        if path.is_empty() {
            path = DEFAULT_PROBE_PATH.to_string();
        }

        self.options.set_option(PROBE_PATH_OPTION, &path).await?;
        info!(probe_path = %path, "Probe path updated");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    use crate::config::DatabaseConfig;
    use crate::database::connection::get_database_pool;
    use crate::database::migrations::run_migrations;

    async fn setup_settings() -> (ProbeSettings, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite:{}", temp_file.path().display()),
            ..DatabaseConfig::default()
        };

        let pool = get_database_pool(&config).await.unwrap();
        run_migrations(pool.clone()).await.unwrap();

        (ProbeSettings::new(OptionsRepository::new(pool)), temp_file)
    }

    #[tokio::test]
    async fn test_default_path_when_unset() {
        let (settings, _db) = setup_settings().await;
        assert_eq!(settings.path().await, DEFAULT_PROBE_PATH);
    }

    #[tokio::test]
    async fn test_set_path_persists() {
        let (settings, _db) = setup_settings().await;

        let stored = settings.set_path("health").await.unwrap();
        assert_eq!(stored, "health");
        assert_eq!(settings.path().await, "health");
    }

    #[tokio::test]
    async fn test_set_path_sanitizes_input() {
        let (settings, _db) = setup_settings().await;

        let stored = settings.set_path("/Status Check/").await.unwrap();
        assert_eq!(stored, "status-check");
        assert_eq!(settings.path().await, "status-check");
    }

    #[tokio::test]
    async fn test_empty_input_falls_back_to_default() {
        let (settings, _db) = setup_settings().await;

        settings.set_path("health").await.unwrap();
        let stored = settings.set_path("").await.unwrap();

        assert_eq!(stored, DEFAULT_PROBE_PATH);
        assert_eq!(settings.path().await, DEFAULT_PROBE_PATH);
    }

    #[tokio::test]
    async fn test_invalid_input_falls_back_to_default() {
        let (settings, _db) = setup_settings().await;

        let stored = settings.set_path("///!!!").await.unwrap();
        assert_eq!(stored, DEFAULT_PROBE_PATH);
    }
}
