//! Aggregate health evaluation behind the probe endpoint.
//!
//! The checker runs a fixed, ordered sequence of checks against its injected
//! collaborators and collapses every outcome into a single boolean. The first
//! failing check stops the sequence; no detail beyond the boolean leaves this
//! module. Causes are recorded on the `tracing` output only.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::database::options::SITE_URL_OPTION;

/// Client of the backing relational store.
#[async_trait::async_trait]
pub trait StoreClient: Send + Sync {
    /// Returns whether a live connection to the store is available,
    /// re-validating or re-establishing a stale one where possible.
    async fn check_connection(&self) -> bool;

    /// Runs a single-value query and returns the scalar as text, or `None`
    /// when the query fails or produces no row.
    async fn query_scalar(&self, sql: &str) -> Option<String>;
}

/// Introspection into the hosting application's runtime state.
pub trait RuntimeIntrospector: Send + Sync {
    /// The application display name. Empty until the application is fully
    /// initialized.
    fn application_name(&self) -> String;
}

/// Read access to the persisted configuration subsystem.
#[async_trait::async_trait]
pub trait ConfigReader: Send + Sync {
    async fn get_value(&self, key: &str) -> Option<String>;
}

pub struct HealthChecker {
    store: Arc<dyn StoreClient>,
    runtime: Arc<dyn RuntimeIntrospector>,
    config: Arc<dyn ConfigReader>,
}

impl HealthChecker {
    pub fn new(
        store: Arc<dyn StoreClient>,
        runtime: Arc<dyn RuntimeIntrospector>,
        config: Arc<dyn ConfigReader>,
    ) -> Self {
        Self {
            store,
            runtime,
            config,
        }
    }

    /// Evaluates all checks in order, stopping at the first failure.
    pub async fn check(&self) -> bool {
        if !self.store.check_connection().await {
            warn!("Health check failed: no live store connection");
            return false;
        }
        debug!("Health check passed: store connection");

        match self.store.query_scalar("SELECT 1").await {
            Some(value) if value == "1" => {
                debug!("Health check passed: diagnostic query");
            }
            other => {
                warn!(result = ?other, "Health check failed: diagnostic query");
                return false;
            }
        }

        if self.runtime.application_name().is_empty() {
            warn!("Health check failed: application runtime not initialized");
            return false;
        }
        debug!("Health check passed: application runtime");

        match self.config.get_value(SITE_URL_OPTION).await {
            Some(value) if !value.is_empty() => {
                debug!("Health check passed: configuration access");
            }
            _ => {
                warn!("Health check failed: configuration subsystem unreachable");
                return false;
            }
        }

        true
    }
}
