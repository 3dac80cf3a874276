//! Core library containing the probe endpoint, health checks, and settings
//! surface for the UR-Probe server.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod probe;
pub mod runtime;

pub use config::AppConfig;
pub use database::{
    get_database_pool, run_migrations, DatabaseManager, OptionsRepository, PROBE_PATH_OPTION,
    SITE_URL_OPTION,
};
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use health::{ConfigReader, HealthChecker, RuntimeIntrospector, StoreClient};
pub use probe::{ProbeSettings, DEFAULT_PROBE_PATH};
pub use runtime::AppRuntime;

use axum::{middleware as axum_middleware, Router};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::info;

use crate::probe::path::trim_slashes;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    /// Mount prefix, stored without surrounding slashes. Empty at root.
    pub base_path: String,
    pub db_manager: DatabaseManager,
    pub options: OptionsRepository,
    pub probe_settings: ProbeSettings,
    pub health_checker: Arc<HealthChecker>,
}

impl AppState {
    pub fn new(config: &AppConfig, db_manager: DatabaseManager) -> Self {
        let options = OptionsRepository::new(db_manager.pool().clone());
        let probe_settings = ProbeSettings::new(options.clone());
        let app_name = "UR-Probe".to_string();

        let health_checker = HealthChecker::new(
            Arc::new(db_manager.clone()),
            Arc::new(AppRuntime::new(app_name.clone())),
            Arc::new(options.clone()),
        );

        Self {
            app_name,
            version: env!("CARGO_PKG_VERSION").to_string(),
            base_path: trim_slashes(&config.server.base_path).to_string(),
            db_manager,
            options,
            probe_settings,
            health_checker: Arc::new(health_checker),
        }
    }

    /// Swaps in a checker built from substitute collaborators.
    pub fn with_health_checker(mut self, health_checker: HealthChecker) -> Self {
        self.health_checker = Arc::new(health_checker);
        self
    }

    /// Writes first-start defaults: the probe path is seeded only when
    /// absent, while the site URL always tracks the static configuration.
    pub async fn seed_options(&self, config: &AppConfig) -> Result<()> {
        if self
            .options
            .seed_option(PROBE_PATH_OPTION, DEFAULT_PROBE_PATH)
            .await?
        {
            info!("Seeded default probe path: {}", DEFAULT_PROBE_PATH);
        }

        self.options
            .set_option(SITE_URL_OPTION, &config.server.public_url)
            .await?;

        Ok(())
    }

    /// Full externally reachable URL for the given probe path.
    pub async fn probe_url(&self, probe_path: &str) -> String {
        let site_url = self
            .options
            .get_option(SITE_URL_OPTION)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        let site_url = site_url.trim_end_matches('/');

        if self.base_path.is_empty() {
            format!("{}/{}/", site_url, probe_path)
        } else {
            format!("{}/{}/{}/", site_url, self.base_path, probe_path)
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    // The probe middleware must wrap the routes: a matching request
    // terminates before any routing runs. Only the trace layer sits outside.
    Router::new()
        .merge(create_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::probe::probe_middleware,
        ))
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
