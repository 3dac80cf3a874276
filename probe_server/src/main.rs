//! Main entry point for the probe server binary

use anyhow::Result;
use probe_core::{
    create_app, get_database_pool, run_migrations, run_server, AppConfig, AppState,
    DatabaseManager,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!("Database URL: {}", config.database.url);
    if !config.server.base_path.is_empty() {
        info!("Application mounted under: /{}", config.server.base_path.trim_matches('/'));
    }

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let pool = get_database_pool(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?;

    if config.database.migrate_on_start {
        run_migrations(pool.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {}", e))?;
    }

    let state = AppState::new(&config, DatabaseManager::new(pool));

    state
        .seed_options(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to seed options: {}", e))?;

    let probe_path = state.probe_settings.path().await;
    info!("App: {} v{}", state.app_name, state.version);
    info!("Probe endpoint: {}", state.probe_url(&probe_path).await);

    let app = create_app(state);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_level = if cfg!(debug_assertions) { "debug" } else { "info" };

        format!(
            "probe_core={},{}={},tower_http=debug,axum=debug",
            default_level,
            env!("CARGO_CRATE_NAME").replace('-', "_"),
            default_level
        )
        .into()
    });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
