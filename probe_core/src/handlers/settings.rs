//! Administrative settings API for the probe endpoint.
//!
//! The JSON counterpart of the original settings screen: operators read the
//! current probe path with its full URL and aggregate status, and update the
//! path. Updates go through the same sanitize-and-fallback rules as any
//! other write to the probe configuration, and take effect on the next
//! request.

use crate::{
    error::Result,
    middleware::probe::{PROBE_BODY_ERR, PROBE_BODY_OK},
    models::request::ApiResponse,
    AppState,
};
use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct UpdateProbeSettingsRequest {
    pub probe_path: String,
}

pub async fn handle_get_probe_settings(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let probe_path = state.probe_settings.path().await;
    let probe_url = state.probe_url(&probe_path).await;

    let healthy = state.health_checker.check().await;
    let status = if healthy { PROBE_BODY_OK } else { PROBE_BODY_ERR };

    Ok(Json(ApiResponse::success(serde_json::json!({
        "probe_path": probe_path,
        "probe_url": probe_url,
        "status": status,
        "checked_at": chrono::Utc::now().to_rfc3339(),
    }))))
}

pub async fn handle_update_probe_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProbeSettingsRequest>,
) -> Result<impl IntoResponse> {
    info!("PUT /api/settings/probe - requested path: {:?}", payload.probe_path);

    let stored = state.probe_settings.set_path(&payload.probe_path).await?;
    let probe_url = state.probe_url(&stored).await;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "probe_path": stored,
        "probe_url": probe_url,
    }))))
}
