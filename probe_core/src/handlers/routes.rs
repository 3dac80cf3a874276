//! HTTP route handlers for the application surface

use crate::{handlers::settings, models::request::ApiResponse, AppState};
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route(
            "/api/settings/probe",
            get(settings::handle_get_probe_settings).put(settings::handle_update_probe_settings),
        )
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(serde_json::json!({
        "app": state.app_name,
        "version": state.version,
        "endpoints": {
            "probe": "configurable, see /api/settings/probe",
            "settings": "/api/settings/probe"
        }
    })))
}
