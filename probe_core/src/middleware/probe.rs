//! Early interception of probe requests.
//!
//! Installed as the outermost routing layer so a matching request never
//! reaches the normal routes: the probe must answer even when the rest of
//! the application would fail to. The configured path is read from the
//! options store on every request; an operator change takes effect on the
//! next request without any refresh step.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use crate::probe::path::{strip_base_path, trim_slashes};
use crate::AppState;

pub const PROBE_BODY_OK: &str = "OK";
pub const PROBE_BODY_ERR: &str = "ERR";

pub async fn probe_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> std::result::Result<Response, std::convert::Infallible> {
    let path = trim_slashes(request.uri().path());
    let path = strip_base_path(path, &state.base_path);

    let probe_path = state.probe_settings.path().await;
    if path != probe_path {
        return Ok(next.run(request).await);
    }

    debug!(path = %request.uri().path(), "Probe request intercepted");
    let healthy = state.health_checker.check().await;
    info!(healthy, "Probe evaluated");

    Ok(probe_response(healthy))
}

/// Fixed plain-text probe response. Monitoring systems poll this endpoint,
/// so every intermediary cache layer is told to stay out of the way.
fn probe_response(healthy: bool) -> Response {
    let (status, body) = if healthy {
        (StatusCode::OK, PROBE_BODY_OK)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, PROBE_BODY_ERR)
    };

    (
        status,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        body,
    )
        .into_response()
}
