//! Request logging middleware configuration

use axum::body::Body;
use http::Request;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info_span;

pub fn logging_layer() -> TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
    fn(&Request<Body>) -> tracing::Span,
    tower_http::trace::DefaultOnRequest,
    fn(&http::Response<Body>, Duration, &tracing::Span),
    tower_http::trace::DefaultOnBodyChunk,
    tower_http::trace::DefaultOnEos,
    fn(tower_http::classify::ServerErrorsFailureClass, Duration, &tracing::Span),
> {
    let make_span: fn(&Request<Body>) -> tracing::Span = |request: &Request<Body>| {
        info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            version = ?request.version(),
        )
    };
    let on_response: fn(&http::Response<Body>, Duration, &tracing::Span) =
        |response: &http::Response<Body>, latency: Duration, _span: &tracing::Span| {
                let status = response.status();
                let latency_ms = latency.as_millis();

                if status.is_server_error() {
                    tracing::error!(
                        status = status.as_u16(),
                        latency_ms = latency_ms,
                        "server error response"
                    );
                } else if status.is_client_error() {
                    tracing::warn!(
                        status = status.as_u16(),
                        latency_ms = latency_ms,
                        "client error response"
                    );
                } else {
                    tracing::info!(
                        status = status.as_u16(),
                        latency_ms = latency_ms,
                        "request completed"
                    );
                }
            };
    let on_failure: fn(tower_http::classify::ServerErrorsFailureClass, Duration, &tracing::Span) =
        |error: tower_http::classify::ServerErrorsFailureClass,
         latency: Duration,
         _span: &tracing::Span| {
            tracing::error!(
                latency_ms = latency.as_millis(),
                error = ?error,
                "request failed"
            );
        };

    TraceLayer::new_for_http()
        .make_span_with(make_span)
        .on_response(on_response)
        .on_failure(on_failure)
}
