use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::NamedTempFile;
use tower::ServiceExt;

use probe_core::{
    create_app, get_database_pool, run_migrations, AppConfig, AppState, DatabaseManager,
};

async fn setup_app() -> (axum::Router, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let mut config = AppConfig::default();
    config.database.url = format!("sqlite:{}", temp_file.path().display());

    let pool = get_database_pool(&config.database).await.unwrap();
    run_migrations(pool.clone()).await.unwrap();

    let state = AppState::new(&config, DatabaseManager::new(pool));
    state.seed_options(&config).await.unwrap();

    (create_app(state), temp_file)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn put_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::put(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_get_settings_reports_path_url_and_status() {
    let (app, _db) = setup_app().await;

    let response = app.oneshot(get("/api/settings/probe")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["probe_path"], "ur-probe");
    assert_eq!(
        json["data"]["probe_url"],
        "http://127.0.0.1:3000/ur-probe/"
    );
    assert_eq!(json["data"]["status"], "OK");
}

#[tokio::test]
async fn test_update_settings_persists_sanitized_path() {
    let (app, _db) = setup_app().await;

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/settings/probe",
            serde_json::json!({"probe_path": "Status Check"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["probe_path"], "status-check");

    // The new path is live immediately; the old one is gone.
    let response = app.clone().oneshot(get("/status-check")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/ur-probe")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_with_empty_path_stores_default() {
    let (app, _db) = setup_app().await;

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/settings/probe",
            serde_json::json!({"probe_path": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["probe_path"], "ur-probe");

    let response = app.oneshot(get("/api/settings/probe")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["probe_path"], "ur-probe");
}

#[tokio::test]
async fn test_settings_route_is_not_shadowed_by_probe() {
    let (app, _db) = setup_app().await;

    // The settings endpoint itself goes through the probe middleware and
    // must fall through to normal routing.
    let response = app.oneshot(get("/api/settings/probe")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
}
