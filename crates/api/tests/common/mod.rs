#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use planet_lines_core::engine::{AnalyticEngine, ChartEngine};
use serde_json::Value;
use tower::ServiceExt;

use planet_lines_api::config::ServerConfig;
use planet_lines_api::router::build_app_router;
use planet_lines_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin, a 30-second request timeout
/// and lenient timezone handling.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        strict_timezones: false,
    }
}

/// Build the full application router with the given config and engine.
pub fn build_app_with(config: ServerConfig, engine: Arc<dyn ChartEngine>) -> Router {
    build_app_router(AppState {
        config: Arc::new(config),
        engine,
    })
}

/// Build the full application router with the built-in engine, exercising
/// the same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app() -> Router {
    build_app_with(test_config(), Arc::new(AnalyticEngine::new()))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Linz, 1983-07-04 12:10 local time.
pub fn linz_birth() -> Value {
    serde_json::json!({
        "birthdate_iso": "1983-07-04",
        "birthtime_24": "12:10",
        "latitude": 48.3069,
        "longitude": 14.2858,
        "timezone_name": "Europe/Vienna",
        "birthplace_text": "Linz, Austria"
    })
}
