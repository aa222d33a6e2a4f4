#![allow(dead_code)]

use std::sync::Arc;

use annostore_api::config::{LogFormat, ServerConfig};
use annostore_api::router::build_app_router;
use annostore_api::state::AppState;
use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Mounts the annotator routes at `/annotator`, like the default config.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:3000")],
        request_timeout_secs: 30,
        db_max_connections: 5,
        mount_path: "/annotator".to_string(),
        service_name: "Annotator JS API".to_string(),
        log_format: LogFormat::Text,
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config),
    };
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// Value of the `Location` header.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get("location")
        .expect("response should carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Trailing id segment of a `Location` header.
pub fn location_id(response: &Response<Body>) -> i64 {
    location(response)
        .rsplit('/')
        .next()
        .unwrap()
        .parse()
        .unwrap()
}
