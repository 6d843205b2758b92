#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use mechgraph_api::auth::jwt::{generate_access_token, JwtConfig};
use mechgraph_api::config::ServerConfig;
use mechgraph_api::router::build_app_router;
use mechgraph_api::state::AppState;
use mechgraph_store::{GraphStore, MemoryGraphStore, StoreConfig};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use uuid::Uuid;

pub const API_KEY: &str = "test-anon-key";
const JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` backed by the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        store: StoreConfig {
            url: "memory://".to_string(),
            api_key: API_KEY.to_string(),
            call_timeout: Duration::from_secs(5),
            max_connections: 1,
        },
    }
}

/// Build the full application router over `store`, with the same middleware
/// stack as `main.rs`.
pub fn build_test_app(store: Arc<dyn GraphStore>) -> Router {
    build_test_app_with_shutdown(store, CancellationToken::new())
}

pub fn build_test_app_with_shutdown(
    store: Arc<dyn GraphStore>,
    shutdown: CancellationToken,
) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        shutdown,
    };
    build_app_router(state, &config)
}

/// A fresh in-memory store, shared by the apps built in one test.
pub fn memory_store() -> Arc<dyn GraphStore> {
    Arc::new(MemoryGraphStore::new())
}

/// A bearer token for `user_id`, signed with the test secret.
pub fn token_for(user_id: Uuid) -> String {
    generate_access_token(user_id, &test_config().jwt).unwrap()
}

/// Send a request carrying the API key and, when given, a bearer token.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("apikey", API_KEY);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, token, Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, token, Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::DELETE, uri, token, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
