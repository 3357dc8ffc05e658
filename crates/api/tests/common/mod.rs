//! Shared helpers for HTTP-level integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use photomarket_api::auth::jwt::JwtConfig;
use photomarket_api::config::ServerConfig;
use photomarket_api::router::build_app_router;
use photomarket_api::state::AppState;
use photomarket_db::repositories::PointRepo;
use sqlx::PgPool;
use tower::ServiceExt;

pub const PASSWORD: &str = "photocard-pass-1";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 14,
        },
    }
}

/// The production router over a per-test database.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, json_request("GET", uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, json_request("GET", uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("POST", uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), Some(body))).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), None)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("PATCH", uri, Some(token), Some(body))).await
}

pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, json_request("PATCH", uri, Some(token), None)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, json_request("DELETE", uri, Some(token), None)).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sign up through the API and return the user id.
pub async fn signup(app: Router, nickname: &str) -> i64 {
    let body = serde_json::json!({
        "email": format!("{nickname}@example.com"),
        "password": PASSWORD,
        "nickname": nickname,
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Log in and return the full `data` object (tokens plus user).
pub async fn login(app: Router, nickname: &str) -> serde_json::Value {
    let body = serde_json::json!({
        "email": format!("{nickname}@example.com"),
        "password": PASSWORD,
    });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

/// Sign up, top up the ledger to `balance`, log in. Returns `(user_id, access_token)`.
pub async fn user_with_token(pool: &PgPool, nickname: &str, balance: i64) -> (i64, String) {
    let id = signup(build_test_app(pool.clone()), nickname).await;
    if balance > 0 {
        PointRepo::add(pool, id, balance).await.unwrap();
    }
    let data = login(build_test_app(pool.clone()), nickname).await;
    (id, data["access_token"].as_str().unwrap().to_string())
}
