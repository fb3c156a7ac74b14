#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;

use basket_api::app::app;
use basket_api::config;
use basket_api::database;
use basket_api::state::AppState;

/// Build the router against a lazy pool. No connection is made until a
/// handler actually touches the database, so auth and validation paths
/// can be exercised without a live Postgres.
pub fn test_app() -> Router {
    std::env::set_var("SESSION_SECRET", "test-session-secret");
    if std::env::var("DATABASE_URL").is_err() {
        std::env::set_var("DATABASE_URL", "postgres://localhost/basket_test");
    }

    let pool = database::connect_lazy(&config::config().database)
        .expect("lazy pool");
    app(AppState::new(pool))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Mint a token the session gate will accept. The user does not need to
/// exist in the database for routes that fail before touching it.
pub fn session_token() -> String {
    let claims = basket_api::auth::Claims::new(
        uuid::Uuid::new_v4(),
        "tester@example.com".to_string(),
        24,
    );
    basket_api::auth::generate_session_token(&claims, "test-session-secret").expect("token")
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
