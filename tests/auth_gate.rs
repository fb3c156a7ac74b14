mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, get, json_request, test_app};

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    let app = test_app();

    let uris = [
        "/api/v1/lists",
        "/api/v1/recipes",
        "/api/v1/meal-plans",
        "/api/v1/stores",
        "/api/v1/stores/favorites",
        "/api/v1/categories",
        "/api/v1/pantry",
    ];

    for uri in uris {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));
    }
}

#[tokio::test]
async fn mutations_reject_missing_token_before_validation() {
    let app = test_app();

    // An empty body would be a validation error, but the auth gate runs first
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/lists", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = test_app();

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1/lists")
        .header("authorization", "Bearer not-a-real-token")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_passes_the_gate() {
    let app = test_app();
    let token = common::session_token();

    // Reaches the handler (which wants ?q=...) instead of being rejected at the gate
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1/categories/search")
        .header("authorization", format!("Bearer {}", token))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn whoami_requires_session() {
    let app = test_app();

    let response = app.oneshot(get("/api/v1/auth/whoami")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn root_banner_is_public() {
    let app = test_app();

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
}
