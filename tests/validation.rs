mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{authed_json_request, body_json, session_token, test_app};

#[tokio::test]
async fn favorite_without_store_id_is_rejected() {
    let app = test_app();
    let token = session_token();

    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/v1/stores/favorites",
            &token,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    assert_eq!(body["error"]["message"], json!("storeId is required"));
    assert_eq!(
        body["error"]["field_errors"]["storeId"],
        json!("storeId is required")
    );
}

#[tokio::test]
async fn list_requires_name() {
    let app = test_app();
    let token = session_token();

    let response = app
        .oneshot(authed_json_request("POST", "/api/v1/lists", &token, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    assert_eq!(body["error"]["field_errors"]["name"], json!("name is required"));
}

#[tokio::test]
async fn list_name_length_is_bounded() {
    let app = test_app();
    let token = session_token();

    let long_name = "x".repeat(201);
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/v1/lists",
            &token,
            json!({"name": long_name}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn meal_type_must_be_known() {
    let app = test_app();
    let token = session_token();

    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/v1/meal-plans",
            &token,
            json!({"planDate": "2026-03-01", "mealType": "brunch"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = test_app();
    let token = session_token();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/lists")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn share_requires_valid_email() {
    let app = test_app();
    let token = session_token();

    let list_id = uuid::Uuid::new_v4();
    let response = app
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/v1/lists/{}/collaborators", list_id),
            &token,
            json!({"email": "not-an-email"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn category_search_requires_query() {
    let app = test_app();
    let token = session_token();

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
async fn register_requires_well_formed_email_and_password() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/auth/register",
            json!({"email": "nope", "password": "secret123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/auth/register",
            json!({"email": "a@example.com", "password": "short"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
