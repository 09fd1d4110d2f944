//! Integration tests for login and token-protected access.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use docker-compose.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    cleanup_all_test_data, create_authenticated_user, create_test_app, create_test_pool,
    create_user_with_status, get_request, json_request_unauthed, parse_response_body,
    run_migrations, test_config, TEST_PASSWORD,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_login_success() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let user = create_authenticated_user(&pool, "USER").await;

    let request = json_request_unauthed(
        Method::POST,
        "/api/auth/login",
        json!({"email": user.email, "password": TEST_PASSWORD}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["user"]["id"], user.id.to_string());
    assert!(body["user"].get("passwordHash").is_none());

    // The issued token opens protected routes.
    let token = body["accessToken"].as_str().unwrap();
    let response = app
        .oneshot(get_request("/api/devices", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_login_wrong_password() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let user = create_authenticated_user(&pool, "USER").await;

    let request = json_request_unauthed(
        Method::POST,
        "/api/auth/login",
        json!({"email": user.email, "password": "wrong-password"}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_login_unknown_email_same_error() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let request = json_request_unauthed(
        Method::POST,
        "/api/auth/login",
        json!({"email": "nobody@example.com", "password": TEST_PASSWORD}),
    );
    let response = app.oneshot(request).await.unwrap();
    // Unknown email and wrong password are indistinguishable to the caller.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_login_disabled_account() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let user = create_user_with_status(&pool, "USER", "DISABLED").await;

    let request = json_request_unauthed(
        Method::POST,
        "/api/auth/login",
        json!({"email": user.email, "password": TEST_PASSWORD}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let response = app
        .oneshot(get_request("/api/devices", "not.a.token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
