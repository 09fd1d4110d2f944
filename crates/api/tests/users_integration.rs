//! Integration tests for user management and the role hierarchy.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use docker-compose.

mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use common::{
    cleanup_all_test_data, create_authenticated_user, create_test_app, create_test_pool,
    get_request, json_request, parse_response_body, run_migrations, test_config, AuthedUser,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

/// Seed an enterprise with enabled memberships, bypassing the invitation flow.
async fn seed_enterprise(pool: &PgPool, members: &[(&AuthedUser, &str)]) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query("INSERT INTO enterprises (id, name, created_at, updated_at) VALUES ($1, $2, $3, $3)")
        .bind(id)
        .bind(format!("Fleet {id}"))
        .bind(now)
        .execute(pool)
        .await
        .expect("Failed to seed enterprise");

    for (user, role) in members {
        sqlx::query(
            "INSERT INTO enterprise_members (enterprise_id, user_id, role, status, created_at, updated_at)
             VALUES ($1, $2, $3, 'ENABLED', $4, $4)",
        )
        .bind(id)
        .bind(user.id)
        .bind(role)
        .bind(now)
        .execute(pool)
        .await
        .expect("Failed to seed membership");
    }
    id
}

#[tokio::test]
async fn test_admin_creates_user_with_user_role() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let admin = create_authenticated_user(&pool, "ADMIN").await;

    let request = json_request(
        Method::POST,
        "/api/users",
        json!({
            "name": "Ana Souza",
            "email": "ana@example.com",
            "password": "long-enough-password"
        }),
        &admin.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["role"], "USER");
    assert_eq!(body["status"], "ENABLED");
    assert!(body.get("passwordHash").is_none());

    // Duplicate email conflicts.
    let request = json_request(
        Method::POST,
        "/api/users",
        json!({
            "name": "Another Ana",
            "email": "ana@example.com",
            "password": "long-enough-password"
        }),
        &admin.token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_plain_user_cannot_manage_users() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let user = create_authenticated_user(&pool, "USER").await;

    let request = json_request(
        Method::POST,
        "/api/users",
        json!({
            "name": "Ana Souza",
            "email": "ana2@example.com",
            "password": "long-enough-password"
        }),
        &user.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get_request("/api/users", &user.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // But a user may always read their own profile.
    let response = app
        .oneshot(get_request(&format!("/api/users/{}", user.id), &user.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_role_hierarchy_on_edits() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let admin = create_authenticated_user(&pool, "ADMIN").await;
    let other_admin = create_authenticated_user(&pool, "ADMIN").await;
    let user = create_authenticated_user(&pool, "USER").await;

    // Peers cannot edit peers.
    let request = json_request(
        Method::PATCH,
        &format!("/api/users/{}", other_admin.id),
        json!({"name": "Renamed"}),
        &admin.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An admin edits a lower-ranked account.
    let request = json_request(
        Method::PATCH,
        &format!("/api/users/{}", user.id),
        json!({"status": "DISABLED"}),
        &admin.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "DISABLED");

    // An admin cannot grant a role at or above their own rank.
    let request = json_request(
        Method::PATCH,
        &format!("/api/users/{}", user.id),
        json!({"role": "ADMIN"}),
        &admin.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner can.
    let owner = create_authenticated_user(&pool, "OWNER").await;
    let request = json_request(
        Method::PATCH,
        &format!("/api/users/{}", user.id),
        json!({"role": "ADMIN"}),
        &owner.token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["role"], "ADMIN");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_enterprise_admin_manages_member_accounts() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let manager = create_authenticated_user(&pool, "USER").await;
    let member = create_authenticated_user(&pool, "USER").await;
    let outsider = create_authenticated_user(&pool, "USER").await;
    seed_enterprise(&pool, &[(&manager, "ADMIN"), (&member, "MEMBER")]).await;

    // The enterprise admin reads a member's profile.
    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/users/{}", member.id),
            &manager.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A user outside the enterprise cannot.
    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/users/{}", member.id),
            &outsider.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The enterprise admin disables the member's account.
    let request = json_request(
        Method::PATCH,
        &format!("/api/users/{}", member.id),
        json!({"status": "DISABLED"}),
        &manager.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "DISABLED");

    // But handing out global roles is still rank-gated.
    let request = json_request(
        Method::PATCH,
        &format!("/api/users/{}", member.id),
        json!({"role": "ADMIN"}),
        &manager.token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_enterprise_admin_cannot_touch_higher_ranked_member() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let manager = create_authenticated_user(&pool, "USER").await;
    let admin_member = create_authenticated_user(&pool, "ADMIN").await;
    seed_enterprise(&pool, &[(&manager, "ADMIN"), (&admin_member, "MEMBER")]).await;

    let request = json_request(
        Method::PATCH,
        &format!("/api/users/{}", admin_member.id),
        json!({"status": "DISABLED"}),
        &manager.token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_delete_user_frees_email() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let admin = create_authenticated_user(&pool, "ADMIN").await;
    let user = create_authenticated_user(&pool, "USER").await;

    let request = json_request(
        Method::DELETE,
        &format!("/api/users/{}", user.id),
        json!({}),
        &admin.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The email is free for a new registration.
    let request = json_request(
        Method::POST,
        "/api/users",
        json!({
            "name": "Fresh Account",
            "email": user.email,
            "password": "long-enough-password"
        }),
        &admin.token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    cleanup_all_test_data(&pool).await;
}
