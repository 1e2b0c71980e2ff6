/// API tests that run without a database
///
/// The app is built over a lazy pool that never connects, so these tests
/// exercise exactly the paths that must reject a request before any storage
/// access: credential handling, request validation, and degraded health.

mod common;

use axum::http::StatusCode;
use common::{body_json, offline_app, send_json};
use serde_json::json;
use tower::Service as _;

#[tokio::test]
async fn test_health_reports_degraded_without_database() {
    let app = offline_app();

    let response = send_json(&app, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["database"], "disconnected");
}

#[tokio::test]
async fn test_tasks_require_authentication() {
    let app = offline_app();

    let response = send_json(&app, "GET", "/v1/tasks", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send_json(
        &app,
        "POST",
        "/v1/tasks",
        None,
        Some(json!({"title": "x"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send_json(&app, "GET", "/v1/auth/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = offline_app();

    // Not a Bearer scheme
    let response = app
        .clone()
        .call(
            axum::http::Request::builder()
                .method("GET")
                .uri("/v1/tasks")
                .header("authorization", "Basic dXNlcjpwYXNz")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = offline_app();

    let response = send_json(&app, "GET", "/v1/tasks", Some("not-a-jwt"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_forged_token_is_rejected() {
    use chrono::Duration;
    use taskforge_shared::auth::jwt::{create_token, Claims};
    use uuid::Uuid;

    let app = offline_app();

    // Signed with a different secret than the server's
    let claims = Claims::new(Uuid::new_v4(), Duration::hours(1));
    let token = create_token(&claims, "attacker-controlled-secret-32-bytes!").unwrap();

    let response = send_json(&app, "GET", "/v1/tasks", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = offline_app();

    let response = send_json(
        &app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({
            "email": "not-an-email",
            "password": "short",
            "name": ""
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["error"], "validation_error");

    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
    assert!(fields.contains(&"name"));
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let app = offline_app();

    let response = send_json(
        &app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({
            "email": "user@example.com",
            "password": "long-enough",
            "name": "User",
            "role": "superuser"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["details"][0]["field"], "role");
}

#[tokio::test]
async fn test_login_validation_errors() {
    let app = offline_app();

    let response = send_json(
        &app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"email": "bad", "password": ""})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = offline_app();

    let response = send_json(&app, "GET", "/health", None, None).await;
    let headers = response.headers();

    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
}
