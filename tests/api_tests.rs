//! Tests de la superficie HTTP que no requieren base de datos viva:
//! validación de formato, autenticación/autorización y rate limiting.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use ride_hailing::cache::ttl_store::InMemoryTtlStore;
use ride_hailing::config::environment::EnvironmentConfig;
use ride_hailing::database::connection::DatabaseConnection;
use ride_hailing::routes::create_app;
use ride_hailing::state::AppState;
use ride_hailing::utils::jwt::{generate_access_token, JwtConfig};

fn create_test_app() -> axum::Router {
    let config = EnvironmentConfig::from_env();
    // Pool perezoso: los tests de abajo no ejecutan queries
    let db = DatabaseConnection::new_lazy(&config.database_url).expect("lazy pool");
    let state = AppState::new(db.pool().clone(), config, Arc::new(InMemoryTtlStore::new()));
    create_app(state)
}

fn access_token(user_id: i64, user_type: &str) -> String {
    let config = EnvironmentConfig::from_env();
    generate_access_token(user_id, user_type, &JwtConfig::from(&config)).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["service"], "ride-hailing");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_otp_requires_phone() {
    let app = create_test_app();
    let response = app
        .oneshot(json_request("POST", "/auth/request-otp", json!({ "phone": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Phone number is required");
}

#[tokio::test]
async fn test_request_otp_rejects_invalid_phone_format() {
    let app = create_test_app();
    let response = app
        .oneshot(json_request("POST", "/auth/request-otp", json!({ "phone": "12345" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid phone number format"));
}

#[tokio::test]
async fn test_verify_otp_requires_code() {
    let app = create_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/verify-otp",
            json!({ "phone": "0911223344", "otp": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_driver_profile_requires_token() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/drivers/profile/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_driver_profile_rejects_garbage_token() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/drivers/profile/me")
                .header("Authorization", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_driver_endpoints_reject_passenger_tokens() {
    let app = create_test_app();
    let token = access_token(1, "passenger");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/drivers/profile/me")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Only drivers can access this endpoint");
}

#[tokio::test]
async fn test_admin_endpoints_reject_non_admin_tokens() {
    let app = create_test_app();
    let token = access_token(2, "driver");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/drivers/pending-documents")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_recalculate_rejects_malformed_booking_id() {
    let app = create_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/pricing/recalculate",
            json!({ "bookingId": "not-a-uuid" }),
        ))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_auth_routes_are_rate_limited() {
    let app = create_test_app();
    let limit = EnvironmentConfig::from_env().rate_limit_requests;

    for _ in 0..limit {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/auth/request-otp", json!({ "phone": "" })))
            .await
            .unwrap();
        assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    let response = app
        .oneshot(json_request("POST", "/auth/request-otp", json!({ "phone": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
