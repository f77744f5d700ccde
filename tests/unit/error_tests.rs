// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sso_backend_lib::auth::AuthError;
use sso_backend_lib::error::AppError;
use sso_common::ErrorBody;

async fn body_of(err: AppError) -> (StatusCode, ErrorBody) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_error_body_shape() {
    let (status, body) = body_of(AppError::from(AuthError::AppNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.error.code, "APP_001");
    assert!(!body.error.message.is_empty());
}

#[tokio::test]
async fn test_deadline_maps_to_gateway_timeout() {
    let (status, body) =
        body_of(AppError::from(AuthError::DeadlineExceeded { op: "auth.login" })).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body.error.code, "TIME_001");
}

#[test]
fn test_sanitized_messages_hide_detail() {
    let err = AppError::Internal("auth.register_new_user: pool timed out".to_string());
    assert!(!err.sanitized_message().contains("pool"));
    assert_eq!(
        AppError::InvalidCredentials.sanitized_message(),
        "Invalid email or password"
    );
}
