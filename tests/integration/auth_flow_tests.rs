// ==================================
// tests/integration/auth_flow_tests.rs
// ==================================
//! End-to-end credential flows through the HTTP router.
use axum::http::StatusCode;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::json;
use sso_backend_lib::auth::SessionClaims;

use crate::test_utils::{setup_test_app, APP_ID, APP_SECRET};

fn decode(token: &str) -> SessionClaims {
    jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(APP_SECRET.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .unwrap()
    .claims
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_register_login_is_admin_scenario() {
    let app = setup_test_app();

    let (status, body) = app.register("a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 1);

    let before = chrono::Utc::now().timestamp();
    let (status, body) = app.login("a@x.com", "secret1", APP_ID).await;
    assert_eq!(status, StatusCode::OK);
    let claims = decode(body["token"].as_str().unwrap());
    assert_eq!(claims.sub, 1);
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.app_id, APP_ID);
    assert!(claims.iat >= before);
    assert_eq!(claims.exp - claims.iat, app.settings.token_ttl().as_secs() as i64);

    let (status, body) = app.login("a@x.com", "wrong", APP_ID).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_001");

    let (status, body) = app.login("nobody@x.com", "secret1", APP_ID).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_001");

    let (status, body) = app.login("a@x.com", "secret1", 999).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "APP_001");

    let (status, body) = app.get("/v1/users/1/is-admin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "is_admin": false }));
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = setup_test_app();

    let (status, _) = app.register("a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.register("a@x.com", "another-secret").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "USER_001");
    assert_eq!(app.storage.user_count(), 1);

    // The original password still works
    let (status, _) = app.login("a@x.com", "secret1", APP_ID).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_bodies_are_identical() {
    let app = setup_test_app();
    app.register("a@x.com", "secret1").await;

    let wrong_password = app.login("a@x.com", "wrong-password", APP_ID).await;
    let unknown_email = app.login("b@x.com", "wrong-password", APP_ID).await;
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn test_admin_flag_reflects_store() {
    let app = setup_test_app();
    let (_, body) = app.register("admin@x.com", "secret1").await;
    let user_id = body["user_id"].as_i64().unwrap();

    let uri = format!("/v1/users/{user_id}/is-admin");
    let (_, body) = app.get(&uri).await;
    assert_eq!(body["is_admin"], false);

    app.storage.set_admin(user_id, true).unwrap();
    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_admin"], true);
}

#[tokio::test]
async fn test_is_admin_unknown_user_is_invalid_app_id() {
    let app = setup_test_app();
    let (status, body) = app.get("/v1/users/42/is-admin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "APP_002");
}

#[tokio::test]
async fn test_request_validation() {
    let app = setup_test_app();

    let (status, body) = app.register("not-an-email", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");

    let (status, body) = app.register("a@x.com", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");

    // Below the default minimum length
    let (status, _) = app.register("a@x.com", "abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.login("a@x.com", "secret1", 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");

    let (status, body) = app.get("/v1/users/0/is-admin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");

    let (status, body) = app.get("/v1/users/abc/is-admin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");

    // Missing field
    let (status, body) = app
        .post_json("/v1/auth/login", json!({ "email": "a@x.com", "password": "secret1" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");

    assert_eq!(app.storage.user_count(), 0);
}

#[tokio::test]
async fn test_password_policy_comes_from_settings() {
    let mut settings = crate::test_utils::test_settings();
    settings.auth.password_requirements.min_length = 10;
    settings.auth.password_requirements.require_digit = true;
    let app = crate::test_utils::setup_test_app_with(settings);

    let (status, _) = app.register("a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.register("a@x.com", "longer-secret-1").await;
    assert_eq!(status, StatusCode::OK);
}
