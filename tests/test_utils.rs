//! Test utilities for SSO Server tests
//!
//! Builds a router over in-memory storage with one provisioned app and cheap
//! hashing parameters, plus helpers to send JSON requests through it.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sso_backend_lib::{
    config::{HashingSettings, Settings},
    router::create_router,
    storage::{App, MemoryStorage},
    AppState,
};
use tower::ServiceExt;

pub const APP_ID: i32 = 7;
pub const APP_SECRET: &str = "app-7-secret";

/// A router plus a handle on the storage behind it
pub struct TestApp {
    pub router: Router,
    pub storage: MemoryStorage,
    pub settings: Settings,
}

/// Settings with hashing cheap enough for tests
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.hashing = HashingSettings { log_n: 4, r: 8, p: 1 };
    settings
}

pub fn test_app_record() -> App {
    App {
        id: APP_ID,
        name: "billing".to_string(),
        secret: APP_SECRET.to_string(),
    }
}

/// Sets up a router over in-memory storage with app 7 provisioned
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_settings())
}

pub fn setup_test_app_with(settings: Settings) -> TestApp {
    let storage = MemoryStorage::with_apps([test_app_record()]);
    let state = AppState::new(Arc::new(storage.clone()), settings.clone())
        .expect("test hashing settings are valid");

    TestApp {
        router: create_router(Arc::new(state)),
        storage,
        settings,
    }
}

impl TestApp {
    /// Send a request and return the status with the parsed JSON body
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn register(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post_json(
            "/v1/auth/register",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str, app_id: i32) -> (StatusCode, Value) {
        self.post_json(
            "/v1/auth/login",
            serde_json::json!({ "email": email, "password": password, "app_id": app_id }),
        )
        .await
    }
}
