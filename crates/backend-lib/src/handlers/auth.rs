// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Credential endpoints.
//!
//! Each handler validates the request, runs the matching service operation
//! under the configured request deadline and maps the outcome to JSON.
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::validation;
use crate::AppState;
use sso_common::{
    IsAdminResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserId,
};

fn request_context(state: &AppState) -> RequestContext {
    RequestContext::with_timeout(state.settings.request_timeout())
}

/// `POST /v1/auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    let Json(request) = payload?;
    validation::validate_register_request(&request, &state.settings.auth.password_requirements)?;

    let ctx = request_context(&state);
    let user_id = state
        .auth
        .register_new_user(&ctx, &request.email, &request.password)
        .await?;

    debug!(user_id, "register request served");
    Ok(Json(RegisterResponse { user_id }))
}

/// `POST /v1/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = payload?;
    validation::validate_login_request(&request)?;

    let ctx = request_context(&state);
    let token = state
        .auth
        .login(&ctx, &request.email, &request.password, request.app_id)
        .await?;

    Ok(Json(LoginResponse { token }))
}

/// `GET /v1/users/{user_id}/is-admin`
pub async fn is_admin(
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<Json<IsAdminResponse>, AppError> {
    let Path(user_id) = user_id?;
    validation::validate_user_id(user_id)?;

    let ctx = request_context(&state);
    let is_admin = state.auth.is_admin(&ctx, user_id).await?;

    Ok(Json(IsAdminResponse { is_admin }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
