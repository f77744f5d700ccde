// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between SSO clients and the credential server.
//! This module defines the request/response bodies of the HTTP boundary.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a user by the backing store
pub type UserId = i64;

/// Identifier of a consuming application
pub type AppId = i32;

/// Register a new user
/// # Fields
/// * `email` - Email address, unique across the identity provider
/// * `password` - Raw password, hashed before it is stored
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Response to a successful registration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterResponse {
    /// Identifier of the newly created user
    pub user_id: UserId,
}

/// Log a user into one application
/// # Fields
/// * `email` - Email address used at registration
/// * `password` - Raw password
/// * `app_id` - Application the session token is scoped to
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub app_id: AppId,
}

/// Response to a successful login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// Signed session token (JWT, HS256, app secret)
    pub token: String,
}

/// Response to an admin check
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsAdminResponse {
    pub is_admin: bool,
}

/// Error body returned for every non-2xx response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Stable error code plus a human readable message
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Stable machine readable code (e.g. `AUTH_001`)
    pub code: String,
    pub message: String,
}
