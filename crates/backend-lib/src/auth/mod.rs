// ============================
// sso-backend-lib/src/auth/mod.rs
// ============================
//! Credential core: password hashing, token issuance and the service that
//! ties them to the storage ports.

mod error;
pub mod password;
mod service;
mod service_impl;
pub mod token;

pub use error::{AuthError, InternalError};
pub use password::{PasswordError, PasswordHasher};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{issue_token, issue_token_at, SessionClaims, TokenError};
