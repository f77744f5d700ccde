// =============
// sso-backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, the transport-agnostic entry
//! point of the credential core.
use async_trait::async_trait;

use super::AuthError;
use crate::context::RequestContext;
use sso_common::{AppId, UserId};

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Authenticate `email`/`password` and mint a session token scoped to `app_id`.
    async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        app_id: AppId,
    ) -> Result<String, AuthError>;

    /// Create a user and return the id assigned by storage.
    async fn register_new_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError>;

    /// Whether `user_id` carries the admin flag.
    async fn is_admin(&self, ctx: &RequestContext, user_id: UserId) -> Result<bool, AuthError>;
}
