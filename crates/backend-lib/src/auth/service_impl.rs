use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use super::password::PasswordHasher;
use super::token::issue_token;
use super::{AuthError, AuthService};
use crate::context::RequestContext;
use crate::metrics::{
    ADMIN_CHECKED, INTERNAL_FAILURE, LOGIN_REJECTED, LOGIN_SUCCEEDED, REGISTER_REJECTED,
    REGISTER_SUCCEEDED,
};
use crate::storage::{AdminFlagStore, AppStore, Storage, StorageError, UserStore};
use sso_common::{AppId, UserId};

const DUMMY_PASSWORD: &str = "unknown-user-placeholder";

/// Credential service backed by the storage ports.
///
/// Safe to share across concurrent requests.
pub struct DefaultAuth {
    users: Arc<dyn UserStore>,
    apps: Arc<dyn AppStore>,
    admins: Arc<dyn AdminFlagStore>,
    hasher: PasswordHasher,
    token_ttl: Duration,
    /// Hash verified against when the email is unknown, built on first use
    dummy_hash: OnceCell<Vec<u8>>,
}

impl DefaultAuth {
    pub fn new(
        users: Arc<dyn UserStore>,
        apps: Arc<dyn AppStore>,
        admins: Arc<dyn AdminFlagStore>,
        hasher: PasswordHasher,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            apps,
            admins,
            hasher,
            token_ttl,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Serve all three ports from one backend
    pub fn from_storage<S>(storage: Arc<S>, hasher: PasswordHasher, token_ttl: Duration) -> Self
    where
        S: Storage + 'static,
    {
        Self::new(storage.clone(), storage.clone(), storage, hasher, token_ttl)
    }

    /// Spend one password verification so an unknown email costs as much as a
    /// wrong password. The outcome is discarded.
    async fn verify_against_dummy(&self, ctx: &RequestContext, password: &str) {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| self.hasher.hash_blocking(DUMMY_PASSWORD.to_owned()))
            .await;
        match hash {
            Ok(hash) => {
                let _ = ctx
                    .bound(self.hasher.verify_blocking(hash.clone(), password.to_owned()))
                    .await;
            }
            Err(e) => warn!(error = %e, "failed to prepare dummy password hash"),
        }
    }
}

/// Bound a storage call by the request deadline, whatever the adapter does with it.
async fn bounded<T, F>(ctx: &RequestContext, fut: F) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, StorageError>>,
{
    ctx.bound(fut).await.unwrap_or_else(|e| Err(e.into()))
}

fn internal_failure(op: &'static str) {
    counter!(INTERNAL_FAILURE, "op" => op).increment(1);
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        app_id: AppId,
    ) -> Result<String, AuthError> {
        const OP: &str = "auth.login";

        info!(op = OP, email, app_id, "attempting to login user");

        let user = match bounded(ctx, self.users.user(ctx, email)).await {
            Ok(user) => user,
            Err(StorageError::UserNotFound) => {
                info!(op = OP, "user not found");
                self.verify_against_dummy(ctx, password).await;
                counter!(LOGIN_REJECTED, "reason" => "invalid_credentials").increment(1);
                return Err(AuthError::InvalidCredentials);
            }
            Err(StorageError::DeadlineExceeded(_)) => {
                warn!(op = OP, "deadline exceeded while getting user");
                return Err(AuthError::DeadlineExceeded { op: OP });
            }
            Err(e) => {
                error!(op = OP, error = %e, "failed to get user");
                internal_failure(OP);
                return Err(AuthError::storage(OP, e));
            }
        };

        let matched = ctx
            .bound(
                self.hasher
                    .verify_blocking(user.pass_hash.clone(), password.to_owned()),
            )
            .await
            .map_err(|_| {
                warn!(op = OP, "deadline exceeded while verifying password");
                AuthError::DeadlineExceeded { op: OP }
            })?
            .map_err(|e| {
                error!(op = OP, error = %e, "failed to verify password");
                internal_failure(OP);
                AuthError::internal(OP, e)
            })?;

        if !matched {
            info!(op = OP, "invalid password");
            counter!(LOGIN_REJECTED, "reason" => "invalid_credentials").increment(1);
            return Err(AuthError::InvalidCredentials);
        }

        let app = match bounded(ctx, self.apps.app(ctx, app_id)).await {
            Ok(app) => app,
            Err(StorageError::AppNotFound) => {
                info!(op = OP, app_id, "app not found");
                counter!(LOGIN_REJECTED, "reason" => "app_not_found").increment(1);
                return Err(AuthError::AppNotFound);
            }
            Err(StorageError::DeadlineExceeded(_)) => {
                warn!(op = OP, "deadline exceeded while getting app");
                return Err(AuthError::DeadlineExceeded { op: OP });
            }
            Err(e) => {
                error!(op = OP, error = %e, "failed to get app");
                internal_failure(OP);
                return Err(AuthError::storage(OP, e));
            }
        };

        // never mint for a caller that already gave up
        ctx.check()
            .map_err(|_| AuthError::DeadlineExceeded { op: OP })?;

        let token = issue_token(&user, &app, self.token_ttl).map_err(|e| {
            error!(op = OP, error = %e, "failed to generate token");
            internal_failure(OP);
            AuthError::internal(OP, e)
        })?;

        info!(op = OP, user_id = user.id, app_id, "user logged in successfully");
        counter!(LOGIN_SUCCEEDED).increment(1);

        Ok(token)
    }

    async fn register_new_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError> {
        const OP: &str = "auth.register_new_user";

        info!(op = OP, email, "registering user");

        if email.is_empty() {
            return Err(AuthError::InvalidArgument("email"));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidArgument("password"));
        }

        let pass_hash = ctx
            .bound(self.hasher.hash_blocking(password.to_owned()))
            .await
            .map_err(|_| {
                warn!(op = OP, "deadline exceeded while hashing password");
                AuthError::DeadlineExceeded { op: OP }
            })?
            .map_err(|e| {
                error!(op = OP, error = %e, "failed to generate password hash");
                internal_failure(OP);
                AuthError::internal(OP, e)
            })?;

        match bounded(ctx, self.users.save_user(ctx, email, &pass_hash)).await {
            Ok(id) => {
                info!(op = OP, user_id = id, "user registered");
                counter!(REGISTER_SUCCEEDED).increment(1);
                Ok(id)
            }
            Err(StorageError::UserExists) => {
                warn!(op = OP, "user already exists");
                counter!(REGISTER_REJECTED, "reason" => "user_exists").increment(1);
                Err(AuthError::UserExists)
            }
            Err(StorageError::DeadlineExceeded(_)) => {
                warn!(op = OP, "deadline exceeded while saving user");
                Err(AuthError::DeadlineExceeded { op: OP })
            }
            Err(e) => {
                error!(op = OP, error = %e, "failed to save user");
                internal_failure(OP);
                Err(AuthError::storage(OP, e))
            }
        }
    }

    async fn is_admin(&self, ctx: &RequestContext, user_id: UserId) -> Result<bool, AuthError> {
        const OP: &str = "auth.is_admin";

        info!(op = OP, user_id, "checking if user is admin");

        match bounded(ctx, self.admins.is_admin(ctx, user_id)).await {
            Ok(is_admin) => {
                info!(op = OP, user_id, is_admin, "checked if user is admin");
                counter!(ADMIN_CHECKED).increment(1);
                Ok(is_admin)
            }
            // Kept as InvalidAppId pending product confirmation; see DESIGN.md.
            Err(StorageError::UserNotFound) => {
                warn!(op = OP, user_id, "user not found");
                Err(AuthError::InvalidAppId)
            }
            Err(StorageError::DeadlineExceeded(_)) => {
                warn!(op = OP, "deadline exceeded while checking admin flag");
                Err(AuthError::DeadlineExceeded { op: OP })
            }
            Err(e) => {
                error!(op = OP, error = %e, "failed to check admin flag");
                internal_failure(OP);
                Err(AuthError::storage(OP, e))
            }
        }
    }
}
