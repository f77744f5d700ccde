// ============================
// sso-backend-lib/src/storage.rs
// ============================
//! Storage ports consumed by the credential service, plus the bundled adapters.
//!
//! The core only ever talks to [`UserStore`], [`AppStore`] and [`AdminFlagStore`].
//! Semantic outcomes (`UserNotFound`, `UserExists`, `AppNotFound`) are separate
//! variants from backend failures so callers can tell them apart without
//! inspecting messages.
use async_trait::async_trait;
use thiserror::Error;

use crate::context::{DeadlineExceeded, RequestContext};
use sso_common::{AppId, UserId};

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStorage;
#[cfg(feature = "postgres")]
pub use postgres::PgStorage;

/// A registered user as read back from storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Encoded password hash, never the raw password
    pub pass_hash: Vec<u8>,
}

/// A consuming application, provisioned out-of-band
#[derive(Clone, PartialEq, Eq)]
pub struct App {
    pub id: AppId,
    pub name: String,
    /// Token signing secret
    pub secret: String,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Errors reported by storage adapters
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("user not found")]
    UserNotFound,

    #[error("user already exists")]
    UserExists,

    #[error("app not found")]
    AppNotFound,

    #[error("storage call exceeded the request deadline")]
    DeadlineExceeded(#[from] DeadlineExceeded),

    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StorageError::Backend(Box::new(err))
    }
}

/// User persistence and lookup
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user and return the id assigned by the store.
    ///
    /// Fails with [`StorageError::UserExists`] when the email is taken.
    async fn save_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        pass_hash: &[u8],
    ) -> Result<UserId, StorageError>;

    /// Fetch a user by exact email.
    ///
    /// Fails with [`StorageError::UserNotFound`].
    async fn user(&self, ctx: &RequestContext, email: &str) -> Result<User, StorageError>;
}

/// App lookup
#[async_trait]
pub trait AppStore: Send + Sync {
    /// Fails with [`StorageError::AppNotFound`].
    async fn app(&self, ctx: &RequestContext, app_id: AppId) -> Result<App, StorageError>;
}

/// Admin flag lookup
#[async_trait]
pub trait AdminFlagStore: Send + Sync {
    /// Fails with [`StorageError::UserNotFound`].
    async fn is_admin(&self, ctx: &RequestContext, user_id: UserId) -> Result<bool, StorageError>;
}

/// A backend able to serve every port
pub trait Storage: UserStore + AppStore + AdminFlagStore {}

impl<T> Storage for T where T: UserStore + AppStore + AdminFlagStore {}
