// ============================
// sso-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the SSO credential server.

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth, PasswordError, PasswordHasher};
use crate::config::Settings;
use crate::storage::Storage;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Credential service
    pub auth: Arc<dyn AuthService>,
    /// Loaded settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the credential service over a storage backend
    pub fn new<S>(storage: Arc<S>, settings: Settings) -> Result<Self, PasswordError>
    where
        S: Storage + 'static,
    {
        let hasher = PasswordHasher::from_settings(&settings.auth.hashing)?;
        let auth = DefaultAuth::from_storage(storage, hasher, settings.token_ttl());
        Ok(Self::with_service(Arc::new(auth), settings))
    }

    /// Use an existing service implementation
    pub fn with_service(auth: Arc<dyn AuthService>, settings: Settings) -> Self {
        Self {
            auth,
            settings: Arc::new(settings),
        }
    }
}
