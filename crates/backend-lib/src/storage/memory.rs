// ============================
// sso-backend-lib/src/storage/memory.rs
// ============================
//! In-memory storage backend.
//!
//! Serves every port from concurrent maps. Email uniqueness is enforced by an
//! atomic map entry, so concurrent registrations of one email cannot both win.
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{AdminFlagStore, App, AppStore, StorageError, User, UserStore};
use crate::context::RequestContext;
use sso_common::{AppId, UserId};

#[derive(Debug, Clone)]
struct UserRecord {
    id: UserId,
    pass_hash: Vec<u8>,
}

#[derive(Default)]
struct Inner {
    /// Keyed by exact (case-sensitive) email
    users: DashMap<String, UserRecord>,
    admins: DashMap<UserId, bool>,
    apps: DashMap<AppId, App>,
    last_id: AtomicI64,
}

/// Concurrent in-memory implementation of the storage ports
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given apps already provisioned
    pub fn with_apps<I>(apps: I) -> Self
    where
        I: IntoIterator<Item = App>,
    {
        let storage = Self::new();
        for app in apps {
            storage.insert_app(app);
        }
        storage
    }

    /// Provision (or replace) an app. Administrative path, not used by the core.
    pub fn insert_app(&self, app: App) {
        self.inner.apps.insert(app.id, app);
    }

    /// Set a user's admin flag. Administrative path, not used by the core.
    pub fn set_admin(&self, user_id: UserId, is_admin: bool) -> Result<(), StorageError> {
        match self.inner.admins.get_mut(&user_id) {
            Some(mut flag) => {
                *flag = is_admin;
                Ok(())
            }
            None => Err(StorageError::UserNotFound),
        }
    }

    /// Number of stored users
    pub fn user_count(&self) -> usize {
        self.inner.users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn save_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        pass_hash: &[u8],
    ) -> Result<UserId, StorageError> {
        ctx.check()?;

        let mut created = None;
        self.inner
            .users
            .entry(email.to_owned())
            .or_insert_with(|| {
                let id = self.inner.last_id.fetch_add(1, Ordering::SeqCst) + 1;
                created = Some(id);
                UserRecord {
                    id,
                    pass_hash: pass_hash.to_vec(),
                }
            });

        match created {
            Some(id) => {
                self.inner.admins.insert(id, false);
                Ok(id)
            }
            None => Err(StorageError::UserExists),
        }
    }

    async fn user(&self, ctx: &RequestContext, email: &str) -> Result<User, StorageError> {
        ctx.check()?;

        let record = self
            .inner
            .users
            .get(email)
            .map(|r| r.value().clone())
            .ok_or(StorageError::UserNotFound)?;

        Ok(User {
            id: record.id,
            email: email.to_owned(),
            pass_hash: record.pass_hash,
        })
    }
}

#[async_trait]
impl AppStore for MemoryStorage {
    async fn app(&self, ctx: &RequestContext, app_id: AppId) -> Result<App, StorageError> {
        ctx.check()?;

        self.inner
            .apps
            .get(&app_id)
            .map(|a| a.value().clone())
            .ok_or(StorageError::AppNotFound)
    }
}

#[async_trait]
impl AdminFlagStore for MemoryStorage {
    async fn is_admin(&self, ctx: &RequestContext, user_id: UserId) -> Result<bool, StorageError> {
        ctx.check()?;

        self.inner
            .admins
            .get(&user_id)
            .map(|flag| *flag)
            .ok_or(StorageError::UserNotFound)
    }
}
