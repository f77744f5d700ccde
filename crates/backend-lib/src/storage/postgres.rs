// ============================
// sso-backend-lib/src/storage/postgres.rs
// ============================
//! Postgres-backed storage.
//!
//! Every call borrows a pooled connection for the duration of one query only.
//! Each query is bounded by the request deadline.
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use super::{AdminFlagStore, App, AppStore, StorageError, User, UserStore};
use crate::context::RequestContext;
use sso_common::{AppId, UserId};

const SCHEMA: &str = include_str!("schema.sql");

/// How long a caller may wait for a free pooled connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Postgres implementation of the storage ports
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect a pool and verify the database answers.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(StorageError::backend)?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(StorageError::backend)?;

        Ok(Self { pool })
    }

    /// Create the `users` and `apps` tables when missing.
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(StorageError::backend)?;
        Ok(())
    }

    /// Provision (or replace) an app. Administrative path, not used by the core.
    pub async fn upsert_app(&self, app: &App) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO apps (id, name, secret)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, secret = EXCLUDED.secret
            "#,
        )
        .bind(app.id)
        .bind(&app.name)
        .bind(&app.secret)
        .execute(&self.pool)
        .await
        .map_err(StorageError::backend)?;
        Ok(())
    }

    /// Wait for pooled connections to be returned, then close them
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserStore for PgStorage {
    async fn save_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        pass_hash: &[u8],
    ) -> Result<UserId, StorageError> {
        let result = ctx
            .bound(
                sqlx::query("INSERT INTO users (email, pass_hash) VALUES ($1, $2) RETURNING id")
                    .bind(email)
                    .bind(pass_hash)
                    .fetch_one(&self.pool),
            )
            .await?;

        match result {
            Ok(row) => row.try_get::<i64, _>("id").map_err(StorageError::backend),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StorageError::UserExists)
            }
            Err(e) => Err(StorageError::backend(e)),
        }
    }

    async fn user(&self, ctx: &RequestContext, email: &str) -> Result<User, StorageError> {
        let row = ctx
            .bound(
                sqlx::query("SELECT id, email, pass_hash FROM users WHERE email = $1")
                    .bind(email)
                    .fetch_optional(&self.pool),
            )
            .await?
            .map_err(StorageError::backend)?
            .ok_or(StorageError::UserNotFound)?;

        Ok(User {
            id: row.try_get("id").map_err(StorageError::backend)?,
            email: row.try_get("email").map_err(StorageError::backend)?,
            pass_hash: row.try_get("pass_hash").map_err(StorageError::backend)?,
        })
    }
}

#[async_trait]
impl AppStore for PgStorage {
    async fn app(&self, ctx: &RequestContext, app_id: AppId) -> Result<App, StorageError> {
        let row = ctx
            .bound(
                sqlx::query("SELECT id, name, secret FROM apps WHERE id = $1")
                    .bind(app_id)
                    .fetch_optional(&self.pool),
            )
            .await?
            .map_err(StorageError::backend)?
            .ok_or(StorageError::AppNotFound)?;

        Ok(App {
            id: row.try_get("id").map_err(StorageError::backend)?,
            name: row.try_get("name").map_err(StorageError::backend)?,
            secret: row.try_get("secret").map_err(StorageError::backend)?,
        })
    }
}

#[async_trait]
impl AdminFlagStore for PgStorage {
    async fn is_admin(&self, ctx: &RequestContext, user_id: UserId) -> Result<bool, StorageError> {
        let row = ctx
            .bound(
                sqlx::query("SELECT is_admin FROM users WHERE id = $1")
                    .bind(user_id)
                    .fetch_optional(&self.pool),
            )
            .await?
            .map_err(StorageError::backend)?
            .ok_or(StorageError::UserNotFound)?;

        row.try_get("is_admin").map_err(StorageError::backend)
    }
}
