// ============================
// sso-backend-lib/src/auth/token.rs
// ============================
/** App-scoped session tokens.
A token is a stateless HS256 JWT signed with the secret of the app it was
issued for. Nothing is stored server-side; this module only issues tokens. */
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{App, User};
use sso_common::{AppId, UserId};

/// Claims carried by every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the user id
    pub sub: UserId,
    pub email: String,
    pub app_id: AppId,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, `iat + ttl`
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("app {0} has no signing secret")]
    EmptySecret(AppId),

    #[error("token ttl is out of range")]
    InvalidTtl,

    #[error("failed to sign token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

/** Build the claim set for `user` on `app`, issued at `now`
# Arguments
* `ttl` - Lifetime added to `now` to produce `exp` */
pub fn session_claims(
    user: &User,
    app: &App,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<SessionClaims, TokenError> {
    let ttl = chrono::Duration::from_std(ttl).map_err(|_| TokenError::InvalidTtl)?;
    let expires_at = now.checked_add_signed(ttl).ok_or(TokenError::InvalidTtl)?;

    Ok(SessionClaims {
        sub: user.id,
        email: user.email.clone(),
        app_id: app.id,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    })
}

/// Issue a signed token that expires `ttl` from now
pub fn issue_token(user: &User, app: &App, ttl: Duration) -> Result<String, TokenError> {
    issue_token_at(user, app, ttl, Utc::now())
}

/** Issue a signed token as if the current time were `now`
Identical inputs produce identical tokens. */
pub fn issue_token_at(
    user: &User,
    app: &App,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    if app.secret.is_empty() {
        return Err(TokenError::EmptySecret(app.id));
    }

    let claims = session_claims(user, app, ttl, now)?;
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(app.secret.as_bytes()),
    )?;
    Ok(token)
}
