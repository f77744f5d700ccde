// ============================
// sso-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Params, Scrypt,
};
use thiserror::Error;
use zeroize::Zeroize;

use crate::config::HashingSettings;

/// Upper bound on scrypt scratch memory per hash (1 GiB)
pub const MAX_HASH_MEMORY: u64 = 1 << 30;

/// Errors raised while hashing
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid scrypt parameters: {0}")]
    InvalidParams(String),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Salted, cost-parameterized scrypt hasher.
///
/// Hashes are stored as PHC strings so the parameters travel with the hash and
/// verification keeps working after the configured cost changes.
#[derive(Clone, Copy)]
pub struct PasswordHasher {
    params: Params,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("log_n", &self.params.log_n())
            .field("r", &self.params.r())
            .field("p", &self.params.p())
            .finish()
    }
}

impl PasswordHasher {
    /// Build a hasher from the configured cost parameters.
    ///
    /// Costs whose scratch memory (`128 * r * 2^log_n` bytes) exceeds
    /// [`MAX_HASH_MEMORY`] are rejected.
    pub fn from_settings(settings: &HashingSettings) -> Result<Self, PasswordError> {
        let within_budget = settings.log_n < 64
            && (128 * u128::from(settings.r)) << settings.log_n <= u128::from(MAX_HASH_MEMORY);
        if !within_budget {
            return Err(PasswordError::InvalidParams(format!(
                "log_n={} r={} needs more than {} MiB of memory per hash",
                settings.log_n,
                settings.r,
                MAX_HASH_MEMORY >> 20
            )));
        }

        let params = Params::new(settings.log_n, settings.r, settings.p, Params::RECOMMENDED_LEN)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, plain: &str) -> Result<Vec<u8>, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?
            .to_string();
        Ok(hash.into_bytes())
    }

    /// Verify a password against a stored hash.
    ///
    /// The digest comparison is constant-time. A malformed stored hash never matches.
    pub fn verify(&self, hash: &[u8], plain: &str) -> bool {
        let Ok(encoded) = std::str::from_utf8(hash) else {
            return false;
        };
        let parsed_hash = match PasswordHash::new(encoded) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }

    /// Hash on the blocking pool and zeroize the moved-in password afterwards
    pub async fn hash_blocking(&self, mut plain: String) -> Result<Vec<u8>, PasswordError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || {
            let hash = hasher.hash(&plain);
            plain.zeroize();
            hash
        })
        .await?
    }

    /// Verify on the blocking pool and zeroize the moved-in password afterwards
    pub async fn verify_blocking(&self, hash: Vec<u8>, mut plain: String) -> Result<bool, PasswordError> {
        let hasher = *self;
        let matched = tokio::task::spawn_blocking(move || {
            let matched = hasher.verify(&hash, &plain);
            plain.zeroize();
            matched
        })
        .await?;
        Ok(matched)
    }
}
