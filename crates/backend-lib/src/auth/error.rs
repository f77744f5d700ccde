// ============================
// sso-backend-lib/src/auth/error.rs
// ============================
//! Errors returned by the credential service.
use thiserror::Error;

use super::password::PasswordError;
use super::token::TokenError;
use crate::storage::StorageError;

/// Outcome classes of a credential operation.
///
/// The first four variants are expected, user-facing outcomes and carry no
/// detail. Everything else is tagged with the operation that failed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two are deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user already exists")]
    UserExists,

    #[error("app not found")]
    AppNotFound,

    #[error("invalid app id")]
    InvalidAppId,

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("{op}: deadline exceeded")]
    DeadlineExceeded { op: &'static str },

    #[error("{op}: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("{op}: {source}")]
    Internal {
        op: &'static str,
        #[source]
        source: InternalError,
    },
}

/// Failures of the non-storage steps
#[derive(Debug, Error)]
pub enum InternalError {
    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AuthError {
    /// Wrap an unexpected storage failure, keeping deadline expiry distinct.
    pub fn storage(op: &'static str, source: StorageError) -> Self {
        match source {
            StorageError::DeadlineExceeded(_) => AuthError::DeadlineExceeded { op },
            source => AuthError::Storage { op, source },
        }
    }

    pub fn internal(op: &'static str, source: impl Into<InternalError>) -> Self {
        AuthError::Internal {
            op,
            source: source.into(),
        }
    }

    /// Operation tag of a wrapped failure, `None` for the expected outcomes
    pub fn op(&self) -> Option<&'static str> {
        match self {
            AuthError::DeadlineExceeded { op }
            | AuthError::Storage { op, .. }
            | AuthError::Internal { op, .. } => Some(op),
            _ => None,
        }
    }
}
