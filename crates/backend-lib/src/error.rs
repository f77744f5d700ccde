// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::AuthError;
use crate::validation::ValidationError;
use sso_common::{ErrorBody, ErrorDetail};

/// Transport-level error with a stable status and error code
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    UserExists,

    #[error("App not found")]
    AppNotFound,

    #[error("Invalid app ID")]
    InvalidAppId,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::UserExists => StatusCode::CONFLICT,
            AppError::AppNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidAppId | AppError::InvalidInput(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            },
            AppError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "AUTH_001",
            AppError::UserExists => "USER_001",
            AppError::AppNotFound => "APP_001",
            AppError::InvalidAppId => "APP_002",
            AppError::InvalidInput(_) | AppError::Validation(_) => "VAL_001",
            AppError::DeadlineExceeded(_) => "TIME_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::UserExists => "User already exists".to_string(),
            AppError::AppNotFound => "App not found".to_string(),
            AppError::InvalidAppId => "Invalid app ID".to_string(),
            AppError::InvalidInput(_) => "Invalid request format".to_string(),
            AppError::Validation(e) => e.to_string(),
            AppError::DeadlineExceeded(_) => "Request timed out".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }

    fn body(&self) -> ErrorBody {
        // Op tags and internal detail never leave the process, debug build or not
        let hide_detail = matches!(self, AppError::Internal(_) | AppError::DeadlineExceeded(_));
        let message = if cfg!(debug_assertions) && !hide_detail {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        ErrorBody {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), axum::Json(self.body())).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::UserExists => AppError::UserExists,
            AuthError::AppNotFound => AppError::AppNotFound,
            AuthError::InvalidAppId => AppError::InvalidAppId,
            AuthError::InvalidArgument(field) => {
                AppError::InvalidInput(format!("{field} is required"))
            },
            AuthError::DeadlineExceeded { op } => AppError::DeadlineExceeded(op),
            err @ (AuthError::Storage { .. } | AuthError::Internal { .. }) => {
                AppError::Internal(err.to_string())
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}
