// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation module.

use crate::config::PasswordRequirements;
use regex::Regex;
use sso_common::{AppId, LoginRequest, RegisterRequest, UserId};
use std::sync::LazyLock;
use thiserror::Error;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex compiles")
});

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid app ID: must be a positive integer")]
    InvalidAppId,

    #[error("Invalid user ID: must be a positive integer")]
    InvalidUserId,
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email address is required".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email address cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Invalid email address format".to_string(),
        ));
    }

    Ok(email)
}

/// Check that a password was supplied at all
pub fn require_password(password: &str) -> ValidationResult<&str> {
    if password.is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password is required".to_string(),
        ));
    }
    Ok(password)
}

/// Validate a new password against the configured requirements
pub fn validate_password<'a>(
    password: &'a str,
    requirements: &PasswordRequirements,
) -> ValidationResult<&'a str> {
    require_password(password)?;

    let length = password.chars().count();
    if length < requirements.min_length {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at least {} characters",
            requirements.min_length
        )));
    }

    if length > requirements.max_length {
        return Err(ValidationError::InvalidPassword(format!(
            "Password cannot exceed {} characters",
            requirements.max_length
        )));
    }

    if requirements.require_uppercase && !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain an uppercase letter".to_string(),
        ));
    }

    if requirements.require_lowercase && !password.chars().any(char::is_lowercase) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain a lowercase letter".to_string(),
        ));
    }

    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain a digit".to_string(),
        ));
    }

    if requirements.require_special && password.chars().all(char::is_alphanumeric) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain a special character".to_string(),
        ));
    }

    Ok(password)
}

pub fn validate_app_id(app_id: AppId) -> ValidationResult<AppId> {
    if app_id <= 0 {
        return Err(ValidationError::InvalidAppId);
    }
    Ok(app_id)
}

pub fn validate_user_id(user_id: UserId) -> ValidationResult<UserId> {
    if user_id <= 0 {
        return Err(ValidationError::InvalidUserId);
    }
    Ok(user_id)
}

/// Validate a registration request
pub fn validate_register_request(
    request: &RegisterRequest,
    requirements: &PasswordRequirements,
) -> ValidationResult<()> {
    validate_email(&request.email)?;
    validate_password(&request.password, requirements)?;
    Ok(())
}

/// Validate a login request.
///
/// The password policy is not applied here: it may have changed since the
/// account was created.
pub fn validate_login_request(request: &LoginRequest) -> ValidationResult<()> {
    validate_email(&request.email)?;
    require_password(&request.password)?;
    validate_app_id(request.app_id)?;
    Ok(())
}
