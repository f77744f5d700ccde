// ==============
// sso-backend-lib/src/metrics.rs

//! Central place for metric keys
pub const REGISTER_SUCCEEDED: &str = "auth.register.succeeded";
pub const REGISTER_REJECTED: &str = "auth.register.rejected";
pub const LOGIN_SUCCEEDED: &str = "auth.login.succeeded";
pub const LOGIN_REJECTED: &str = "auth.login.rejected";
pub const ADMIN_CHECKED: &str = "auth.is_admin.checked";
pub const INTERNAL_FAILURE: &str = "auth.internal_failure";
