// ============================
// sso-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::PasswordHasher;
use crate::storage::App;
use sso_common::AppId;

/// Prefix of environment overrides, nested keys split on `__`
/// (e.g. `SSO_AUTH__TOKEN_TTL_SECS=600`)
pub const ENV_PREFIX: &str = "SSO_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
}

/// Transport boundary settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Deadline applied to every request, in seconds
    pub request_timeout_secs: u64,
}

/// Credential core settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Lifetime of every issued token, in seconds
    pub token_ttl_secs: u64,
    /// Policy applied to new passwords at registration
    pub password_requirements: PasswordRequirements,
    pub hashing: HashingSettings,
}

/// Password complexity requirements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordRequirements {
    /// Minimum password length
    pub min_length: usize,
    /// Maximum password length
    pub max_length: usize,
    /// Require uppercase letters
    pub require_uppercase: bool,
    /// Require lowercase letters
    pub require_lowercase: bool,
    /// Require digits
    pub require_digit: bool,
    /// Require special characters
    pub require_special: bool,
}

/// scrypt cost parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashingSettings {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

/// Storage backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Required for the postgres backend
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Apps provisioned into the store at startup
    pub apps: Vec<AppSeed>,
}

/// An app provisioned from configuration
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppSeed {
    pub id: AppId,
    pub name: String,
    pub secret: String,
}

impl std::fmt::Debug for AppSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSeed")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl From<AppSeed> for App {
    fn from(seed: AppSeed) -> Self {
        App {
            id: seed.id,
            name: seed.name,
            secret: seed.secret,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 44044)),
            request_timeout_secs: 4,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_ttl_secs: 60 * 60, // 1 hour
            password_requirements: PasswordRequirements::default(),
            hashing: HashingSettings::default(),
        }
    }
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 128,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special: false,
        }
    }
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            log_n: scrypt::Params::RECOMMENDED_LOG_N,
            r: scrypt::Params::RECOMMENDED_R,
            p: scrypt::Params::RECOMMENDED_P,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            database_url: None,
            max_connections: 10,
            apps: Vec::new(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load settings from `config.toml`/`config.yaml` in the working directory and `SSO_*` env vars
    pub fn load() -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"))
            .merge(Yaml::file("config.yaml"));
        Self::extract(figment)
    }

    /// Load settings from an explicit file (TOML or YAML by extension) plus env vars
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::Invalid(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        let figment = Figment::from(Serialized::defaults(Settings::default()));
        let figment = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
            _ => figment.merge(Toml::file(path)),
        };
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let settings: Settings = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.auth.token_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "auth.token_ttl_secs must be greater than zero".to_string(),
            ));
        }

        let req = &self.auth.password_requirements;
        if req.min_length == 0 || req.min_length > req.max_length {
            return Err(ConfigError::Invalid(format!(
                "auth.password_requirements: need 0 < min_length ({}) <= max_length ({})",
                req.min_length, req.max_length
            )));
        }

        PasswordHasher::from_settings(&self.auth.hashing)
            .map_err(|e| ConfigError::Invalid(format!("auth.hashing: {e}")))?;

        if !LOG_LEVELS.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "log.level must be one of {LOG_LEVELS:?}, got {:?}",
                self.log.level
            )));
        }

        if self.storage.backend == StorageBackend::Postgres
            && self.storage.database_url.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::Invalid(
                "storage.database_url is required for the postgres backend".to_string(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_connections must be greater than zero".to_string(),
            ));
        }

        if let Some(app) = self.storage.apps.iter().find(|a| a.secret.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "storage.apps: app {} has an empty secret",
                app.id
            )));
        }

        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.token_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}
