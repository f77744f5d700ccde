// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Loading settings from explicit files
use std::io::Write;

use sso_backend_lib::config::{ConfigError, Settings, StorageBackend};
use tempfile::Builder;

#[test]
fn test_load_from_toml_file() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[server]
bind_addr = "127.0.0.1:50051"
request_timeout_secs = 2

[storage]
backend = "memory"

[[storage.apps]]
id = 1
name = "portal"
secret = "portal-secret"
"#
    )
    .unwrap();

    let settings = Settings::load_from(file.path()).unwrap();
    assert_eq!(settings.server.bind_addr.port(), 50051);
    assert_eq!(settings.request_timeout().as_secs(), 2);
    assert_eq!(settings.storage.backend, StorageBackend::Memory);
    assert_eq!(settings.storage.apps[0].name, "portal");
}

#[test]
fn test_load_from_rejects_invalid_file() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[storage]\nbackend = \"postgres\"").unwrap();

    let err = Settings::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_load_from_rejects_malformed_file() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[auth]\ntoken_ttl_secs = \"forever\"").unwrap();

    let err = Settings::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}
