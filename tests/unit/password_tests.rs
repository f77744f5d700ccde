// ============================
// tests/unit/password_tests.rs
// ============================
//! Unit tests for the password hasher's public API
use sso_backend_lib::auth::PasswordHasher;
use sso_backend_lib::config::HashingSettings;

fn hasher() -> PasswordHasher {
    PasswordHasher::from_settings(&HashingSettings { log_n: 4, r: 8, p: 1 }).unwrap()
}

#[test]
fn test_hash_and_verify() {
    let hasher = hasher();
    let hash = hasher.hash("correct horse").unwrap();

    assert!(hasher.verify(&hash, "correct horse"));
    assert!(!hasher.verify(&hash, "Correct horse"));
}

#[test]
fn test_default_hasher_uses_recommended_cost() {
    let settings = HashingSettings::default();
    assert_eq!(settings.log_n, 17);
    assert!(PasswordHasher::from_settings(&settings).is_ok());
}

#[tokio::test]
async fn test_blocking_hash_verifies_synchronously() {
    let hasher = hasher();
    let hash = hasher.hash_blocking("secret1".to_string()).await.unwrap();
    assert!(hasher.verify(&hash, "secret1"));
}
