// ======================================
// tests/integration/concurrency_tests.rs
// ======================================
//! Concurrent requests against one router.
use axum::http::StatusCode;
use futures_util::future::join_all;

use crate::test_utils::{setup_test_app, APP_ID};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_of_one_email_have_single_winner() {
    let app = setup_test_app();

    let attempts = (0..8).map(|_| app.register("race@x.com", "secret1"));
    let results = join_all(attempts).await;

    let winners = results.iter().filter(|(s, _)| *s == StatusCode::OK).count();
    let conflicts = results
        .iter()
        .filter(|(s, _)| *s == StatusCode::CONFLICT)
        .count();
    assert_eq!(winners, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(app.storage.user_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_registrations_get_distinct_ids() {
    let app = setup_test_app();

    let emails: Vec<String> = (0..10).map(|i| format!("user{i}@x.com")).collect();
    let results = join_all(emails.iter().map(|e| app.register(e, "secret1"))).await;

    let mut ids: Vec<i64> = results
        .iter()
        .map(|(status, body)| {
            assert_eq!(*status, StatusCode::OK);
            body["user_id"].as_i64().unwrap()
        })
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);

    let logins = join_all(emails.iter().map(|e| app.login(e, "secret1", APP_ID))).await;
    assert!(logins.iter().all(|(status, _)| *status == StatusCode::OK));
}
