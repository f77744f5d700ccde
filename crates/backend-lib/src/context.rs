// ============================
// sso-backend-lib/src/context.rs
// ============================
//! Per-request deadline carried from the boundary down to the storage ports.
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// The request deadline passed before the operation finished.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("deadline exceeded")]
pub struct DeadlineExceeded;

/// Context of a single core call.
///
/// Every `AuthService` operation and every storage port call receives one.
/// A context without a deadline never expires.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Context with no deadline
    pub fn background() -> Self {
        Self { deadline: None }
    }

    /// Context expiring `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Context expiring at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.deadline, Some(d) if Instant::now() >= d)
    }

    /// Fail fast when the deadline has already passed.
    pub fn check(&self) -> Result<(), DeadlineExceeded> {
        if self.is_expired() {
            return Err(DeadlineExceeded);
        }
        Ok(())
    }

    /// Run `fut` but give up once the deadline passes.
    ///
    /// An already-expired context returns without polling `fut`.
    pub async fn bound<F: Future>(&self, fut: F) -> Result<F::Output, DeadlineExceeded> {
        self.check()?;
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| DeadlineExceeded),
            None => Ok(fut.await),
        }
    }
}
