//! Repository trait for per-client quota counters.

use crate::domain::entities::{QuotaDecision, QuotaStatus};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the quota tracker.
///
/// Each client key maps to a counter that starts at the configured ceiling,
/// loses one unit per accepted request, and is reset by expiry at the end of
/// its window.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuotaRepository: Send + Sync {
    /// Consumes one unit of the client's quota in a single atomic step.
    ///
    /// Returns [`QuotaDecision::Exhausted`] without consuming anything when
    /// the counter is already at zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on store failures.
    async fn consume(&self, client_key: &str) -> Result<QuotaDecision, AppError>;

    /// Reads a client's counter without modifying it.
    ///
    /// Returns `Ok(None)` if the client has no counter in the current window.
    async fn status(&self, client_key: &str) -> Result<Option<QuotaStatus>, AppError>;

    /// Drops a client's counter so the next request starts a fresh window.
    ///
    /// Returns `true` if a counter existed.
    async fn reset(&self, client_key: &str) -> Result<bool, AppError>;
}
