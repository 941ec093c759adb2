//! Repository trait for per-token click counters.

use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the click counter.
///
/// Counters are created lazily, never expire, and are not removed when their
/// link expires.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Adds one click and returns the new total.
    async fn record(&self, token: &str) -> Result<i64, AppError>;

    /// Returns the total clicks for a token, `0` if none were recorded.
    async fn count(&self, token: &str) -> Result<i64, AppError>;
}
