//! Key-value store trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur while talking to the key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store command {command} failed: {message}")]
    Command {
        command: &'static str,
        message: String,
    },

    #[error("Store command {command} timed out after {timeout:?}")]
    Timeout {
        command: &'static str,
        timeout: Duration,
    },
}

impl StoreError {
    pub fn command(command: &'static str, message: impl Into<String>) -> Self {
        Self::Command {
            command,
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of [`KeyValueStore::decrement_within_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowedDecrement {
    /// `false` when the counter was already at zero. The counter is left unchanged.
    pub accepted: bool,
    /// Counter value after the call.
    pub remaining: i64,
    /// Time until the counter's window expires.
    pub resets_in: Duration,
}

/// A single logical namespace of the shared key-value store.
///
/// Every handle is bound to exactly one namespace (a Redis database index for
/// [`crate::infrastructure::store::RedisStore`]); keys written through one
/// handle are never visible through another.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - Redis-backed namespace
/// - [`crate::infrastructure::store::MemoryStore`] - In-process namespace for development and tests
/// - [`crate::infrastructure::store::NullStore`] - Discards writes; fallback for best-effort data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Returns `Ok(None)` when the key is absent or expired.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a value that the store removes once `ttl` elapses.
    ///
    /// Overwrites any existing value and resets its TTL.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Writes a value with a TTL only if the key does not exist yet.
    ///
    /// Returns `true` if the value was written.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool>;

    /// Atomically increments an integer counter, creating it at `1` if absent.
    ///
    /// A counter created this way has no TTL.
    async fn increment(&self, key: &str) -> StoreResult<i64>;

    /// Atomically decrements an integer counter, creating it at `-1` if absent.
    async fn decrement(&self, key: &str) -> StoreResult<i64>;

    /// Returns the remaining TTL of a key.
    ///
    /// `Ok(None)` when the key is absent or has no expiry.
    async fn time_to_live(&self, key: &str) -> StoreResult<Option<Duration>>;

    /// Removes a key. Returns `true` if it existed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Consumes one unit from a windowed counter in a single atomic step.
    ///
    /// 1. If the key is absent it is created with value `ceiling` and TTL `window`
    /// 2. The counter is decremented
    /// 3. If the result is negative the decrement is undone and the call is rejected
    ///
    /// A counter that somehow lost its TTL gets `window` re-applied, so a
    /// window can never become permanent.
    async fn decrement_within_window(
        &self,
        key: &str,
        ceiling: i64,
        window: Duration,
    ) -> StoreResult<WindowedDecrement>;

    /// Liveness probe.
    async fn ping(&self) -> StoreResult<()>;
}
