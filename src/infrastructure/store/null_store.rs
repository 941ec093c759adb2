//! No-op store namespace for best-effort data.

use super::service::{KeyValueStore, StoreResult, WindowedDecrement};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A namespace that stores nothing.
///
/// Used for the click counter when its Redis database cannot be reached at
/// startup: redirects keep working, clicks are simply not counted.
/// Reads behave as if every key were absent.
pub struct NullStore;

impl NullStore {
    /// Creates a new NullStore instance.
    pub fn new() -> Self {
        debug!("Using NullStore (writes are discarded)");
        Self
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for NullStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Ok(None)
    }

    async fn set_with_ttl(&self, _key: &str, _value: &str, _ttl: Duration) -> StoreResult<()> {
        Ok(())
    }

    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> StoreResult<bool> {
        Ok(true)
    }

    async fn increment(&self, _key: &str) -> StoreResult<i64> {
        Ok(0)
    }

    async fn decrement(&self, _key: &str) -> StoreResult<i64> {
        Ok(0)
    }

    async fn time_to_live(&self, _key: &str) -> StoreResult<Option<Duration>> {
        Ok(None)
    }

    async fn delete(&self, _key: &str) -> StoreResult<bool> {
        Ok(false)
    }

    async fn decrement_within_window(
        &self,
        _key: &str,
        ceiling: i64,
        window: Duration,
    ) -> StoreResult<WindowedDecrement> {
        Ok(WindowedDecrement {
            accepted: true,
            remaining: ceiling,
            resets_in: window,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
