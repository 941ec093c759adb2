//! In-process key-value store namespace.

use super::service::{KeyValueStore, StoreError, StoreResult, WindowedDecrement};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// A namespace held in process memory.
///
/// Mirrors the Redis semantics the services rely on: lazy TTL expiry, integer
/// counters stored as strings, and atomic read-modify-write under one lock.
/// Time is read from `tokio::time`, so paused-clock tests can advance it.
///
/// Data is lost on restart; intended for development (`STORE_BACKEND=memory`)
/// and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::command("LOCK", "memory store lock poisoned"))
    }

    /// Returns the live entry for `key`, evicting it first if it has expired.
    fn live<'a>(
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
        now: Instant,
    ) -> Option<&'a mut Entry> {
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }

    fn add(&self, command: &'static str, key: &str, delta: i64) -> StoreResult<i64> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        match Self::live(&mut entries, key, now) {
            Some(entry) => {
                let current: i64 = entry.value.parse().map_err(|_| {
                    StoreError::command(command, "value is not an integer or out of range")
                })?;
                let next = current
                    .checked_add(delta)
                    .ok_or_else(|| StoreError::command(command, "increment would overflow"))?;
                entry.value = next.to_string();
                Ok(next)
            }
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: delta.to_string(),
                        expires_at: None,
                    },
                );
                Ok(delta)
            }
        }
    }
}

fn positive_ttl(command: &'static str, ttl: Duration) -> StoreResult<Duration> {
    if ttl.is_zero() {
        return Err(StoreError::command(command, "TTL must be positive"));
    }
    Ok(ttl)
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        Ok(Self::live(&mut entries, key, now).map(|e| e.value.clone()))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let ttl = positive_ttl("SET", ttl)?;
        let now = Instant::now();
        self.lock()?.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(now + ttl),
            },
        );
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool> {
        let ttl = positive_ttl("SET NX", ttl)?;
        let now = Instant::now();
        let mut entries = self.lock()?;

        if Self::live(&mut entries, key, now).is_some() {
            return Ok(false);
        }

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(now + ttl),
            },
        );
        Ok(true)
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        self.add("INCR", key, 1)
    }

    async fn decrement(&self, key: &str) -> StoreResult<i64> {
        self.add("DECR", key, -1)
    }

    async fn time_to_live(&self, key: &str) -> StoreResult<Option<Duration>> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        Ok(Self::live(&mut entries, key, now)
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now)))
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        let existed = Self::live(&mut entries, key, now).is_some();
        entries.remove(key);
        Ok(existed)
    }

    async fn decrement_within_window(
        &self,
        key: &str,
        ceiling: i64,
        window: Duration,
    ) -> StoreResult<WindowedDecrement> {
        let window = positive_ttl("EVALSHA", window)?;
        let now = Instant::now();
        let mut entries = self.lock()?;

        if Self::live(&mut entries, key, now).is_none() {
            entries.insert(
                key.to_string(),
                Entry {
                    value: ceiling.to_string(),
                    expires_at: Some(now + window),
                },
            );
        }
        let entry = entries
            .get_mut(key)
            .ok_or_else(|| StoreError::command("EVALSHA", "counter vanished"))?;

        let current: i64 = entry.value.parse().map_err(|_| {
            StoreError::command("EVALSHA", "value is not an integer or out of range")
        })?;
        let expires_at = *entry.expires_at.get_or_insert(now + window);
        let resets_in = expires_at.saturating_duration_since(now);

        if current <= 0 {
            return Ok(WindowedDecrement {
                accepted: false,
                remaining: current,
                resets_in,
            });
        }

        let remaining = current - 1;
        entry.value = remaining.to_string();

        Ok(WindowedDecrement {
            accepted: true,
            remaining,
            resets_in,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_with_ttl_then_get() {
        let store = MemoryStore::new();
        store.set_with_ttl("k", "v", HOUR).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
        assert!(store.time_to_live("k").await.unwrap().unwrap() <= HOUR);
    }

    #[tokio::test]
    async fn test_zero_ttl_rejected() {
        let store = MemoryStore::new();
        assert!(store.set_with_ttl("k", "v", Duration::ZERO).await.is_err());
        assert!(store.set_if_absent("k", "v", Duration::ZERO).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let store = MemoryStore::new();
        store
            .set_with_ttl("k", "v", Duration::from_secs(1))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(store.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.time_to_live("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_if_absent_does_not_overwrite() {
        let store = MemoryStore::new();

        assert!(store.set_if_absent("k", "first", HOUR).await.unwrap());
        assert!(!store.set_if_absent("k", "second", HOUR).await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), Some("first".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_if_absent_succeeds_after_expiry() {
        let store = MemoryStore::new();
        store
            .set_if_absent("k", "old", Duration::from_secs(1))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(store.set_if_absent("k", "new", HOUR).await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_increment_creates_counter_without_ttl() {
        let store = MemoryStore::new();

        assert_eq!(store.increment("c").await.unwrap(), 1);
        assert_eq!(store.increment("c").await.unwrap(), 2);
        assert_eq!(store.time_to_live("c").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_decrement() {
        let store = MemoryStore::new();

        assert_eq!(store.decrement("c").await.unwrap(), -1);
        store.set_with_ttl("d", "5", HOUR).await.unwrap();
        assert_eq!(store.decrement("d").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_increment_non_integer_fails() {
        let store = MemoryStore::new();
        store.set_with_ttl("k", "abc", HOUR).await.unwrap();

        assert!(store.increment("k").await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        store.set_with_ttl("k", "v", HOUR).await.unwrap();

        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_windowed_decrement_initializes_and_floors() {
        let store = MemoryStore::new();
        let window = Duration::from_secs(60);

        let first = store.decrement_within_window("ip", 2, window).await.unwrap();
        assert!(first.accepted);
        assert_eq!(first.remaining, 1);
        assert!(first.resets_in <= window);

        let second = store.decrement_within_window("ip", 2, window).await.unwrap();
        assert!(second.accepted);
        assert_eq!(second.remaining, 0);

        let third = store.decrement_within_window("ip", 2, window).await.unwrap();
        assert!(!third.accepted);
        assert_eq!(third.remaining, 0);

        assert_eq!(store.get("ip").await.unwrap(), Some("0".to_string()));
    }

    #[tokio::test]
    async fn test_windowed_decrement_zero_ceiling_rejects() {
        let store = MemoryStore::new();

        let result = store
            .decrement_within_window("ip", 0, Duration::from_secs(60))
            .await
            .unwrap();

        assert!(!result.accepted);
        assert_eq!(result.remaining, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_windowed_decrement_resets_after_window() {
        let store = MemoryStore::new();
        let window = Duration::from_secs(60);

        store.decrement_within_window("ip", 1, window).await.unwrap();
        let rejected = store.decrement_within_window("ip", 1, window).await.unwrap();
        assert!(!rejected.accepted);

        tokio::time::advance(window).await;

        let fresh = store.decrement_within_window("ip", 1, window).await.unwrap();
        assert!(fresh.accepted);
        assert_eq!(fresh.remaining, 0);
        assert_eq!(fresh.resets_in, window);
    }

    #[tokio::test]
    async fn test_windowed_decrement_restores_missing_ttl() {
        let store = MemoryStore::new();
        let window = Duration::from_secs(60);

        // counter created by a plain INCR has no expiry
        store.increment("ip").await.unwrap();

        let result = store.decrement_within_window("ip", 5, window).await.unwrap();
        assert!(result.accepted);
        assert_eq!(result.remaining, 0);
        assert_eq!(result.resets_in, window);
        assert!(store.time_to_live("ip").await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_decrement_within_window_concurrent_callers() {
        let store = Arc::new(MemoryStore::new());
        let window = Duration::from_secs(60);

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .decrement_within_window("ip", 5, window)
                        .await
                        .unwrap()
                        .accepted
                })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            if task.await.unwrap() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 5);
        assert_eq!(store.get("ip").await.unwrap(), Some("0".to_string()));
    }
}
