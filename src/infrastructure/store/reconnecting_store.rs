//! Namespace that connects lazily and keeps retrying until it succeeds.

use super::null_store::NullStore;
use super::service::{KeyValueStore, StoreResult, WindowedDecrement};
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

type ConnectFuture = Pin<Box<dyn Future<Output = StoreResult<Arc<dyn KeyValueStore>>> + Send>>;
type Connector = Box<dyn Fn() -> ConnectFuture + Send + Sync>;

struct Slot {
    store: Option<Arc<dyn KeyValueStore>>,
    next_attempt: Option<Instant>,
}

/// A best-effort namespace whose backing connection may come up late.
///
/// Until the connector succeeds, calls go to a [`NullStore`] and the
/// connection is retried at most once per `retry_interval`. Once connected
/// the store is kept; reconnects after that are the backend's own job
/// (Redis `ConnectionManager` handles them).
pub struct ReconnectingStore {
    connector: Connector,
    retry_interval: Duration,
    slot: Mutex<Slot>,
    fallback: Arc<dyn KeyValueStore>,
}

impl ReconnectingStore {
    /// Creates a disconnected store. Nothing is attempted until the first
    /// call or [`ReconnectingStore::try_connect`].
    pub fn new<F, Fut>(retry_interval: Duration, connector: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StoreResult<Arc<dyn KeyValueStore>>> + Send + 'static,
    {
        Self {
            connector: Box::new(move || Box::pin(connector())),
            retry_interval,
            slot: Mutex::new(Slot {
                store: None,
                next_attempt: None,
            }),
            fallback: Arc::new(NullStore::new()),
        }
    }

    /// Attempts to connect now, ignoring the retry interval.
    ///
    /// # Errors
    ///
    /// Returns the connector's error; the next attempt is scheduled
    /// `retry_interval` from now.
    pub async fn try_connect(&self) -> StoreResult<()> {
        let mut slot = self.slot.lock().await;
        if slot.store.is_some() {
            return Ok(());
        }
        self.attempt(&mut slot).await.map(|_| ())
    }

    /// Returns true once a backing connection is in place.
    pub async fn is_connected(&self) -> bool {
        self.slot.lock().await.store.is_some()
    }

    async fn attempt(&self, slot: &mut Slot) -> StoreResult<Arc<dyn KeyValueStore>> {
        match (self.connector)().await {
            Ok(store) => {
                info!("Deferred store connection established");
                slot.store = Some(store.clone());
                slot.next_attempt = None;
                Ok(store)
            }
            Err(e) => {
                slot.next_attempt = Some(Instant::now() + self.retry_interval);
                Err(e)
            }
        }
    }

    async fn current(&self) -> Arc<dyn KeyValueStore> {
        let mut slot = self.slot.lock().await;
        if let Some(store) = &slot.store {
            return store.clone();
        }
        if slot.next_attempt.is_some_and(|at| Instant::now() < at) {
            return self.fallback.clone();
        }

        match self.attempt(&mut slot).await {
            Ok(store) => store,
            Err(e) => {
                warn!(
                    error = %e,
                    retry_in = ?self.retry_interval,
                    "Store still unreachable, discarding writes"
                );
                self.fallback.clone()
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for ReconnectingStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.current().await.get(key).await
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        self.current().await.set_with_ttl(key, value, ttl).await
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool> {
        self.current().await.set_if_absent(key, value, ttl).await
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        self.current().await.increment(key).await
    }

    async fn decrement(&self, key: &str) -> StoreResult<i64> {
        self.current().await.decrement(key).await
    }

    async fn time_to_live(&self, key: &str) -> StoreResult<Option<Duration>> {
        self.current().await.time_to_live(key).await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.current().await.delete(key).await
    }

    async fn decrement_within_window(
        &self,
        key: &str,
        ceiling: i64,
        window: Duration,
    ) -> StoreResult<WindowedDecrement> {
        self.current()
            .await
            .decrement_within_window(key, ceiling, window)
            .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.current().await.ping().await
    }
}
