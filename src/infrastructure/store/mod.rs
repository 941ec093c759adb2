//! Key-value store namespaces.
//!
//! Provides a [`KeyValueStore`] trait with three implementations:
//! - [`RedisStore`] - Production Redis-backed namespace (one database index each)
//! - [`MemoryStore`] - In-process namespace with the same TTL semantics
//! - [`NullStore`] - No-op namespace for best-effort data
//!
//! [`ReconnectingStore`] wraps a connector for a namespace that may be down
//! at startup, standing in with a [`NullStore`] until it connects.
//!
//! [`StoreNamespaces`] bundles the three handles the service needs.

mod memory_store;
mod null_store;
mod reconnecting_store;
mod redis_store;
mod service;

pub use memory_store::MemoryStore;
pub use null_store::NullStore;
pub use reconnecting_store::ReconnectingStore;
pub use redis_store::RedisStore;
pub use service::{KeyValueStore, StoreError, StoreResult, WindowedDecrement};

#[cfg(test)]
pub use service::MockKeyValueStore;

use std::sync::Arc;

/// The three logically separate namespaces of the shared store.
#[derive(Clone)]
pub struct StoreNamespaces {
    /// token → target URL, TTL-bound
    pub links: Arc<dyn KeyValueStore>,
    /// client IP → remaining quota, TTL-bound to the quota window
    pub quotas: Arc<dyn KeyValueStore>,
    /// token → click count, no TTL
    pub clicks: Arc<dyn KeyValueStore>,
}

impl StoreNamespaces {
    /// Three independent in-memory namespaces.
    pub fn in_memory() -> Self {
        Self {
            links: Arc::new(MemoryStore::new()),
            quotas: Arc::new(MemoryStore::new()),
            clicks: Arc::new(MemoryStore::new()),
        }
    }
}
