//! Key-value store implementation of the click counter.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use crate::infrastructure::store::KeyValueStore;

/// Click counter backed by one store namespace.
///
/// Keys are tokens, values are visit counts with no TTL.
pub struct KvClickRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvClickRepository {
    /// Creates a new repository over the click namespace.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ClickRepository for KvClickRepository {
    async fn record(&self, token: &str) -> Result<i64, AppError> {
        self.store
            .increment(token)
            .await
            .map_err(|e| AppError::store("click increment", e))
    }

    async fn count(&self, token: &str) -> Result<i64, AppError> {
        let raw = self
            .store
            .get(token)
            .await
            .map_err(|e| AppError::store("click read", e))?;

        match raw {
            Some(value) => value.parse().map_err(|_| {
                AppError::internal(format!("Click counter for {} is not an integer", token))
            }),
            None => Ok(0),
        }
    }
}
