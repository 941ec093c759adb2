//! Key-value store implementation of the link table.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::store::KeyValueStore;

/// Link table backed by one store namespace.
///
/// Keys are tokens, values are target URLs, and every entry carries the TTL
/// requested at creation time.
pub struct KvLinkRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvLinkRepository {
    /// Creates a new repository over the link namespace.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LinkRepository for KvLinkRepository {
    async fn insert(&self, new_link: &NewLink) -> Result<bool, AppError> {
        let written = self
            .store
            .set_if_absent(&new_link.token, &new_link.target, new_link.ttl)
            .await
            .map_err(|e| AppError::store("link write", e))?;

        debug!(token = %new_link.token, written, "Link insert");
        Ok(written)
    }

    async fn find_target(&self, token: &str) -> Result<Option<String>, AppError> {
        self.store
            .get(token)
            .await
            .map_err(|e| AppError::store("link lookup", e))
    }

    async fn find(&self, token: &str) -> Result<Option<Link>, AppError> {
        let Some(target) = self.find_target(token).await? else {
            return Ok(None);
        };

        let expires_in = self
            .store
            .time_to_live(token)
            .await
            .map_err(|e| AppError::store("link ttl", e))?;

        Ok(Some(Link::new(token.to_string(), target, expires_in)))
    }
}
