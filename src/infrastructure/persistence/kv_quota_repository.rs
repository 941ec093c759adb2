//! Key-value store implementation of the quota tracker.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{QuotaDecision, QuotaStatus};
use crate::domain::repositories::QuotaRepository;
use crate::error::AppError;
use crate::infrastructure::store::KeyValueStore;

/// Quota tracker backed by one store namespace.
///
/// Keys are client IPs, values are the requests left in the current window.
/// Window resets are store-enforced: the counter expires with the window and
/// is re-created at `ceiling` on the next request.
pub struct KvQuotaRepository {
    store: Arc<dyn KeyValueStore>,
    ceiling: i64,
    window: Duration,
}

impl KvQuotaRepository {
    /// Creates a new repository over the quota namespace.
    ///
    /// # Arguments
    ///
    /// - `ceiling` - Requests allowed per client per window
    /// - `window` - Window length; the counter's TTL
    pub fn new(store: Arc<dyn KeyValueStore>, ceiling: i64, window: Duration) -> Self {
        Self {
            store,
            ceiling,
            window,
        }
    }
}

#[async_trait]
impl QuotaRepository for KvQuotaRepository {
    async fn consume(&self, client_key: &str) -> Result<QuotaDecision, AppError> {
        let outcome = self
            .store
            .decrement_within_window(client_key, self.ceiling, self.window)
            .await
            .map_err(|e| AppError::store("quota check", e))?;

        Ok(if outcome.accepted {
            QuotaDecision::Granted {
                remaining: outcome.remaining,
                resets_in: outcome.resets_in,
            }
        } else {
            QuotaDecision::Exhausted {
                resets_in: outcome.resets_in,
            }
        })
    }

    async fn status(&self, client_key: &str) -> Result<Option<QuotaStatus>, AppError> {
        let Some(raw) = self
            .store
            .get(client_key)
            .await
            .map_err(|e| AppError::store("quota read", e))?
        else {
            return Ok(None);
        };

        let remaining = raw.parse().map_err(|_| {
            AppError::internal(format!("Quota counter for {} is not an integer", client_key))
        })?;
        let resets_in = self
            .store
            .time_to_live(client_key)
            .await
            .map_err(|e| AppError::store("quota ttl", e))?;

        Ok(Some(QuotaStatus {
            remaining,
            resets_in,
        }))
    }

    async fn reset(&self, client_key: &str) -> Result<bool, AppError> {
        self.store
            .delete(client_key)
            .await
            .map_err(|e| AppError::store("quota reset", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::MemoryStore;

    const WINDOW: Duration = Duration::from_secs(60);

    fn repo(ceiling: i64) -> KvQuotaRepository {
        KvQuotaRepository::new(Arc::new(MemoryStore::new()), ceiling, WINDOW)
    }

    #[tokio::test]
    async fn test_consume_until_exhausted() {
        let quotas = repo(2);

        assert_eq!(
            quotas.consume("1.2.3.4").await.unwrap(),
            QuotaDecision::Granted {
                remaining: 1,
                resets_in: WINDOW
            }
        );
        assert!(matches!(
            quotas.consume("1.2.3.4").await.unwrap(),
            QuotaDecision::Granted { remaining: 0, .. }
        ));
        assert!(matches!(
            quotas.consume("1.2.3.4").await.unwrap(),
            QuotaDecision::Exhausted { .. }
        ));
    }

    #[tokio::test]
    async fn test_clients_are_independent() {
        let quotas = repo(1);

        assert!(quotas.consume("1.1.1.1").await.unwrap().is_granted());
        assert!(!quotas.consume("1.1.1.1").await.unwrap().is_granted());
        assert!(quotas.consume("2.2.2.2").await.unwrap().is_granted());
    }

    #[tokio::test]
    async fn test_exhausted_counter_never_goes_negative() {
        let quotas = repo(1);

        for _ in 0..5 {
            quotas.consume("1.2.3.4").await.unwrap();
        }

        let status = quotas.status("1.2.3.4").await.unwrap().unwrap();
        assert_eq!(status.remaining, 0);
    }

    #[tokio::test]
    async fn test_status_of_unknown_client() {
        assert_eq!(repo(5).status("9.9.9.9").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reset_restores_ceiling() {
        let quotas = repo(1);
        quotas.consume("1.2.3.4").await.unwrap();

        assert!(quotas.reset("1.2.3.4").await.unwrap());
        assert!(quotas.consume("1.2.3.4").await.unwrap().is_granted());
        assert!(!quotas.reset("5.5.5.5").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_expiry_resets_quota() {
        let quotas = repo(1);

        assert!(quotas.consume("1.2.3.4").await.unwrap().is_granted());
        assert!(!quotas.consume("1.2.3.4").await.unwrap().is_granted());

        tokio::time::advance(WINDOW + Duration::from_millis(1)).await;

        assert!(quotas.consume("1.2.3.4").await.unwrap().is_granted());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_consumes_grant_exactly_the_ceiling() {
        let quotas = Arc::new(repo(3));

        let tasks: Vec<_> = (0..40)
            .map(|_| {
                let quotas = quotas.clone();
                tokio::spawn(async move { quotas.consume("1.2.3.4").await.unwrap().is_granted() })
            })
            .collect();

        let mut granted = 0;
        for task in tasks {
            if task.await.unwrap() {
                granted += 1;
            }
        }

        assert_eq!(granted, 3);
        let status = quotas.status("1.2.3.4").await.unwrap().unwrap();
        assert_eq!(status.remaining, 0);
    }
}
