//! Background worker that applies click events to the click counter.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::ClickRepository;

/// Drains click events until every sender is dropped.
///
/// Up to `concurrency` increments are in flight at once. A failed increment
/// is logged and dropped; click counting is best-effort and never retried.
pub async fn run_click_worker<C>(
    mut rx: mpsc::Receiver<ClickEvent>,
    clicks: Arc<C>,
    concurrency: usize,
) where
    C: ClickRepository + 'static,
{
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let clicks = clicks.clone();

        tokio::spawn(async move {
            match clicks.record(&event.token).await {
                Ok(total) => debug!(token = %event.token, total, "Click recorded"),
                Err(e) => warn!(token = %event.token, error = %e, "Failed to record click"),
            }
            drop(permit);
        });
    }

    // wait for in-flight increments
    let _ = permits.acquire_many(concurrency as u32).await;

    info!("Click worker stopped");
}
