//! Token resolution for the redirect path.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Service that turns a token into its target URL and queues a click.
///
/// Click counting never delays or fails a redirect: events are handed to
/// the click worker with a non-blocking send and dropped if the queue is
/// full or closed.
pub struct ResolveService<L: LinkRepository> {
    link_repository: Arc<L>,
    click_sender: mpsc::Sender<ClickEvent>,
}

impl<L: LinkRepository> ResolveService<L> {
    /// Creates a new resolution service.
    pub fn new(link_repository: Arc<L>, click_sender: mpsc::Sender<ClickEvent>) -> Self {
        Self {
            link_repository,
            click_sender,
        }
    }

    /// Resolves `token` to its target URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the token is unknown or expired.
    /// Returns [`AppError::Store`] if the link table cannot be read.
    pub async fn resolve(&self, token: &str) -> Result<String, AppError> {
        let target = self
            .link_repository
            .find_target(token)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found or expired"))?;

        self.record_click(token);

        Ok(target)
    }

    fn record_click(&self, token: &str) {
        match self.click_sender.try_send(ClickEvent::new(token)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!(token = %event.token, "Click queue full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                warn!(token = %event.token, "Click queue closed, dropping event");
            }
        }
    }
}
