//! Per-token click statistics.

use std::sync::Arc;

use crate::domain::entities::LinkStats;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Service combining the click counter with the state of the link.
pub struct StatsService<L: LinkRepository, C: ClickRepository> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
}

impl<L: LinkRepository, C: ClickRepository> StatsService<L, C> {
    /// Creates a new statistics service.
    pub fn new(link_repository: Arc<L>, click_repository: Arc<C>) -> Self {
        Self {
            link_repository,
            click_repository,
        }
    }

    /// Returns click statistics for `token`.
    ///
    /// Expired links keep their click count and are reported as inactive.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the token has no live link and no
    /// recorded clicks.
    pub async fn stats(&self, token: &str) -> Result<LinkStats, AppError> {
        let link = self.link_repository.find(token).await?;
        let clicks = self.click_repository.count(token).await?;

        if link.is_none() && clicks == 0 {
            return Err(AppError::not_found("Short URL not found or expired"));
        }

        Ok(LinkStats {
            token: token.to_string(),
            clicks,
            active: link.is_some(),
            expires_in: link.and_then(|l| l.expires_in),
        })
    }
}
