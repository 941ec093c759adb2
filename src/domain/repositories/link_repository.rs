//! Repository trait for the link table.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for token → target mappings.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::KvLinkRepository`] - Key-value store implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Writes a link unless its token is already in use.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the link was written
    /// - `Ok(false)` if a live link already holds the token
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on store failures.
    async fn insert(&self, new_link: &NewLink) -> Result<bool, AppError>;

    /// Looks up the target URL for a token.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(target))` while the link is live
    /// - `Ok(None)` if the token was never written or has expired
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on store failures.
    async fn find_target(&self, token: &str) -> Result<Option<String>, AppError>;

    /// Looks up a link together with its remaining TTL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on store failures.
    async fn find(&self, token: &str) -> Result<Option<Link>, AppError>;
}
