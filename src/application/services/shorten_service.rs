//! Link creation: validation, quota accounting and the link table write.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use crate::config::ShortenerSettings;
use crate::domain::entities::{NewLink, QuotaDecision};
use crate::domain::repositories::{LinkRepository, QuotaRepository};
use crate::error::AppError;
use crate::utils::code_generator::{generate_token, validate_custom_token};
use crate::utils::time::whole_minutes;
use crate::utils::url_normalizer::normalize_url;

/// Attempts at finding a free generated token before giving up.
const MAX_TOKEN_ATTEMPTS: usize = 5;

/// A shortening request after body parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortenLink {
    pub url: String,
    pub custom_token: Option<String>,
    /// Link lifetime in hours; the configured default applies when `None`.
    pub expiry_hours: Option<u32>,
}

/// Result of a successful shortening request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedLink {
    pub token: String,
    pub short_url: String,
    /// Requests left for this client in the current window.
    pub rate_remaining: i64,
    /// Minutes until the client's window resets.
    pub time_remaining: u64,
}

/// Service for creating short links on behalf of rate-limited clients.
///
/// # Request Flow
///
/// 1. Validate the target URL, custom token and expiry (no quota consumed)
/// 2. Derive the client key from the caller's address
/// 3. Consume one unit of quota atomically; stop with `503` when exhausted
/// 4. Write the link with create-if-absent semantics
///
/// Quota consumed in step 3 is not refunded if step 4 fails.
pub struct ShortenService<L: LinkRepository, Q: QuotaRepository> {
    link_repository: Arc<L>,
    quota_repository: Arc<Q>,
    domain: String,
    default_expiry_hours: u32,
    max_expiry_hours: u32,
}

impl<L: LinkRepository, Q: QuotaRepository> ShortenService<L, Q> {
    /// Creates a new shortening service.
    pub fn new(
        link_repository: Arc<L>,
        quota_repository: Arc<Q>,
        settings: &ShortenerSettings,
    ) -> Self {
        Self {
            link_repository,
            quota_repository,
            domain: settings.domain.trim_end_matches('/').to_string(),
            default_expiry_hours: settings.default_expiry_hours,
            max_expiry_hours: settings.max_expiry_hours,
        }
    }

    /// Creates a short link for `client_ip`.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] for a malformed URL, custom token or expiry
    /// - [`AppError::ClientIdentification`] when `client_ip` is `None`
    /// - [`AppError::RateLimitExceeded`] when the client's quota is used up
    /// - [`AppError::Conflict`] when the custom token is already taken
    /// - [`AppError::Store`] on store failures
    /// - [`AppError::Internal`] when no free token was found
    pub async fn shorten(
        &self,
        request: ShortenLink,
        client_ip: Option<IpAddr>,
    ) -> Result<ShortenedLink, AppError> {
        let target = normalize_url(&request.url).map_err(|_| AppError::invalid_url())?;

        if let Some(custom) = request.custom_token.as_deref() {
            validate_custom_token(custom)?;
        }
        let ttl = self.expiry(request.expiry_hours)?;

        let client_key = client_ip
            .map(|ip| ip.to_string())
            .ok_or_else(|| AppError::client_identification("Unable to parse IP"))?;

        let (rate_remaining, resets_in) = match self.quota_repository.consume(&client_key).await? {
            QuotaDecision::Granted {
                remaining,
                resets_in,
            } => (remaining, resets_in),
            QuotaDecision::Exhausted { resets_in } => {
                warn!(client = %client_key, resets_in_secs = resets_in.as_secs(), "Quota exhausted");
                return Err(AppError::rate_limited(resets_in));
            }
        };

        let token = match request.custom_token {
            Some(custom) => self.write_custom(custom, target, ttl).await?,
            None => self.write_generated(target, ttl).await?,
        };

        info!(token = %token, client = %client_key, rate_remaining, "Link created");

        Ok(ShortenedLink {
            short_url: format!("{}/{}", self.domain, token),
            token,
            rate_remaining,
            time_remaining: whole_minutes(resets_in),
        })
    }

    fn expiry(&self, hours: Option<u32>) -> Result<Duration, AppError> {
        let hours = hours.unwrap_or(self.default_expiry_hours);

        if !(1..=self.max_expiry_hours).contains(&hours) {
            return Err(AppError::bad_request(
                format!("Expiry must be between 1 and {} hours", self.max_expiry_hours),
                json!({ "expiry": hours }),
            ));
        }

        Ok(Duration::from_secs(u64::from(hours) * 3600))
    }

    async fn write_custom(
        &self,
        token: String,
        target: String,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let new_link = NewLink { token, target, ttl };

        if !self.link_repository.insert(&new_link).await? {
            return Err(AppError::conflict(
                "Custom short is already in use",
                json!({ "custom_short": new_link.token }),
            ));
        }

        Ok(new_link.token)
    }

    /// Writes the link under a fresh random token, retrying on collision.
    async fn write_generated(&self, target: String, ttl: Duration) -> Result<String, AppError> {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let new_link = NewLink {
                token: generate_token()?,
                target: target.clone(),
                ttl,
            };

            if self.link_repository.insert(&new_link).await? {
                return Ok(new_link.token);
            }

            warn!(token = %new_link.token, attempt, "Generated token collided");
        }

        Err(AppError::internal(format!(
            "Failed to find a free token after {} attempts",
            MAX_TOKEN_ATTEMPTS
        )))
    }
}
