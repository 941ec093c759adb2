//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{ShortenLink, ShortenedLink};

/// Request to shorten one URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Target URL; a missing scheme is stored as `http://`. Blank values are
    /// left to the URL check so they report as an invalid URL.
    #[validate(length(max = 2048, message = "url must be at most 2048 characters"))]
    pub url: String,

    /// Optional custom token, checked against the token rules by the service.
    #[serde(default)]
    pub custom_short: Option<String>,

    /// Optional lifetime in hours; upper bound is configuration-dependent.
    #[serde(default)]
    #[validate(range(min = 1, message = "expiry must be at least 1 hour"))]
    pub expiry: Option<u32>,
}

impl From<ShortenRequest> for ShortenLink {
    fn from(request: ShortenRequest) -> Self {
        Self {
            url: request.url,
            // an empty string means no custom token
            custom_token: request.custom_short.filter(|s| !s.is_empty()),
            expiry_hours: request.expiry,
        }
    }
}

/// Successful shortening response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    #[serde(rename = "shortUrl")]
    pub short_url: String,
    /// Requests left in the current quota window.
    pub rate_remaining: i64,
    /// Minutes until the quota window resets.
    pub time_remaining: u64,
}

impl From<ShortenedLink> for ShortenResponse {
    fn from(link: ShortenedLink) -> Self {
        Self {
            short_url: link.short_url,
            rate_remaining: link.rate_remaining,
            time_remaining: link.time_remaining,
        }
    }
}
