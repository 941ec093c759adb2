//! DTOs for link statistics endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::entities::LinkStats;

/// Click statistics for a single token.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub token: String,
    pub clicks: i64,
    /// Whether the link still redirects.
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<u64>,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            token: stats.token,
            clicks: stats.clicks,
            active: stats.active,
            expires_in_seconds: stats.expires_in.map(|d| d.as_secs()),
        }
    }
}
