//! Per-token traffic statistics.

use std::time::Duration;

/// Click count for a token together with the state of its link.
///
/// Click counters outlive their links, so `active` can be `false` while
/// `clicks` is still positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub token: String,
    pub clicks: i64,
    pub active: bool,
    pub expires_in: Option<Duration>,
}
