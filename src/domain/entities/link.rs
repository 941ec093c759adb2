//! Link entity representing a token → target mapping.

use std::time::Duration;

/// A live entry of the link table.
///
/// Links are write-once: there is no update operation, and the store removes
/// the entry once its TTL elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub token: String,
    pub target: String,
    /// Time left before the store expires the entry.
    pub expires_in: Option<Duration>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(token: String, target: String, expires_in: Option<Duration>) -> Self {
        Self {
            token,
            target,
            expires_in,
        }
    }
}

/// Input data for writing a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub token: String,
    pub target: String,
    pub ttl: Duration,
}
