//! Click event model for asynchronous click counting.

/// A resolved redirect waiting to be counted.
///
/// Created by the resolution service and sent over a bounded channel to
/// [`crate::domain::click_worker::run_click_worker`], so the redirect response
/// never waits on the click counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub token: String,
}

impl ClickEvent {
    /// Creates a new click event for `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}
