//! Per-client quota entities.

use std::time::Duration;

/// Result of consuming one unit of a client's quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The request may proceed.
    Granted { remaining: i64, resets_in: Duration },
    /// The window's allowance is used up; nothing was consumed.
    Exhausted { resets_in: Duration },
}

impl QuotaDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, QuotaDecision::Granted { .. })
    }

    pub fn resets_in(&self) -> Duration {
        match self {
            QuotaDecision::Granted { resets_in, .. } | QuotaDecision::Exhausted { resets_in } => {
                *resets_in
            }
        }
    }
}

/// Snapshot of a client's counter, for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    pub remaining: i64,
    pub resets_in: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_accessors() {
        let granted = QuotaDecision::Granted {
            remaining: 3,
            resets_in: Duration::from_secs(10),
        };
        let exhausted = QuotaDecision::Exhausted {
            resets_in: Duration::from_secs(20),
        };

        assert!(granted.is_granted());
        assert!(!exhausted.is_granted());
        assert_eq!(granted.resets_in(), Duration::from_secs(10));
        assert_eq!(exhausted.resets_in(), Duration::from_secs(20));
    }
}
