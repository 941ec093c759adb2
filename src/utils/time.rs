//! Duration helpers for client-facing telemetry.

use std::time::Duration;

/// Whole minutes left in `remaining`, rounded up.
///
/// Rounding up keeps a window with seconds left from being reported as `0`.
pub fn whole_minutes(remaining: Duration) -> u64 {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    secs.div_ceil(60)
}
