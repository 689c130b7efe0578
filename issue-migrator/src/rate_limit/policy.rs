//! Retry policy.

use std::time::Duration;

/// Pause after every successful call (the historical fixed delay of this tool).
pub const DEFAULT_PACING: Duration = Duration::from_millis(2001);

/// First wait after a secondary rate limit hit.
pub const DEFAULT_SECONDARY_BASE: Duration = Duration::from_secs(60);

/// Secondary rate limit hits tolerated per call.
pub const DEFAULT_MAX_SECONDARY_RETRIES: u32 = 5;

/// Maximum time to wait for a primary rate limit reset (1 hour).
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(3600);

/// Shortest wait for a primary quota reset, applied when the reset time has already passed.
pub const MIN_RESET_WAIT: Duration = Duration::from_secs(1);

/// Tunables for [`RateLimiter`](super::RateLimiter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause applied after every successful call.
    pub pacing: Duration,

    /// Wait after the first secondary rate limit hit; doubles on each further hit.
    pub secondary_base: Duration,

    /// Secondary hits tolerated within one call before giving up.
    pub max_secondary_retries: u32,

    /// Cap on a single wait for a primary quota reset.
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            pacing: DEFAULT_PACING,
            secondary_base: DEFAULT_SECONDARY_BASE,
            max_secondary_retries: DEFAULT_MAX_SECONDARY_RETRIES,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}
