//! Rate limiter error types.

use crate::tracker::TrackerError;
use thiserror::Error;

/// Terminal outcome of a call wrapped by [`RateLimiter`](super::RateLimiter).
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// The call failed with a non-throttle error; it was not retried.
    #[error("{operation} failed: {source}")]
    Failed {
        operation: String,
        #[source]
        source: TrackerError,
    },

    /// Secondary rate limiting persisted past the retry budget.
    #[error("{operation} gave up after {hits} secondary rate limit hits")]
    RetryBudgetExhausted { operation: String, hits: u32 },
}
