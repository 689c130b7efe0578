//! Rate limiting for GitHub API calls.
//!
//! Every remote call is wrapped by [`RateLimiter::call`], which paces
//! successful calls and transparently retries throttled ones:
//!
//! - `retry-after` present: wait exactly that long.
//! - primary quota exhausted: wait until the reset timestamp.
//! - otherwise (secondary limit): exponential backoff, bounded by
//!   [`RetryPolicy::max_secondary_retries`].
//!
//! Only the secondary path consumes the retry budget. Any other failure is
//! returned immediately.

mod clock;
mod error;
mod info;
mod policy;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::RateLimitError;
pub use info::{RateLimitInfo, Throttle};
pub use policy::{
    RetryPolicy, DEFAULT_MAX_SECONDARY_RETRIES, DEFAULT_MAX_WAIT, DEFAULT_PACING,
    DEFAULT_SECONDARY_BASE, MIN_RESET_WAIT,
};

use crate::tracker::TrackerError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Wraps remote calls with pacing and throttle handling.
#[derive(Debug)]
pub struct RateLimiter<C = SystemClock> {
    policy: RetryPolicy,
    clock: C,
}

impl RateLimiter<SystemClock> {
    /// Creates a limiter on the wall clock.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_clock(policy, SystemClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Creates a limiter on the given clock.
    #[must_use]
    pub fn with_clock(policy: RetryPolicy, clock: C) -> Self {
        Self { policy, clock }
    }

    /// Returns the retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Runs `attempt` until it succeeds or fails terminally.
    ///
    /// `operation` names the call in logs and errors.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError::Failed`] for the first non-throttle failure and
    /// [`RateLimitError::RetryBudgetExhausted`] once secondary rate limiting
    /// outlasts the policy.
    pub async fn call<T, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T, RateLimitError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TrackerError>>,
    {
        let mut backoff = SecondaryBackoff::new(&self.policy);

        loop {
            let info = match attempt().await {
                Ok(value) => {
                    if backoff.hits > 0 {
                        info!(operation, hits = backoff.hits, "Recovered from secondary rate limit");
                    }
                    self.pace().await;
                    return Ok(value);
                }
                Err(TrackerError::RateLimited(info)) => info,
                Err(source) => {
                    return Err(RateLimitError::Failed {
                        operation: operation.to_string(),
                        source,
                    })
                }
            };

            let wait = match info.throttle() {
                Throttle::RetryAfter(wait) => {
                    warn!(operation, retry_after = wait.as_secs(), "Received Retry-After header, waiting");
                    wait
                }
                Throttle::PrimaryReset { reset } => {
                    let wait = self.until_reset(reset);
                    warn!(operation, reset, wait_secs = wait.as_secs(), "Rate limit exhausted, waiting for reset");
                    wait
                }
                Throttle::Secondary => match backoff.next_wait() {
                    Some(wait) => {
                        warn!(
                            operation,
                            hit = backoff.hits,
                            wait_secs = wait.as_secs(),
                            "Secondary rate limit hit, backing off"
                        );
                        wait
                    }
                    None => {
                        return Err(RateLimitError::RetryBudgetExhausted {
                            operation: operation.to_string(),
                            hits: backoff.hits,
                        })
                    }
                },
            };

            self.clock.sleep(wait).await;
        }
    }

    /// Waits the fixed pause applied after every successful call.
    async fn pace(&self) {
        if !self.policy.pacing.is_zero() {
            debug!(pacing = ?self.policy.pacing, "Pacing");
            self.clock.sleep(self.policy.pacing).await;
        }
    }

    /// Time until `reset`, clamped to `[MIN_RESET_WAIT, max_wait]`.
    ///
    /// A reset already in the past still waits [`MIN_RESET_WAIT`], so a quota
    /// that stays exhausted cannot spin without pause.
    fn until_reset(&self, reset: u64) -> Duration {
        let wait = Duration::from_secs(reset.saturating_sub(self.clock.now()));
        if wait > self.policy.max_wait {
            warn!(
                wait_secs = wait.as_secs(),
                max_wait = self.policy.max_wait.as_secs(),
                "Rate limit reset too far in future, capping wait time"
            );
        }
        wait.min(self.policy.max_wait).max(MIN_RESET_WAIT)
    }
}

/// Secondary rate limit streak of a single [`RateLimiter::call`].
struct SecondaryBackoff {
    base: Duration,
    max_retries: u32,
    hits: u32,
}

impl SecondaryBackoff {
    fn new(policy: &RetryPolicy) -> Self {
        Self {
            base: policy.secondary_base,
            max_retries: policy.max_secondary_retries,
            hits: 0,
        }
    }

    /// Records a hit and returns the wait before the next attempt, or `None`
    /// once the budget is spent.
    fn next_wait(&mut self) -> Option<Duration> {
        self.hits += 1;
        if self.hits > self.max_retries {
            return None;
        }
        let factor = 1u32.checked_shl(self.hits - 1).unwrap_or(u32::MAX);
        Some(self.base.saturating_mul(factor))
    }
}
