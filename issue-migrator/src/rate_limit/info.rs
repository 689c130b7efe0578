//! Rate limit information.

use std::time::Duration;

/// Rate limit signals carried by a throttled response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: Option<u32>,

    /// Unix timestamp when the rate limit resets.
    pub reset: Option<u64>,

    /// Total requests allowed per window.
    pub limit: Option<u32>,

    /// Wait requested by the server through `retry-after`.
    pub retry_after: Option<Duration>,
}

/// How a throttled call has to be waited out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttle {
    /// The server named an exact wait.
    RetryAfter(Duration),

    /// The primary quota is spent until the given unix timestamp.
    PrimaryReset { reset: u64 },

    /// Secondary (abuse detection) limit without an actionable header.
    Secondary,
}

impl RateLimitInfo {
    /// Reads the rate limit headers through `header`, a case-insensitive lookup.
    ///
    /// Values that are absent or not plain integers are left unset.
    pub fn from_headers<'h>(header: impl Fn(&str) -> Option<&'h str>) -> Self {
        let number = |name: &str| header(name).and_then(|value| value.trim().parse::<u64>().ok());

        Self {
            remaining: number("x-ratelimit-remaining").and_then(|v| u32::try_from(v).ok()),
            reset: number("x-ratelimit-reset"),
            limit: number("x-ratelimit-limit").and_then(|v| u32::try_from(v).ok()),
            retry_after: number("retry-after").map(Duration::from_secs),
        }
    }

    /// Returns true if the primary quota is used up.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Classifies the throttle.
    ///
    /// An explicit `retry-after` wins over quota headers; an exhausted quota
    /// needs a reset timestamp to be actionable.
    #[must_use]
    pub fn throttle(&self) -> Throttle {
        if let Some(wait) = self.retry_after {
            return Throttle::RetryAfter(wait);
        }

        match self.reset {
            Some(reset) if self.is_exhausted() => Throttle::PrimaryReset { reset },
            _ => Throttle::Secondary,
        }
    }
}
