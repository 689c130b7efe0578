//! Tracker error types.

use crate::rate_limit::RateLimitInfo;
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by [`IssueTracker`](super::IssueTracker) operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The call was throttled and may be retried after waiting.
    #[error("Rate limited (remaining: {:?}, reset: {:?})", .0.remaining, .0.reset)]
    RateLimited(RateLimitInfo),

    /// The API rejected the call.
    #[error("GitHub API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport or client error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// Response payload could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: String,
}

impl TrackerError {
    /// Classifies a non-success response.
    ///
    /// 429 is always a throttle. 403 is a throttle only when it carries a
    /// rate limit signal; otherwise it is a permission failure.
    #[must_use]
    pub fn from_response(status: u16, info: RateLimitInfo, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorPayload>(body)
            .map(|payload| payload.message)
            .unwrap_or_else(|_| body.trim().to_string());

        let throttled = match status {
            429 => true,
            403 => {
                let lower = message.to_lowercase();
                info.retry_after.is_some()
                    || info.remaining == Some(0)
                    || lower.contains("rate limit")
                    || lower.contains("abuse")
            }
            _ => false,
        };

        if throttled {
            Self::RateLimited(info)
        } else {
            Self::Api { status, message }
        }
    }

    /// Returns true if the call should be retried after waiting.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}
