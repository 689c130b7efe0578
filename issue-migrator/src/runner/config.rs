//! Runner configuration.

use crate::config::{ConfigError, RepoRef, Settings};
use crate::rate_limit::RetryPolicy;
use crate::templates::DEFAULT_ATTRIBUTION_FORMAT;
use std::fmt;
use std::time::Duration;

/// Resolved configuration for a migration run.
#[derive(Clone)]
pub struct RunnerConfig {
    /// Repository items are copied from.
    source: RepoRef,
    /// Repository items are copied into.
    target: RepoRef,
    /// GitHub token used for API calls.
    token: String,
    /// Pacing and retry behaviour.
    policy: RetryPolicy,
    /// Attribution header format, when attribution is enabled.
    attribution_format: Option<String>,
}

impl RunnerConfig {
    /// Creates a configuration with the default retry policy and verbatim comments.
    pub fn new(source: RepoRef, target: RepoRef, token: impl Into<String>) -> Self {
        Self {
            source,
            target,
            token: token.into(),
            policy: RetryPolicy::default(),
            attribution_format: None,
        }
    }

    /// Sets a custom retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enables comment attribution with the given Handlebars format.
    pub fn with_attribution(mut self, format: impl Into<String>) -> Self {
        self.attribution_format = Some(format.into());
        self
    }

    /// Resolves and validates layered settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required setting is missing, a repository
    /// is malformed, source and target coincide, or a value is out of range.
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        let source = RepoRef::parse(&require(settings.source_repo, "source-repo")?)?;
        let target = RepoRef::parse(&require(settings.target_repo, "target-repo")?)?;

        if source == target {
            return Err(ConfigError::ValidationError {
                field: "target-repo".to_string(),
                message: format!("must differ from source-repo ({source})"),
            });
        }

        let token = require(settings.token, "token")?;

        let defaults = RetryPolicy::default();
        let limits = settings.rate_limit;
        let policy = RetryPolicy {
            pacing: limits
                .pacing_ms
                .map_or(defaults.pacing, Duration::from_millis),
            secondary_base: limits
                .secondary_base_secs
                .map_or(defaults.secondary_base, Duration::from_secs),
            max_secondary_retries: limits
                .max_secondary_retries
                .unwrap_or(defaults.max_secondary_retries),
            max_wait: limits
                .max_wait_secs
                .map_or(defaults.max_wait, Duration::from_secs),
        };

        if policy.secondary_base.is_zero() {
            return Err(ConfigError::ValidationError {
                field: "rate-limit.secondary-base-secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let attribution_format = match settings.comments.attribution {
            Some(true) => Some(
                settings
                    .comments
                    .attribution_format
                    .unwrap_or_else(|| DEFAULT_ATTRIBUTION_FORMAT.to_string()),
            ),
            _ => None,
        };

        Ok(Self {
            source,
            target,
            token,
            policy,
            attribution_format,
        })
    }

    /// Returns the source repository.
    pub fn source(&self) -> &RepoRef {
        &self.source
    }

    /// Returns the target repository.
    pub fn target(&self) -> &RepoRef {
        &self.target
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the attribution format if attribution is enabled.
    pub fn attribution_format(&self) -> Option<&str> {
        self.attribution_format.as_deref()
    }
}

impl fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("policy", &self.policy)
            .field("attribution_format", &self.attribution_format)
            .finish_non_exhaustive()
    }
}

/// Unwraps a required setting, treating blank strings as missing.
fn require(value: Option<String>, field: &str) -> Result<String, ConfigError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingSetting {
            field: field.to_string(),
        })
}
