//! Settings file deserialization and layering.

use crate::config::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Parsed contents of a settings file.
///
/// Every field is optional so that files can be layered; required values are
/// enforced when the settings are resolved into a
/// [`RunnerConfig`](crate::runner::RunnerConfig).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Repository to migrate from, as `owner/name`.
    pub source_repo: Option<String>,

    /// Repository to migrate into, as `owner/name`.
    pub target_repo: Option<String>,

    /// GitHub Personal Access Token.
    pub token: Option<String>,

    /// Retry and pacing behaviour for API calls.
    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    /// Comment replay options.
    #[serde(default)]
    pub comments: CommentSettings,
}

/// The `[rate-limit]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RateLimitSettings {
    /// Pause after every successful call, in milliseconds.
    pub pacing_ms: Option<u64>,

    /// First wait on a secondary rate limit, in seconds.
    pub secondary_base_secs: Option<u64>,

    /// Secondary rate limit hits tolerated per call.
    pub max_secondary_retries: Option<u32>,

    /// Upper bound on a wait for a primary quota reset, in seconds.
    pub max_wait_secs: Option<u64>,
}

/// The `[comments]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CommentSettings {
    /// Prefix replayed comments with an attribution header.
    pub attribution: Option<bool>,

    /// Handlebars format of the attribution header.
    pub attribution_format: Option<String>,
}

impl Settings {
    /// Loads a single settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable or not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading settings");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Returns these settings with every value set in `other` taking precedence.
    #[must_use]
    pub fn overlay(self, other: Settings) -> Self {
        Self {
            source_repo: other.source_repo.or(self.source_repo),
            target_repo: other.target_repo.or(self.target_repo),
            token: other.token.or(self.token),
            rate_limit: RateLimitSettings {
                pacing_ms: other.rate_limit.pacing_ms.or(self.rate_limit.pacing_ms),
                secondary_base_secs: other
                    .rate_limit
                    .secondary_base_secs
                    .or(self.rate_limit.secondary_base_secs),
                max_secondary_retries: other
                    .rate_limit
                    .max_secondary_retries
                    .or(self.rate_limit.max_secondary_retries),
                max_wait_secs: other
                    .rate_limit
                    .max_wait_secs
                    .or(self.rate_limit.max_wait_secs),
            },
            comments: CommentSettings {
                attribution: other.comments.attribution.or(self.comments.attribution),
                attribution_format: other
                    .comments
                    .attribution_format
                    .or(self.comments.attribution_format),
            },
        }
    }
}
