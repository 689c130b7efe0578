//! Repository references.

use crate::config::ConfigError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoRef {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Creates a reference from already split parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parses `owner/name`, or a `https://github.com/owner/name` URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRepository`] when the value has no `/`
    /// separator or either half is empty.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let trimmed = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidRepository {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let path = if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
            let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
            url.path()
                .trim_matches('/')
                .trim_end_matches(".git")
                .to_string()
        } else {
            trimmed.to_string()
        };

        let (owner, name) = path
            .split_once('/')
            .ok_or_else(|| invalid("expected owner/name"))?;

        if owner.is_empty() || name.is_empty() {
            return Err(invalid("owner and name must not be empty"));
        }
        if name.contains('/') {
            return Err(invalid("expected exactly one '/' separator"));
        }

        Ok(Self::new(owner, name))
    }
}

impl FromStr for RepoRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
