//! Runner error types.

use crate::reconcile::ReconcileError;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings loading and validation errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Invalid comment attribution format.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// Fetching the item snapshots failed.
    #[error("Failed to fetch items: {0}")]
    Listing(#[from] crate::rate_limit::RateLimitError),

    /// Migrating a source item failed.
    #[error("Failed to migrate item #{number}: {source}")]
    Item {
        number: u64,
        #[source]
        source: ReconcileError,
    },
}

impl RunnerError {
    /// Returns true for errors raised before any remote call was made.
    #[must_use]
    pub fn is_startup(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Octocrab(_) | Self::Template(_))
    }
}
