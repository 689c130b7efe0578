//! Reconciliation error types.

use crate::rate_limit::RateLimitError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that abort the reconciliation of an item.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A remote call failed terminally.
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),

    /// A comment body failed to render.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
