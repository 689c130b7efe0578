#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod marker;
pub mod rate_limit;
pub mod reconcile;
pub mod runner;
pub mod summary;
pub mod templates;
pub mod tracker;

pub use config::{load_settings, ConfigError, RepoRef, Settings};
pub use rate_limit::{Clock, RateLimitError, RateLimiter, RetryPolicy, SystemClock};
pub use reconcile::{ItemOutcome, MigrationDecision, ReconcileError, Reconciler};
pub use runner::{sort_oldest_first, Runner, RunnerConfig, RunnerError};
pub use summary::RunSummary;
pub use templates::{TemplateError, TemplateRenderer, DEFAULT_ATTRIBUTION_FORMAT};
pub use tracker::{
    Comment, GitHubTracker, IssueTracker, Item, ItemKind, ItemState, NewItem, TrackerError,
};
