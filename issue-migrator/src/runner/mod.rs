//! Orchestrates a full migration run.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::rate_limit::{Clock, RateLimiter, SystemClock};
use crate::reconcile::{ItemOutcome, Reconciler};
use crate::summary::RunSummary;
use crate::templates::TemplateRenderer;
use crate::tracker::{GitHubTracker, IssueTracker, Item};
use tracing::{error, info, warn};

/// Migrates every item of the source repository into the target repository.
pub struct Runner<T = GitHubTracker, C = SystemClock> {
    config: RunnerConfig,
    tracker: T,
    limiter: RateLimiter<C>,
    renderer: TemplateRenderer,
}

impl Runner<GitHubTracker, SystemClock> {
    /// Builds a runner that talks to GitHub with the configured token.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let tracker = GitHubTracker::new(config.token())?;
        Self::with_tracker(config, tracker, SystemClock)
    }
}

impl<T: IssueTracker, C: Clock> Runner<T, C> {
    /// Builds a runner on top of an arbitrary tracker and clock.
    pub fn with_tracker(config: RunnerConfig, tracker: T, clock: C) -> Result<Self, RunnerError> {
        let renderer = match config.attribution_format() {
            Some(format) => TemplateRenderer::with_attribution(format)?,
            None => TemplateRenderer::new(),
        };
        let limiter = RateLimiter::with_clock(config.policy().clone(), clock);

        Ok(Self {
            config,
            tracker,
            limiter,
            renderer,
        })
    }

    /// Returns the underlying tracker.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Returns the clock used for pacing and backoff.
    pub fn clock(&self) -> &C {
        self.limiter.clock()
    }

    /// Executes the full migration.
    ///
    /// Both repositories are snapshotted once up front. Source items are then
    /// processed oldest first; items created along the way are added to the
    /// target snapshot.
    ///
    /// # Errors
    ///
    /// Stops at the first item that cannot be migrated. Everything done before
    /// that stays in place, and a rerun picks up where this one stopped.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let (tracker, source, target) = (&self.tracker, self.config.source(), self.config.target());
        let mut summary = RunSummary::default();

        info!(%source, "Fetching source items");
        let mut items = self
            .limiter
            .call("list source items", move || tracker.list_items(source))
            .await?;

        info!(%target, "Fetching target items");
        let mut targets = self
            .limiter
            .call("list target items", move || tracker.list_items(target))
            .await?;

        if items.is_empty() {
            warn!(%source, "No items found in source repository");
            return Ok(summary);
        }

        sort_oldest_first(&mut items);
        info!(
            count = items.len(),
            existing = targets.len(),
            "Migrating items from {source} to {target}"
        );

        let reconciler = Reconciler::new(tracker, &self.limiter, &self.renderer, source, target);
        for (index, item) in items.iter().enumerate() {
            info!("{}) Migrating {} #{}", index + 1, item.kind.label(), item.number);

            let outcome = match reconciler.reconcile(item, &targets).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(number = item.number, error = %e, "Migration aborted");
                    return Err(RunnerError::Item {
                        number: item.number,
                        source: e,
                    });
                }
            };

            summary.record(&outcome);
            if let ItemOutcome::Created { target, .. } = outcome {
                targets.push(target);
            }
        }

        info!(
            created = summary.created,
            resynced = summary.resynced,
            skipped = summary.skipped,
            "Migration finished"
        );
        Ok(summary)
    }
}

/// Orders items by ascending number, which is creation order on GitHub.
pub fn sort_oldest_first(items: &mut [Item]) {
    items.sort_by_key(|item| item.number);
}
