//! Per-item reconciliation between source and target repositories.
//!
//! For each source item the reconciler looks for its provenance marker in the
//! target items and then:
//! 1. skips it when found with the same state,
//! 2. updates only the open/closed state when found with a different state,
//! 3. otherwise creates it, replays its comments in order and closes it if
//!    the source is closed.
//!
//! Comments carry no marker of their own. If a run dies halfway through an
//! item's comments, the item itself is found on the next run and the missing
//! comments are not replayed.

mod decision;
mod error;
mod outcome;

pub use decision::MigrationDecision;
pub use error::ReconcileError;
pub use outcome::ItemOutcome;

use crate::config::RepoRef;
use crate::marker;
use crate::rate_limit::{Clock, RateLimiter};
use crate::templates::TemplateRenderer;
use crate::tracker::{IssueTracker, Item, ItemState, NewItem};
use tracing::{debug, info, info_span, Instrument};

/// Migrates single items from `source` into `target`.
pub struct Reconciler<'a, T, C> {
    tracker: &'a T,
    limiter: &'a RateLimiter<C>,
    renderer: &'a TemplateRenderer,
    source: &'a RepoRef,
    target: &'a RepoRef,
}

impl<'a, T: IssueTracker, C: Clock> Reconciler<'a, T, C> {
    /// Creates a reconciler.
    pub fn new(
        tracker: &'a T,
        limiter: &'a RateLimiter<C>,
        renderer: &'a TemplateRenderer,
        source: &'a RepoRef,
        target: &'a RepoRef,
    ) -> Self {
        Self {
            tracker,
            limiter,
            renderer,
            source,
            target,
        }
    }

    /// Reconciles `item` against the known `targets`.
    ///
    /// `targets` is only read; the caller appends the item of a
    /// [`ItemOutcome::Created`] so that later items see it.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] when a remote call fails terminally or a
    /// comment cannot be rendered. Calls already made are not undone.
    pub async fn reconcile(&self, item: &Item, targets: &[Item]) -> Result<ItemOutcome, ReconcileError> {
        let span = info_span!("reconcile", kind = %item.kind, number = item.number);

        async {
            let marker = marker::for_item(self.source, item);

            match MigrationDecision::decide(item, &marker, targets) {
                MigrationDecision::Skip { target } => {
                    info!(migrated_to = target, "Skipping (already migrated and state is the same)");
                    Ok(ItemOutcome::Skipped {
                        source: item.number,
                        target,
                    })
                }
                MigrationDecision::Resync { target, state } => {
                    self.set_state(target, state).await?;
                    info!(migrated_to = target, %state, "Updated state of migrated item");
                    Ok(ItemOutcome::Resynced {
                        source: item.number,
                        target,
                        state,
                    })
                }
                MigrationDecision::Create => self.create(item, &marker).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Creates the target item, replays comments, then closes it if needed.
    async fn create(&self, item: &Item, marker: &str) -> Result<ItemOutcome, ReconcileError> {
        let (tracker, source, target) = (self.tracker, self.source, self.target);

        let new_item = NewItem {
            title: item.title.clone(),
            body: marker::embed(marker, item.body.as_deref()),
            labels: item.labels.clone(),
        };
        let new_item = &new_item;
        let mut created = self
            .limiter
            .call("create item", move || tracker.create_item(target, new_item))
            .await?;
        debug!(migrated_to = created.number, "Created target item");

        let number = item.number;
        let mut comments = self
            .limiter
            .call("list comments", move || tracker.list_comments(source, number))
            .await?;
        comments.sort_by_key(|comment| comment.created_at);

        let created_number = created.number;
        for comment in &comments {
            let body = self.renderer.render_comment(comment)?;
            let body = body.as_str();
            self.limiter
                .call("create comment", move || {
                    tracker.create_comment(target, created_number, body)
                })
                .await?;
            debug!(comment = comment.id, author = %comment.author, "Replayed comment");
        }

        if item.state == ItemState::Closed {
            self.set_state(created_number, ItemState::Closed).await?;
            created.state = ItemState::Closed;
        }

        info!(
            migrated_to = created_number,
            comments = comments.len(),
            state = %created.state,
            "Migrated {} #{} -> #{}",
            item.kind,
            item.number,
            created_number
        );

        Ok(ItemOutcome::Created {
            source: item.number,
            target: created,
            comments: comments.len(),
        })
    }

    async fn set_state(&self, number: u64, state: ItemState) -> Result<(), ReconcileError> {
        let (tracker, target) = (self.tracker, self.target);
        self.limiter
            .call("update item state", move || tracker.update_state(target, number, state))
            .await?;
        Ok(())
    }
}
