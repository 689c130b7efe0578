//! Run summary types.

use crate::reconcile::ItemOutcome;
use crate::tracker::ItemState;

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of source items processed.
    pub items_seen: usize,

    /// Number of target items created.
    pub created: usize,

    /// Number of migrated items whose state was corrected.
    pub resynced: usize,

    /// Number of items already migrated with matching state.
    pub skipped: usize,

    /// Number of comments replayed onto created items.
    pub comments_copied: usize,

    /// Number of created items closed to match their source.
    pub closed: usize,
}

impl RunSummary {
    /// Updates the summary with an item outcome.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        self.items_seen += 1;
        match outcome {
            ItemOutcome::Skipped { .. } => self.skipped += 1,
            ItemOutcome::Resynced { .. } => self.resynced += 1,
            ItemOutcome::Created {
                target, comments, ..
            } => {
                self.created += 1;
                self.comments_copied += comments;
                if target.state == ItemState::Closed {
                    self.closed += 1;
                }
            }
        }
    }

    /// Returns true if the run changed nothing in the target repository.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.resynced == 0
    }
}
