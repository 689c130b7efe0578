//! Result of reconciling one source item.

use crate::tracker::{Item, ItemState};

/// What the reconciler did for a source item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Already migrated with matching state; no calls were made.
    Skipped { source: u64, target: u64 },

    /// Target state was updated to match the source.
    Resynced {
        source: u64,
        target: u64,
        state: ItemState,
    },

    /// A new target item was created and populated.
    Created {
        source: u64,
        /// The new item, with its state after closing if the source was closed.
        target: Item,
        /// Number of comments replayed.
        comments: usize,
    },
}

impl ItemOutcome {
    /// Returns the source item number.
    #[must_use]
    pub fn source(&self) -> u64 {
        match self {
            Self::Skipped { source, .. }
            | Self::Resynced { source, .. }
            | Self::Created { source, .. } => *source,
        }
    }

    /// Returns the target item number.
    #[must_use]
    pub fn target_number(&self) -> u64 {
        match self {
            Self::Skipped { target, .. } | Self::Resynced { target, .. } => *target,
            Self::Created { target, .. } => target.number,
        }
    }
}
