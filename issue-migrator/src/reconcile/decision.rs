//! Per-item migration decision.

use crate::marker;
use crate::tracker::{Item, ItemState};

/// What to do with one source item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationDecision {
    /// Already migrated and the state matches.
    Skip { target: u64 },

    /// Already migrated but open/closed drifted; only the state is updated.
    Resync { target: u64, state: ItemState },

    /// Not migrated yet.
    Create,
}

impl MigrationDecision {
    /// Decides by scanning `targets` for `marker`.
    ///
    /// The first matching target wins.
    #[must_use]
    pub fn decide(source: &Item, marker: &str, targets: &[Item]) -> Self {
        match targets
            .iter()
            .find(|target| marker::matches(target.body_text(), marker))
        {
            Some(target) if target.state == source.state => Self::Skip {
                target: target.number,
            },
            Some(target) => Self::Resync {
                target: target.number,
                state: source.state,
            },
            None => Self::Create,
        }
    }
}
