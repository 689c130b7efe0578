//! Provenance markers.
//!
//! A migrated item's body starts with a line naming the item it was copied
//! from. Finding that exact line in a target body is the only way a later run
//! recognises work already done, so the format below is frozen: changing a
//! single byte makes every previously migrated item look unmigrated.

use crate::config::RepoRef;
use crate::tracker::{Item, ItemKind};

/// Builds the marker for a source item.
///
/// Format: `{kind} Migrated from [{owner}/{name}#{number}]({permalink})`
#[must_use]
pub fn build(kind: ItemKind, source: &RepoRef, number: u64, permalink: &str) -> String {
    format!(
        "{} Migrated from [{}/{}#{}]({})",
        kind.label(),
        source.owner,
        source.name,
        number,
        permalink
    )
}

/// Builds the marker for `item` of the `source` repository.
#[must_use]
pub fn for_item(source: &RepoRef, item: &Item) -> String {
    build(item.kind, source, item.number, &item.html_url)
}

/// Returns true if `body` is non-empty and contains `marker` verbatim.
#[must_use]
pub fn matches(body: &str, marker: &str) -> bool {
    !body.is_empty() && body.contains(marker)
}

/// Prefixes a source body with its marker, separated by a blank line.
#[must_use]
pub fn embed(marker: &str, body: Option<&str>) -> String {
    format!("{marker}\n\n{}", body.unwrap_or_default())
}
