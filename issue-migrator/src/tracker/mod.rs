//! Remote issue tracker access.
//!
//! [`IssueTracker`] is the seam between the migration logic and the hosted
//! tracker. [`GitHubTracker`] talks to the GitHub REST API; tests substitute an
//! in-memory implementation.

mod comment;
mod error;
mod github;
mod item;

pub use comment::Comment;
pub use error::TrackerError;
pub use github::GitHubTracker;
pub use item::{Item, ItemKind, ItemState, NewItem};

use crate::config::RepoRef;
use std::future::Future;

/// Operations the migration needs from an issue tracker.
///
/// Every call is a single remote round trip as far as retry handling is
/// concerned; throttling must surface as [`TrackerError::RateLimited`].
pub trait IssueTracker {
    /// Lists all items of a repository, open and closed, newest first.
    fn list_items(&self, repo: &RepoRef) -> impl Future<Output = Result<Vec<Item>, TrackerError>>;

    /// Lists all comments of an item.
    fn list_comments(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> impl Future<Output = Result<Vec<Comment>, TrackerError>>;

    /// Creates an item with its labels attached.
    fn create_item(
        &self,
        repo: &RepoRef,
        item: &NewItem,
    ) -> impl Future<Output = Result<Item, TrackerError>>;

    /// Sets an item's open/closed state.
    fn update_state(
        &self,
        repo: &RepoRef,
        number: u64,
        state: ItemState,
    ) -> impl Future<Output = Result<(), TrackerError>>;

    /// Adds a comment to an item.
    fn create_comment(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> impl Future<Output = Result<(), TrackerError>>;
}
