//! Item comments.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A comment on an issue or pull request record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    /// Comment identifier.
    pub id: u64,

    /// Number of the item the comment belongs to.
    pub item_number: u64,

    /// Login of the comment author.
    pub author: String,

    /// Creation time.
    pub created_at: DateTime<Utc>,

    /// Markdown body.
    pub body: String,
}
