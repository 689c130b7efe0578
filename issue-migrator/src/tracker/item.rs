//! Issue and pull request records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Open/closed state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Open,
    Closed,
}

impl ItemState {
    /// Returns the state as used by the REST API.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an item is a plain issue or a pull request record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemKind {
    Issue,
    PullRequest,
}

impl ItemKind {
    /// Label used in provenance markers and progress output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Issue => "Issue",
            Self::PullRequest => "PR",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An issue or pull request record in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Item number within its repository.
    pub number: u64,

    /// Item title.
    pub title: String,

    /// Body text; GitHub reports an empty body as absent.
    pub body: Option<String>,

    /// Label names, unique, in the order the API reported them.
    pub labels: Vec<String>,

    /// Current state.
    pub state: ItemState,

    /// Issue or pull request.
    pub kind: ItemKind,

    /// Creation time.
    pub created_at: DateTime<Utc>,

    /// Permalink to the item's web page.
    pub html_url: String,
}

impl Item {
    /// Returns the body, or an empty string when there is none.
    #[must_use]
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// An item to be created in the target repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewItem {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Removes repeated label names, keeping the first occurrence.
pub(crate) fn unique_labels(labels: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for label in labels {
        if !unique.contains(&label) {
            unique.push(label);
        }
    }
    unique
}
