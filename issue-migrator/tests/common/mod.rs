//! In-memory tracker shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use issue_migrator::config::RepoRef;
use issue_migrator::rate_limit::{ManualClock, RateLimitInfo, RetryPolicy};
use issue_migrator::tracker::{
    Comment, IssueTracker, Item, ItemKind, ItemState, NewItem, TrackerError,
};
use issue_migrator::{Runner, RunnerConfig};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Virtual unix time tests start at.
pub const START: u64 = 1_700_000_000;

pub fn source_repo() -> RepoRef {
    RepoRef::new("octo", "source")
}

pub fn target_repo() -> RepoRef {
    RepoRef::new("octo", "target")
}

/// Remote operations, in the order they succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListItems(String),
    ListComments(String, u64),
    CreateItem(String, String),
    UpdateState(String, u64, ItemState),
    CreateComment(String, u64, String),
}

impl Call {
    /// Returns true for calls that change a repository.
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::ListItems(_) | Call::ListComments(..))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListItems,
    ListComments,
    CreateItem,
    UpdateState,
    CreateComment,
}

/// Failure injected into a scripted attempt.
#[derive(Debug, Clone)]
pub enum Failure {
    /// Throttle without usable headers.
    Secondary,
    /// Throttle with an exhausted quota resetting at the given unix time.
    PrimaryReset(u64),
    /// Throttle with a `retry-after` in seconds.
    RetryAfter(u64),
    /// Non-retryable API error.
    Hard(u16),
}

impl Failure {
    fn into_error(self) -> TrackerError {
        match self {
            Failure::Secondary => TrackerError::RateLimited(RateLimitInfo::default()),
            Failure::PrimaryReset(reset) => TrackerError::RateLimited(RateLimitInfo {
                remaining: Some(0),
                reset: Some(reset),
                limit: Some(5000),
                retry_after: None,
            }),
            Failure::RetryAfter(secs) => TrackerError::RateLimited(RateLimitInfo {
                retry_after: Some(Duration::from_secs(secs)),
                ..Default::default()
            }),
            Failure::Hard(status) => TrackerError::Api {
                status,
                message: "Validation Failed".to_string(),
            },
        }
    }
}

#[derive(Default)]
struct State {
    items: HashMap<RepoRef, Vec<Item>>,
    comments: HashMap<(RepoRef, u64), Vec<Comment>>,
    calls: Vec<Call>,
    attempts: HashMap<Op, usize>,
    script: Vec<(Op, usize, Failure)>,
    next_comment_id: u64,
}

/// Tracker holding repositories in memory.
///
/// Listing returns items newest first, like the GitHub API does.
#[derive(Default)]
pub struct InMemoryTracker {
    state: Mutex<State>,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores an item as-is.
    pub fn add_item(&self, repo: &RepoRef, item: Item) {
        self.state().items.entry(repo.clone()).or_default().push(item);
    }

    /// Stores a comment on `number`.
    pub fn add_comment(&self, repo: &RepoRef, number: u64, author: &str, at: u64, body: &str) {
        let mut state = self.state();
        state.next_comment_id += 1;
        let comment = Comment {
            id: state.next_comment_id,
            item_number: number,
            author: author.to_string(),
            created_at: time(at),
            body: body.to_string(),
        };
        state
            .comments
            .entry((repo.clone(), number))
            .or_default()
            .push(comment);
    }

    /// Fails the `attempt`-th attempt (1-based, retries included) of `op`.
    pub fn fail_at(&self, op: Op, attempt: usize, failure: Failure) {
        self.state().script.push((op, attempt, failure));
    }

    /// Items of `repo`, ordered by number.
    pub fn items(&self, repo: &RepoRef) -> Vec<Item> {
        let mut items = self.state().items.get(repo).cloned().unwrap_or_default();
        items.sort_by_key(|item| item.number);
        items
    }

    /// Comment bodies of `number` in `repo`, in insertion order.
    pub fn comment_bodies(&self, repo: &RepoRef, number: u64) -> Vec<String> {
        self.state()
            .comments
            .get(&(repo.clone(), number))
            .map(|comments| comments.iter().map(|c| c.body.clone()).collect())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Counts an attempt of `op` and returns the scripted failure, if any.
    fn attempt(&self, op: Op) -> Result<(), TrackerError> {
        let mut state = self.state();
        let count = {
            let count = state.attempts.entry(op).or_default();
            *count += 1;
            *count
        };
        let scripted = state
            .script
            .iter()
            .position(|(o, at, _)| *o == op && *at == count);
        match scripted {
            Some(index) => Err(state.script.remove(index).2.into_error()),
            None => Ok(()),
        }
    }
}

impl IssueTracker for InMemoryTracker {
    async fn list_items(&self, repo: &RepoRef) -> Result<Vec<Item>, TrackerError> {
        self.attempt(Op::ListItems)?;
        let mut state = self.state();
        state.calls.push(Call::ListItems(repo.to_string()));
        let mut items = state.items.get(repo).cloned().unwrap_or_default();
        items.sort_by(|a, b| b.number.cmp(&a.number));
        Ok(items)
    }

    async fn list_comments(&self, repo: &RepoRef, number: u64) -> Result<Vec<Comment>, TrackerError> {
        self.attempt(Op::ListComments)?;
        let mut state = self.state();
        state.calls.push(Call::ListComments(repo.to_string(), number));
        Ok(state
            .comments
            .get(&(repo.clone(), number))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_item(&self, repo: &RepoRef, item: &NewItem) -> Result<Item, TrackerError> {
        self.attempt(Op::CreateItem)?;
        let mut state = self.state();
        state
            .calls
            .push(Call::CreateItem(repo.to_string(), item.title.clone()));

        let items = state.items.entry(repo.clone()).or_default();
        let number = items.iter().map(|item| item.number).max().unwrap_or(0) + 1;
        let created = Item {
            number,
            title: item.title.clone(),
            body: Some(item.body.clone()),
            labels: item.labels.clone(),
            state: ItemState::Open,
            kind: ItemKind::Issue,
            created_at: time(START),
            html_url: format!("https://github.com/{repo}/issues/{number}"),
        };
        items.push(created.clone());
        Ok(created)
    }

    async fn update_state(
        &self,
        repo: &RepoRef,
        number: u64,
        new_state: ItemState,
    ) -> Result<(), TrackerError> {
        self.attempt(Op::UpdateState)?;
        let mut state = self.state();
        state
            .calls
            .push(Call::UpdateState(repo.to_string(), number, new_state));

        let item = state
            .items
            .get_mut(repo)
            .and_then(|items| items.iter_mut().find(|item| item.number == number))
            .ok_or_else(|| TrackerError::Api {
                status: 404,
                message: "Not Found".to_string(),
            })?;
        item.state = new_state;
        Ok(())
    }

    async fn create_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Result<(), TrackerError> {
        self.attempt(Op::CreateComment)?;
        {
            let mut state = self.state();
            state
                .calls
                .push(Call::CreateComment(repo.to_string(), number, body.to_string()));
        }
        self.add_comment(repo, number, "migrator", START, body);
        Ok(())
    }
}

pub fn time(secs: u64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs as i64, 0).unwrap()
}

/// An open source issue `number` created `number` minutes after [`START`].
pub fn issue(number: u64, title: &str) -> Item {
    Item {
        number,
        title: title.to_string(),
        body: Some(format!("Body of {title}")),
        labels: Vec::new(),
        state: ItemState::Open,
        kind: ItemKind::Issue,
        created_at: time(START + number * 60),
        html_url: format!("https://github.com/octo/source/issues/{number}"),
    }
}

/// A pull request record `number` in the source repository.
pub fn pull_request(number: u64, title: &str) -> Item {
    Item {
        kind: ItemKind::PullRequest,
        html_url: format!("https://github.com/octo/source/pull/{number}"),
        ..issue(number, title)
    }
}

/// Policy without pacing, so that only throttle waits show up as sleeps.
pub fn unpaced_policy() -> RetryPolicy {
    RetryPolicy {
        pacing: Duration::ZERO,
        ..RetryPolicy::default()
    }
}

pub fn config(policy: RetryPolicy) -> RunnerConfig {
    RunnerConfig::new(source_repo(), target_repo(), "token").with_policy(policy)
}

pub fn runner(
    tracker: InMemoryTracker,
    config: RunnerConfig,
) -> Runner<InMemoryTracker, ManualClock> {
    Runner::with_tracker(config, tracker, ManualClock::new(START)).unwrap()
}
