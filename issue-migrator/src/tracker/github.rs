//! GitHub REST implementation of [`IssueTracker`].
//!
//! Calls go through octocrab's raw request methods so that status codes and
//! rate limit headers stay visible to the retry logic.

use super::item::unique_labels;
use super::{Comment, IssueTracker, Item, ItemKind, ItemState, NewItem, TrackerError};
use crate::config::RepoRef;
use crate::rate_limit::RateLimitInfo;
use chrono::{DateTime, Utc};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;
use tracing::debug;

/// Results per page for list endpoints.
const PER_PAGE: u8 = 100;

/// Authenticated GitHub client.
#[derive(Debug, Clone)]
pub struct GitHubTracker {
    octocrab: Octocrab,
}

impl GitHubTracker {
    /// Builds a client authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(token: &str) -> Result<Self, octocrab::Error> {
        Self::build(token, None)
    }

    /// Builds a client against a different API root, such as GitHub Enterprise.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_uri` is invalid or the HTTP client cannot be
    /// constructed.
    pub fn with_base_uri(token: &str, base_uri: &str) -> Result<Self, octocrab::Error> {
        Self::build(token, Some(base_uri))
    }

    /// Octocrab's own retry layer is disabled: it resends throttled and failed
    /// requests without waiting, which can duplicate a `POST`. Retries belong
    /// to [`RateLimiter`](crate::rate_limit::RateLimiter) alone.
    fn build(token: &str, base_uri: Option<&str>) -> Result<Self, octocrab::Error> {
        let mut builder = Octocrab::builder()
            .personal_token(token.to_string())
            .add_retry_config(RetryConfig::None);
        if let Some(base_uri) = base_uri {
            builder = builder.base_uri(base_uri)?;
        }
        Ok(Self::from_octocrab(builder.build()?))
    }

    /// Wraps an existing octocrab client.
    ///
    /// The client should be built with retries disabled, as [`GitHubTracker::new`] does.
    #[must_use]
    pub fn from_octocrab(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    /// Sends a request and decodes a successful response body.
    async fn send<T: DeserializeOwned>(&self, request: Request<'_>) -> Result<T, TrackerError> {
        let response = match request {
            Request::Get(route) => self.octocrab._get(route).await?,
            Request::Post(route, body) => self.octocrab._post(route, Some(body)).await?,
            Request::Patch(route, body) => self.octocrab._patch(route, Some(body)).await?,
        };

        let status = response.status();
        let headers = response.headers();
        let info = RateLimitInfo::from_headers(|name| {
            headers.get(name).and_then(|value| value.to_str().ok())
        });
        let body = self.octocrab.body_to_string(response).await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        debug!(status = status.as_u16(), ?info, "Request failed");
        Err(TrackerError::from_response(status.as_u16(), info, &body))
    }

    /// Fetches every page of a list endpoint.
    async fn get_all<T: DeserializeOwned>(&self, route: &str) -> Result<Vec<T>, TrackerError> {
        let separator = if route.contains('?') { '&' } else { '?' };
        let mut all = Vec::new();

        for page in 1u32.. {
            let paged = format!("{route}{separator}per_page={PER_PAGE}&page={page}");
            let batch: Vec<T> = self.send(Request::Get(paged)).await?;
            let last = batch.len() < usize::from(PER_PAGE);
            all.extend(batch);
            if last {
                break;
            }
        }

        Ok(all)
    }
}

enum Request<'a> {
    Get(String),
    Post(String, &'a Value),
    Patch(String, &'a Value),
}

impl IssueTracker for GitHubTracker {
    fn list_items(&self, repo: &RepoRef) -> impl Future<Output = Result<Vec<Item>, TrackerError>> {
        let route = format!("/repos/{}/{}/issues?state=all", repo.owner, repo.name);
        async move {
            let payloads: Vec<IssuePayload> = self.get_all(&route).await?;
            debug!(route = %route, count = payloads.len(), "Fetched items");
            Ok(payloads.into_iter().map(Item::from).collect())
        }
    }

    fn list_comments(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> impl Future<Output = Result<Vec<Comment>, TrackerError>> {
        let route = format!("/repos/{}/{}/issues/{number}/comments", repo.owner, repo.name);
        async move {
            let payloads: Vec<CommentPayload> = self.get_all(&route).await?;
            debug!(route = %route, count = payloads.len(), "Fetched comments");
            Ok(payloads
                .into_iter()
                .map(|payload| payload.into_comment(number))
                .collect())
        }
    }

    fn create_item(
        &self,
        repo: &RepoRef,
        item: &NewItem,
    ) -> impl Future<Output = Result<Item, TrackerError>> {
        let route = format!("/repos/{}/{}/issues", repo.owner, repo.name);
        let body = json!({
            "title": item.title,
            "body": item.body,
            "labels": item.labels,
        });
        async move {
            let payload: IssuePayload = self.send(Request::Post(route, &body)).await?;
            Ok(Item::from(payload))
        }
    }

    fn update_state(
        &self,
        repo: &RepoRef,
        number: u64,
        state: ItemState,
    ) -> impl Future<Output = Result<(), TrackerError>> {
        let route = format!("/repos/{}/{}/issues/{number}", repo.owner, repo.name);
        let body = json!({ "state": state.as_str() });
        async move {
            let _: IgnoredAny = self.send(Request::Patch(route, &body)).await?;
            Ok(())
        }
    }

    fn create_comment(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> impl Future<Output = Result<(), TrackerError>> {
        let route = format!("/repos/{}/{}/issues/{number}/comments", repo.owner, repo.name);
        let body = json!({ "body": body });
        async move {
            let _: IgnoredAny = self.send(Request::Post(route, &body)).await?;
            Ok(())
        }
    }
}

/// Issue as returned by the REST API.
#[derive(Debug, Deserialize)]
struct IssuePayload {
    number: u64,
    title: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<LabelPayload>,
    state: ItemState,
    created_at: DateTime<Utc>,
    html_url: String,
    pull_request: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct LabelPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CommentPayload {
    id: u64,
    user: Option<UserPayload>,
    created_at: DateTime<Utc>,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    login: String,
}

impl From<IssuePayload> for Item {
    fn from(payload: IssuePayload) -> Self {
        Self {
            number: payload.number,
            title: payload.title,
            body: payload.body,
            labels: unique_labels(payload.labels.into_iter().map(|label| label.name)),
            state: payload.state,
            kind: if payload.pull_request.is_some() {
                ItemKind::PullRequest
            } else {
                ItemKind::Issue
            },
            created_at: payload.created_at,
            html_url: payload.html_url,
        }
    }
}

impl CommentPayload {
    fn into_comment(self, item_number: u64) -> Comment {
        Comment {
            id: self.id,
            item_number,
            author: self
                .user
                .map(|user| user.login)
                .unwrap_or_else(|| "ghost".to_string()),
            created_at: self.created_at,
            body: self.body.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `response` to every request on a local port, counting requests.
    async fn serve(response: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let requests = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let counter = Arc::clone(&counter);
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buffer = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buffer).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buffer[..n]),
                        }
                    }
                    counter.fetch_add(1, Ordering::SeqCst);
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        (format!("http://{address}"), requests)
    }

    #[tokio::test]
    async fn throttled_request_is_sent_once() {
        let (base_uri, requests) = serve(
            "HTTP/1.1 429 Too Many Requests\r\n\
             retry-after: 30\r\n\
             content-type: application/json\r\n\
             content-length: 2\r\n\
             connection: close\r\n\r\n{}",
        )
        .await;
        let tracker = GitHubTracker::with_base_uri("token", &base_uri).unwrap();

        let result = tracker.list_items(&RepoRef::new("octo", "source")).await;

        match result {
            Err(TrackerError::RateLimited(info)) => {
                assert_eq!(info.retry_after, Some(Duration::from_secs(30)));
            }
            other => panic!("expected a rate limit error, got {other:?}"),
        }
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_create_is_not_resent() {
        let (base_uri, requests) = serve(
            "HTTP/1.1 502 Bad Gateway\r\n\
             content-type: application/json\r\n\
             content-length: 26\r\n\
             connection: close\r\n\r\n{\"message\":\"Server Error\"}",
        )
        .await;
        let tracker = GitHubTracker::with_base_uri("token", &base_uri).unwrap();
        let item = NewItem {
            title: "Bug A".to_string(),
            body: "body".to_string(),
            labels: Vec::new(),
        };

        let result = tracker
            .create_item(&RepoRef::new("octo", "target"), &item)
            .await;

        assert!(matches!(
            result,
            Err(TrackerError::Api { status: 502, .. })
        ));
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn converts_issue_payload() {
        let payload: IssuePayload = serde_json::from_str(
            r#"{
                "number": 7,
                "title": "Bug A",
                "body": "It broke",
                "labels": [{"name": "bug", "color": "d73a4a"}, {"name": "bug"}],
                "state": "open",
                "created_at": "2023-04-01T10:00:00Z",
                "html_url": "https://github.com/octo/source/issues/7",
                "pull_request": null
            }"#,
        )
        .unwrap();

        let item = Item::from(payload);

        assert_eq!(item.number, 7);
        assert_eq!(item.title, "Bug A");
        assert_eq!(item.body.as_deref(), Some("It broke"));
        assert_eq!(item.labels, vec!["bug".to_string()]);
        assert_eq!(item.state, ItemState::Open);
        assert_eq!(item.kind, ItemKind::Issue);
        assert_eq!(item.html_url, "https://github.com/octo/source/issues/7");
    }

    #[test]
    fn detects_pull_request_records() {
        let payload: IssuePayload = serde_json::from_str(
            r#"{
                "number": 8,
                "title": "Fix it",
                "body": null,
                "state": "closed",
                "created_at": "2023-04-02T10:00:00Z",
                "html_url": "https://github.com/octo/source/pull/8",
                "pull_request": {"url": "https://api.github.com/repos/octo/source/pulls/8"}
            }"#,
        )
        .unwrap();

        let item = Item::from(payload);

        assert_eq!(item.kind, ItemKind::PullRequest);
        assert_eq!(item.state, ItemState::Closed);
        assert_eq!(item.body_text(), "");
        assert!(item.labels.is_empty());
    }

    #[test]
    fn converts_comment_payload() {
        let payload: CommentPayload = serde_json::from_str(
            r#"{
                "id": 99,
                "user": {"login": "octocat"},
                "created_at": "2023-04-01T11:00:00Z",
                "body": "Same here"
            }"#,
        )
        .unwrap();

        let comment = payload.into_comment(7);

        assert_eq!(comment.id, 99);
        assert_eq!(comment.item_number, 7);
        assert_eq!(comment.author, "octocat");
        assert_eq!(comment.body, "Same here");
    }

    #[test]
    fn deleted_authors_become_ghost() {
        let payload: CommentPayload = serde_json::from_str(
            r#"{"id": 1, "user": null, "created_at": "2023-04-01T11:00:00Z", "body": null}"#,
        )
        .unwrap();

        let comment = payload.into_comment(3);
        assert_eq!(comment.author, "ghost");
        assert_eq!(comment.body, "");
    }
}
