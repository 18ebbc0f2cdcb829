//! GitHub REST collaborator: issue/PR data types, the `IssueTrackerPort`
//! seam, and the blocking HTTP client behind it.
//!
//! Every request is attempted exactly once with a fixed 30-second ceiling.
//! Any status >= 400 surfaces as `WorkflowError::RemoteApi` carrying the
//! parsed error payload (or raw text when the body isn't JSON).

use std::time::Duration;

use serde::Deserialize;

use crate::errors::{WorkflowError, WorkflowResult};

const GITHUB_API: &str = "https://api.github.com";
const USER_AGENT: &str = "prflow-toolkit";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable issue snapshot, fetched once per run and never mutated locally.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub user: Author,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub login: String,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            login: "unknown".to_string(),
        }
    }
}

/// One issue comment, in the order the API returned it (oldest first).
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub user: Author,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub html_url: String,
}

/// In-memory PR draft; submitted or printed, never persisted.
#[derive(Debug, Clone)]
pub struct PullRequestDraft {
    pub branch: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Remote issue-tracker seam. The production implementation is
/// [`GithubClient`]; tests drive the orchestrator through a recording fake.
pub trait IssueTrackerPort {
    fn fetch_issue(&self, issue_number: u64) -> WorkflowResult<Issue>;
    fn fetch_comments(&self, issue_number: u64) -> WorkflowResult<Vec<Comment>>;
    fn create_issue(&self, title: &str, body: &str, labels: &[&str]) -> WorkflowResult<Issue>;
    fn create_pull_request(&self, draft: &PullRequestDraft) -> WorkflowResult<PullRequest>;
    fn comment_on_issue(&self, issue_number: u64, body: &str) -> WorkflowResult<()>;
}

pub struct GithubClient {
    http: reqwest::blocking::Client,
    token: String,
    owner: String,
    repo: String,
}

impl GithubClient {
    pub fn new(token: &str, owner: &str, repo: &str) -> WorkflowResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WorkflowError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            token: token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    fn url(&self, suffix: &str) -> String {
        format!("{GITHUB_API}/repos/{}/{}/{suffix}", self.owner, self.repo)
    }

    fn send(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> WorkflowResult<reqwest::blocking::Response> {
        let resp = req
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .map_err(|e| WorkflowError::RemoteApi {
                status: 0,
                detail: e.to_string(),
            })?;

        let status = resp.status();
        if status.as_u16() >= 400 {
            let text = resp.text().unwrap_or_default();
            let detail = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str().map(String::from)))
                .unwrap_or(text);
            return Err(WorkflowError::RemoteApi {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(resp)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, suffix: &str) -> WorkflowResult<T> {
        let resp = self.send(self.http.get(self.url(suffix)))?;
        resp.json().map_err(|e| WorkflowError::RemoteApi {
            status: 0,
            detail: format!("malformed response payload: {e}"),
        })
    }

    fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        suffix: &str,
        payload: &serde_json::Value,
    ) -> WorkflowResult<T> {
        let resp = self.send(self.http.post(self.url(suffix)).json(payload))?;
        resp.json().map_err(|e| WorkflowError::RemoteApi {
            status: 0,
            detail: format!("malformed response payload: {e}"),
        })
    }
}

impl IssueTrackerPort for GithubClient {
    fn fetch_issue(&self, issue_number: u64) -> WorkflowResult<Issue> {
        self.get_json(&format!("issues/{issue_number}"))
    }

    fn fetch_comments(&self, issue_number: u64) -> WorkflowResult<Vec<Comment>> {
        self.get_json(&format!("issues/{issue_number}/comments"))
    }

    fn create_issue(&self, title: &str, body: &str, labels: &[&str]) -> WorkflowResult<Issue> {
        self.post_json(
            "issues",
            &serde_json::json!({
                "title": title,
                "body": body,
                "labels": labels,
            }),
        )
    }

    fn create_pull_request(&self, draft: &PullRequestDraft) -> WorkflowResult<PullRequest> {
        self.post_json(
            "pulls",
            &serde_json::json!({
                "title": draft.title,
                "head": draft.branch,
                "base": draft.base,
                "body": draft.body,
            }),
        )
    }

    fn comment_on_issue(&self, issue_number: u64, body: &str) -> WorkflowResult<()> {
        let _: serde_json::Value = self.post_json(
            &format!("issues/{issue_number}/comments"),
            &serde_json::json!({ "body": body }),
        )?;
        Ok(())
    }
}
