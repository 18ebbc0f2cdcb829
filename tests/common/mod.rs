//! Shared fakes for driving the orchestrator without a real repository or
//! network: an in-memory `VcsPort` and a recording `IssueTrackerPort`.

#![allow(dead_code)]

use std::cell::RefCell;

use prflow::errors::{WorkflowError, WorkflowResult};
use prflow::github::{Author, Comment, Issue, IssueTrackerPort, PullRequest, PullRequestDraft};
use prflow::vcs::VcsPort;

pub fn issue(number: u64, title: &str) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        body: Some("Please implement this.".to_string()),
        state: "open".to_string(),
        user: Author {
            login: "octocat".to_string(),
        },
        created_at: "2024-03-01T10:00:00Z".to_string(),
        html_url: format!("https://github.com/o/r/issues/{number}"),
    }
}

pub fn comment(body: &str) -> Comment {
    Comment {
        user: Author {
            login: "reviewer".to_string(),
        },
        created_at: "2024-03-02T08:00:00Z".to_string(),
        body: body.to_string(),
    }
}

/// In-memory repository double. Records every operation in order so tests
/// can assert on the exact git sequence the orchestrator drove.
pub struct FakeVcs {
    pub inside: bool,
    pub branch: RefCell<String>,
    pub dirty: RefCell<bool>,
    pub remote_head: Option<String>,
    pub remote_branches: Vec<String>,
    pub fail_upstream_push: bool,
    pub fail_checkout: bool,
    pub ops: RefCell<Vec<String>>,
    /// Counts remote_head/remote_branches lookups, which hit the network on
    /// a real repository.
    pub remote_queries: RefCell<usize>,
}

impl FakeVcs {
    pub fn new(branch: &str, dirty: bool) -> Self {
        Self {
            inside: true,
            branch: RefCell::new(branch.to_string()),
            dirty: RefCell::new(dirty),
            remote_head: Some("refs/remotes/origin/main".to_string()),
            remote_branches: vec!["main".to_string()],
            fail_upstream_push: false,
            fail_checkout: false,
            ops: RefCell::new(Vec::new()),
            remote_queries: RefCell::new(0),
        }
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.borrow().clone()
    }

    fn record(&self, op: String) {
        self.ops.borrow_mut().push(op);
    }
}

impl VcsPort for FakeVcs {
    fn inside_work_tree(&self) -> bool {
        self.inside
    }

    fn current_branch(&self) -> WorkflowResult<String> {
        Ok(self.branch.borrow().clone())
    }

    fn status_porcelain(&self) -> WorkflowResult<String> {
        Ok(if *self.dirty.borrow() {
            " M src/lib.rs".to_string()
        } else {
            String::new()
        })
    }

    fn checkout(&self, branch: &str) -> WorkflowResult<()> {
        self.record(format!("checkout {branch}"));
        if self.fail_checkout {
            return Err(WorkflowError::Vcs(format!("cannot checkout {branch}")));
        }
        *self.branch.borrow_mut() = branch.to_string();
        Ok(())
    }

    fn create_branch(&self, branch: &str) -> WorkflowResult<()> {
        self.record(format!("create-branch {branch}"));
        *self.branch.borrow_mut() = branch.to_string();
        Ok(())
    }

    fn stage_all(&self) -> WorkflowResult<()> {
        self.record("stage-all".to_string());
        Ok(())
    }

    fn commit(&self, message: &str) -> WorkflowResult<()> {
        self.record(format!("commit {message}"));
        *self.dirty.borrow_mut() = false;
        Ok(())
    }

    fn push(&self, branch: &str, set_upstream: bool) -> WorkflowResult<()> {
        self.record(format!(
            "push {branch}{}",
            if set_upstream { " -u" } else { "" }
        ));
        if set_upstream && self.fail_upstream_push {
            return Err(WorkflowError::Vcs("upstream push rejected".to_string()));
        }
        Ok(())
    }

    fn remote_head(&self) -> WorkflowResult<String> {
        *self.remote_queries.borrow_mut() += 1;
        self.remote_head
            .clone()
            .ok_or_else(|| WorkflowError::Vcs("no remote HEAD".to_string()))
    }

    fn remote_branches(&self) -> WorkflowResult<Vec<String>> {
        *self.remote_queries.borrow_mut() += 1;
        if self.remote_branches.is_empty() {
            return Err(WorkflowError::Vcs("no remote branches".to_string()));
        }
        Ok(self.remote_branches.clone())
    }
}

/// Recording issue-tracker double.
pub struct FakeTracker {
    pub issue: Issue,
    pub comments: Vec<Comment>,
    pub fail_fetch_issue: bool,
    pub fail_fetch_comments: bool,
    pub fail_comment_post: bool,
    pub created_prs: RefCell<Vec<PullRequestDraft>>,
    pub posted_comments: RefCell<Vec<(u64, String)>>,
    pub created_issues: RefCell<Vec<(String, String, Vec<String>)>>,
}

impl FakeTracker {
    pub fn new(issue: Issue) -> Self {
        Self {
            issue,
            comments: Vec::new(),
            fail_fetch_issue: false,
            fail_fetch_comments: false,
            fail_comment_post: false,
            created_prs: RefCell::new(Vec::new()),
            posted_comments: RefCell::new(Vec::new()),
            created_issues: RefCell::new(Vec::new()),
        }
    }
}

impl IssueTrackerPort for FakeTracker {
    fn fetch_issue(&self, issue_number: u64) -> WorkflowResult<Issue> {
        if self.fail_fetch_issue {
            return Err(WorkflowError::RemoteApi {
                status: 404,
                detail: format!("issue #{issue_number} not found"),
            });
        }
        Ok(self.issue.clone())
    }

    fn fetch_comments(&self, _issue_number: u64) -> WorkflowResult<Vec<Comment>> {
        if self.fail_fetch_comments {
            return Err(WorkflowError::RemoteApi {
                status: 500,
                detail: "comments unavailable".to_string(),
            });
        }
        Ok(self.comments.clone())
    }

    fn create_issue(&self, title: &str, body: &str, labels: &[&str]) -> WorkflowResult<Issue> {
        self.created_issues.borrow_mut().push((
            title.to_string(),
            body.to_string(),
            labels.iter().map(|l| l.to_string()).collect(),
        ));
        let mut created = self.issue.clone();
        created.title = title.to_string();
        Ok(created)
    }

    fn create_pull_request(&self, draft: &PullRequestDraft) -> WorkflowResult<PullRequest> {
        self.created_prs.borrow_mut().push(draft.clone());
        Ok(PullRequest {
            number: 99,
            html_url: "https://github.com/o/r/pull/99".to_string(),
        })
    }

    fn comment_on_issue(&self, issue_number: u64, body: &str) -> WorkflowResult<()> {
        if self.fail_comment_post {
            return Err(WorkflowError::RemoteApi {
                status: 403,
                detail: "comment forbidden".to_string(),
            });
        }
        self.posted_comments
            .borrow_mut()
            .push((issue_number, body.to_string()));
        Ok(())
    }
}
