//! Version-control seam: the `VcsPort` trait, the `git` CLI implementation,
//! and working-tree state inspection used by the submission preconditions.
//!
//! All mutating git operations are invoked by the orchestrator through this
//! port; the inspection helpers here are read-only.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{WorkflowError, WorkflowResult};
use crate::util::exec::{ExecRequest, ExecService};

/// Per-git-command ceiling; a push to a slow remote still fits comfortably.
const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the lifecycle needs from the local repository. Kept small so a
/// fake in-memory implementation can drive the orchestrator in tests.
pub trait VcsPort {
    fn inside_work_tree(&self) -> bool;
    fn current_branch(&self) -> WorkflowResult<String>;
    /// `git status --porcelain` output; empty means clean.
    fn status_porcelain(&self) -> WorkflowResult<String>;
    fn checkout(&self, branch: &str) -> WorkflowResult<()>;
    fn create_branch(&self, branch: &str) -> WorkflowResult<()>;
    fn stage_all(&self) -> WorkflowResult<()>;
    fn commit(&self, message: &str) -> WorkflowResult<()>;
    fn push(&self, branch: &str, set_upstream: bool) -> WorkflowResult<()>;
    /// `refs/remotes/origin/HEAD` symbolic target, if recorded.
    fn remote_head(&self) -> WorkflowResult<String>;
    /// Remote branch names with the `origin/` prefix stripped, HEAD excluded.
    fn remote_branches(&self) -> WorkflowResult<Vec<String>>;
}

/// Working-tree snapshot derived fresh on every orchestration run. Purely
/// local; the pull-request base is resolved separately via [`default_branch`]
/// when a run actually needs it.
#[derive(Debug, Clone)]
pub struct RepoSnapshot {
    pub current_branch: String,
    pub is_dirty: bool,
}

impl RepoSnapshot {
    pub fn capture(vcs: &dyn VcsPort) -> WorkflowResult<Self> {
        Ok(Self {
            current_branch: vcs.current_branch()?,
            is_dirty: !vcs.status_porcelain()?.is_empty(),
        })
    }
}

/// Branch names prefixed `feat/` or `feature/` mark in-progress work.
pub fn is_feature_branch(branch: &str) -> bool {
    branch.starts_with("feat/") || branch.starts_with("feature/")
}

/// Resolve the base branch for pull requests. Each step that fails falls
/// through to the next; this never errors.
///
/// Order: remote HEAD symbolic ref, then conventional candidates among the
/// remote branches (`main`, `master`, `develop`, `dev`), then the first
/// remote branch, then the literal `main`. The final fallback is inherited
/// behavior and may silently target the wrong base in unusual repository
/// configurations.
pub fn default_branch(vcs: &dyn VcsPort) -> String {
    if let Ok(head) = vcs.remote_head() {
        let name = head.trim().trim_start_matches("refs/remotes/origin/");
        if !name.is_empty() {
            return name.to_string();
        }
    }

    if let Ok(branches) = vcs.remote_branches() {
        for candidate in ["main", "master", "develop", "dev"] {
            if branches.iter().any(|b| b == candidate) {
                return candidate.to_string();
            }
        }
        if let Some(first) = branches.first() {
            return first.clone();
        }
    }

    "main".to_string()
}

/// Fatal unless there is something to submit: either uncommitted changes, or
/// a checked-out feature branch whose commits can be pushed as-is.
pub fn ensure_ready(vcs: &dyn VcsPort) -> WorkflowResult<RepoSnapshot> {
    if !vcs.inside_work_tree() {
        return Err(WorkflowError::Vcs("not in a git repository".to_string()));
    }
    let snapshot = RepoSnapshot::capture(vcs)?;
    if !snapshot.is_dirty && !is_feature_branch(&snapshot.current_branch) {
        return Err(WorkflowError::Vcs(
            "no changes to commit and not on a feature branch; \
             either make changes first, or switch to your feature branch"
                .to_string(),
        ));
    }
    Ok(snapshot)
}

/// `git` CLI adapter over the structured exec service.
pub struct GitCli {
    exec: ExecService,
    cwd: Option<PathBuf>,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            exec: ExecService::new(GIT_TIMEOUT),
            cwd: None,
        }
    }

    pub fn with_cwd(dir: impl Into<PathBuf>) -> Self {
        Self {
            exec: ExecService::new(GIT_TIMEOUT),
            cwd: Some(dir.into()),
        }
    }

    fn git(&self, args: &[&str]) -> WorkflowResult<String> {
        let mut req = ExecRequest::new("git").args(args.iter().copied());
        if let Some(ref cwd) = self.cwd {
            req = req.cwd(cwd);
        }
        let out = self.exec.run(req).map_err(|e| {
            match e.root_cause().downcast_ref::<io::Error>() {
                // Spawn failure with NotFound means the git binary itself is
                // absent, which maps to exit 127 rather than a git failure.
                Some(ioe) if ioe.kind() == io::ErrorKind::NotFound => {
                    WorkflowError::CommandNotFound("git".to_string())
                }
                _ => WorkflowError::Vcs(format!("git {}: {e}", args.join(" "))),
            }
        })?;
        if !out.status.success() {
            let stderr = out.stderr.trim();
            return Err(WorkflowError::Vcs(format!(
                "git {} failed: {}",
                args.join(" "),
                if stderr.is_empty() {
                    out.stdout.trim()
                } else {
                    stderr
                }
            )));
        }
        Ok(out.stdout_trimmed())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl VcsPort for GitCli {
    fn inside_work_tree(&self) -> bool {
        self.git(&["rev-parse", "--git-dir"]).is_ok()
    }

    fn current_branch(&self) -> WorkflowResult<String> {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn status_porcelain(&self) -> WorkflowResult<String> {
        self.git(&["status", "--porcelain"])
    }

    fn checkout(&self, branch: &str) -> WorkflowResult<()> {
        self.git(&["checkout", branch]).map(|_| ())
    }

    fn create_branch(&self, branch: &str) -> WorkflowResult<()> {
        self.git(&["checkout", "-b", branch]).map(|_| ())
    }

    fn stage_all(&self) -> WorkflowResult<()> {
        self.git(&["add", "."]).map(|_| ())
    }

    fn commit(&self, message: &str) -> WorkflowResult<()> {
        self.git(&["commit", "-m", message]).map(|_| ())
    }

    fn push(&self, branch: &str, set_upstream: bool) -> WorkflowResult<()> {
        if set_upstream {
            self.git(&["push", "-u", "origin", branch]).map(|_| ())
        } else {
            self.git(&["push", "origin", branch]).map(|_| ())
        }
    }

    fn remote_head(&self) -> WorkflowResult<String> {
        self.git(&["symbolic-ref", "refs/remotes/origin/HEAD"])
    }

    fn remote_branches(&self) -> WorkflowResult<Vec<String>> {
        let out = self.git(&["branch", "-r"])?;
        Ok(out
            .lines()
            .map(|line| line.trim().trim_start_matches("origin/").to_string())
            .filter(|b| !b.is_empty() && !b.contains("HEAD"))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_branch_prefixes() {
        assert!(is_feature_branch("feat/42-add-dark-mode"));
        assert!(is_feature_branch("feature/login"));
        assert!(!is_feature_branch("main"));
        assert!(!is_feature_branch("fix/42"));
        assert!(!is_feature_branch("featx/42"));
    }
}
