//! Top-level lifecycle orchestration: generate a plan document from an
//! issue, submit finished work as a pull request, post a drafted issue.
//!
//! The submit flow is a strict step sequence — validate, fetch, branch,
//! push, open PR, comment back, restore — where any fatal error aborts the
//! remaining steps and nothing already pushed or created is rolled back.
//! Secondary steps (comment, restore) only warn on failure.

use std::path::{Path, PathBuf};

use time::OffsetDateTime;

use crate::compose;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::github::{Issue, IssueTrackerPort, PullRequestDraft};
use crate::names;
use crate::report::Reporter;
use crate::util::fs::ensure_dir;
use crate::vcs::{self, VcsPort};

/// Directory (relative to the project root) holding active plan documents.
pub const PLANS_ACTIVE_DIR: &str = "plans/active";

/// Labels attached to issues created from task drafts.
const DRAFT_ISSUE_LABELS: [&str; 2] = ["prflow", "feature-request"];

pub struct Orchestrator<'a> {
    vcs: &'a dyn VcsPort,
    tracker: &'a dyn IssueTrackerPort,
    reporter: &'a dyn Reporter,
    project_root: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    pub issue: u64,
    pub notes_file: Option<PathBuf>,
    /// Skip Implementation Notes extraction from the plan document.
    pub no_plan_notes: bool,
    /// Force the collapsible rendering regardless of length.
    pub collapse_plan_notes: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub pr_url: String,
    pub pr_number: u64,
    pub branch: String,
    pub dry_run: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        vcs: &'a dyn VcsPort,
        tracker: &'a dyn IssueTrackerPort,
        reporter: &'a dyn Reporter,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            vcs,
            tracker,
            reporter,
            project_root: project_root.into(),
        }
    }

    /// Fetch an issue and its discussion and write the plan document under
    /// `plans/active/`. Comment-fetch failure degrades to an empty
    /// discussion with a warning; issue-fetch failure is fatal.
    pub fn generate(&self, issue_number: u64) -> WorkflowResult<PathBuf> {
        self.reporter.info(&format!(
            "Fetching complete context for issue #{issue_number}..."
        ));

        let issue = self.fetch_issue(issue_number)?;
        self.reporter
            .success(&format!("Retrieved issue: \"{}\"", issue.title));

        let comments = match self.tracker.fetch_comments(issue_number) {
            Ok(comments) => comments,
            Err(e) => {
                self.reporter
                    .warn(&format!("could not fetch comments for issue #{issue_number}: {e}"));
                Vec::new()
            }
        };
        if !comments.is_empty() {
            self.reporter.info(&format!(
                "Found {} comments with additional context",
                comments.len()
            ));
        }

        let document =
            compose::issue_context_document(&issue, &comments, OffsetDateTime::now_utc());
        let filename = names::plan_filename(issue_number, &issue.title);

        let active_dir = self.project_root.join(PLANS_ACTIVE_DIR);
        ensure_dir(&active_dir)?;
        let output_path = active_dir.join(&filename);
        std::fs::write(&output_path, document)?;

        self.reporter.success("Complete context saved!");
        self.reporter
            .info(&format!("File: {PLANS_ACTIVE_DIR}/{filename}"));
        self.reporter.info(&format!(
            "Ready to submit with: prflow submit --issue={issue_number}"
        ));
        Ok(output_path)
    }

    /// Drive the submission state machine through to an opened PR (or a
    /// printed preview in dry-run).
    pub fn submit(&self, opts: &SubmitOptions) -> WorkflowResult<SubmitOutcome> {
        let issue_number = opts.issue;
        let developer_notes = read_notes(opts.notes_file.as_deref())?;
        if opts.notes_file.is_some() {
            self.reporter.info("Loaded developer notes");
        }

        self.reporter.info(&format!(
            "Starting PR submission for issue #{issue_number}..."
        ));

        // Idle -> Validated. Dry-run skips all git validation and mutation.
        if opts.dry_run {
            self.reporter.info("Dry run: skipping git repository checks");
        } else {
            let snapshot = vcs::ensure_ready(self.vcs)?;
            if !snapshot.is_dirty {
                self.reporter.info(&format!(
                    "No uncommitted changes found, but you're on a feature branch ({}); \
                     will push existing commits and create the PR",
                    snapshot.current_branch
                ));
            }
        }

        let default_branch = if opts.dry_run {
            self.reporter
                .info("Dry run: skipping default branch detection (using \"main\")");
            "main".to_string()
        } else {
            self.reporter.info("Detecting default branch...");
            let branch = vcs::default_branch(self.vcs);
            self.reporter
                .success(&format!("Default branch: {branch}"));
            branch
        };

        // Validated -> IssueFetched. Fatal on failure, no retry.
        self.reporter
            .info(&format!("Fetching issue #{issue_number}..."));
        let issue = self.fetch_issue(issue_number)?;
        self.reporter
            .success(&format!("Retrieved: \"{}\"", issue.title));

        let branch_name = names::branch_name(issue_number, &issue.title);
        let commit_message = names::commit_message(issue_number, &issue.title);
        self.reporter.info(&format!("Branch: {branch_name}"));
        self.reporter.info(&format!("Commit: {commit_message}"));

        let plan_file = find_plan_file(&self.project_root, issue_number);
        match plan_file {
            Some(ref name) => self
                .reporter
                .info(&format!("Found plan: {PLANS_ACTIVE_DIR}/{name}")),
            None => self
                .reporter
                .info(&format!("No plan document found for issue #{issue_number}")),
        }

        // IssueFetched -> Branched -> Pushed.
        let target_branch = if opts.dry_run {
            self.reporter.info("Dry run: skipping git operations");
            branch_name.clone()
        } else {
            self.branch_and_push(&branch_name, &commit_message)?
        };

        // Pushed -> PRCreated.
        let implementation_notes = if opts.no_plan_notes || opts.notes_file.is_some() {
            String::new()
        } else if let Some(ref name) = plan_file {
            let path = self.project_root.join(PLANS_ACTIVE_DIR).join(name);
            let notes = std::fs::read_to_string(&path)
                .map(|text| compose::extract_implementation_notes(&text))
                .unwrap_or_default();
            if notes.is_empty() {
                self.reporter
                    .info("No Implementation Notes section found in plan");
            } else {
                self.reporter
                    .info("Injecting Implementation Notes from plan into PR body");
            }
            notes
        } else {
            String::new()
        };

        let plan_reference = plan_file
            .as_ref()
            .map(|name| format!("{PLANS_ACTIVE_DIR}/{name}"));
        let body = compose::pr_body(
            issue_number,
            plan_reference.as_deref(),
            &developer_notes,
            &implementation_notes,
            opts.collapse_plan_notes,
        );

        // The title fallback applies only here; branch, commit and plan
        // filenames derive from the raw title through their own fallbacks.
        let title = if issue.title.is_empty() {
            format!("Issue #{issue_number}")
        } else {
            issue.title.clone()
        };
        let draft = PullRequestDraft {
            branch: target_branch.clone(),
            base: default_branch.clone(),
            title,
            body,
        };

        if opts.dry_run {
            self.reporter.info("===== DRY RUN: PR BODY PREVIEW =====");
            self.reporter.info(&draft.body);
            self.reporter.info("===== END PREVIEW =====");
            self.reporter
                .success("Dry-run complete. PR body preview shown above.");
            return Ok(SubmitOutcome {
                pr_url: "(dry-run)".to_string(),
                pr_number: 0,
                branch: target_branch,
                dry_run: true,
            });
        }

        self.reporter.info("Creating pull request...");
        let pr = self.tracker.create_pull_request(&draft)?;

        // PRCreated -> Commented. Non-fatal: the PR is the valuable artifact.
        match self
            .tracker
            .comment_on_issue(issue_number, &compose::issue_comment_body(&pr.html_url))
        {
            Ok(()) => self
                .reporter
                .success(&format!("Comment posted on issue #{issue_number}")),
            Err(e) => self
                .reporter
                .warn(&format!("could not comment on issue #{issue_number}: {e}")),
        }

        self.reporter.success("Pull Request created successfully!");
        self.reporter.info(&format!("URL: {}", pr.html_url));
        self.reporter.info("Status: Ready for review");

        // Commented -> Restored. Non-fatal.
        self.reporter
            .info(&format!("Switching back to {default_branch} branch..."));
        match self.vcs.checkout(&default_branch) {
            Ok(()) => self
                .reporter
                .success(&format!("Switched to {default_branch} branch")),
            Err(e) => self
                .reporter
                .warn(&format!("could not switch to {default_branch}: {e}")),
        }

        Ok(SubmitOutcome {
            pr_url: pr.html_url,
            pr_number: pr.number,
            branch: target_branch,
            dry_run: false,
        })
    }

    /// Parse a task draft and open it as a new issue.
    pub fn post_issue(&self, draft_path: &Path) -> WorkflowResult<Issue> {
        let content = std::fs::read_to_string(draft_path).map_err(|e| {
            WorkflowError::Config(format!(
                "cannot read task draft {}: {e}",
                draft_path.display()
            ))
        })?;
        let (title, body) = parse_task_draft(&content, draft_path)?;

        self.reporter
            .info(&format!("Posting issue \"{title}\"..."));
        let issue = self
            .tracker
            .create_issue(&title, &body, &DRAFT_ISSUE_LABELS)?;
        self.reporter
            .success(&format!("Issue #{} created", issue.number));
        self.reporter.info(&format!("URL: {}", issue.html_url));
        Ok(issue)
    }

    fn fetch_issue(&self, issue_number: u64) -> WorkflowResult<Issue> {
        let issue = self.tracker.fetch_issue(issue_number)?;
        if issue.title.is_empty() {
            self.reporter
                .warn(&format!("issue #{issue_number} has no title"));
        }
        Ok(issue)
    }

    /// Reuse a clean feature branch as-is, otherwise branch off HEAD and
    /// commit whatever is dirty; then push with upstream tracking, falling
    /// back to a plain push when upstream-setting fails on an existing
    /// branch.
    fn branch_and_push(
        &self,
        branch_name: &str,
        commit_message: &str,
    ) -> WorkflowResult<String> {
        let current_branch = self.vcs.current_branch()?;
        let dirty = !self.vcs.status_porcelain()?.is_empty();

        if vcs::is_feature_branch(&current_branch) && !dirty {
            self.reporter
                .info(&format!("Using existing feature branch: {current_branch}"));
            self.reporter.info("Pushing existing commits to remote...");
            if self.vcs.push(&current_branch, true).is_err() {
                self.vcs.push(&current_branch, false)?;
            }
            return Ok(current_branch);
        }

        self.reporter.info("Creating and switching to branch...");
        self.vcs.create_branch(branch_name)?;

        if dirty {
            self.reporter.info("Adding changes to staging...");
            self.vcs.stage_all()?;
            self.reporter.info("Committing changes...");
            self.vcs.commit(commit_message)?;
        }

        self.reporter.info("Pushing to remote...");
        self.vcs.push(branch_name, true)?;
        Ok(branch_name.to_string())
    }
}

/// First file in `plans/active/` named `{issue_number}-*.md`. Discovery is by
/// filename prefix, never by an index; absence is not an error.
pub fn find_plan_file(project_root: &Path, issue_number: u64) -> Option<String> {
    let active_dir = project_root.join(PLANS_ACTIVE_DIR);
    let prefix = format!("{issue_number}-");
    let mut entries: Vec<String> = std::fs::read_dir(active_dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(&prefix) && name.ends_with(".md"))
        .collect();
    entries.sort();
    entries.into_iter().next()
}

fn read_notes(path: Option<&Path>) -> WorkflowResult<String> {
    match path {
        None => Ok(String::new()),
        Some(p) => std::fs::read_to_string(p).map_err(|e| {
            WorkflowError::Config(format!("cannot read notes file {}: {e}", p.display()))
        }),
    }
}

/// Title comes from the first `# ` heading; the remaining non-blank lines
/// form the body. A missing heading derives the title from the file stem.
fn parse_task_draft(content: &str, path: &Path) -> WorkflowResult<(String, String)> {
    let mut title = String::new();
    let mut body_lines: Vec<&str> = Vec::new();
    let mut found_title = false;

    for line in content.lines() {
        if !found_title && line.starts_with("# ") {
            title = line[2..].trim().to_string();
            found_title = true;
            continue;
        }
        if found_title || !line.trim().is_empty() {
            body_lines.push(line);
        }
    }

    if title.is_empty() {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("task-draft");
        title = stem
            .replace("task-draft-", "Feature Request: ")
            .replace('-', " ");
    }

    let body = body_lines.join("\n").trim().to_string();
    if body.is_empty() {
        return Err(WorkflowError::Config(format!(
            "task draft {} appears empty or missing a recognizable body",
            path.display()
        )));
    }

    Ok((title, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_draft_title_from_heading() {
        let (title, body) =
            parse_task_draft("# Add Search\n\nWe need search.\n", Path::new("draft.md")).unwrap();
        assert_eq!(title, "Add Search");
        assert_eq!(body, "We need search.");
    }

    #[test]
    fn task_draft_title_from_stem_when_missing() {
        let (title, _) = parse_task_draft(
            "Just a body without heading.\n",
            Path::new("task-draft-add-search.md"),
        )
        .unwrap();
        assert_eq!(title, "Feature Request: add search");
    }

    #[test]
    fn task_draft_empty_body_is_an_error() {
        assert!(parse_task_draft("# Title Only\n\n\n", Path::new("d.md")).is_err());
    }

    #[test]
    fn plan_discovery_matches_prefix_only() {
        let tmp = tempfile::tempdir().unwrap();
        let active = tmp.path().join(PLANS_ACTIVE_DIR);
        std::fs::create_dir_all(&active).unwrap();
        std::fs::write(active.join("42-add-dark-mode.md"), "x").unwrap();
        std::fs::write(active.join("421-other.md"), "x").unwrap();
        std::fs::write(active.join("42-notes.txt"), "x").unwrap();

        assert_eq!(
            find_plan_file(tmp.path(), 42),
            Some("42-add-dark-mode.md".to_string())
        );
        assert_eq!(find_plan_file(tmp.path(), 7), None);
    }

    #[test]
    fn plan_discovery_missing_dir_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(find_plan_file(tmp.path(), 1), None);
    }
}
