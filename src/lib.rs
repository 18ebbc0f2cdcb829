//! prflow — issue-to-pull-request workflow automation.
//!
//! The crate pulls a GitHub issue's full discussion into a local plan
//! document (`generate`), and later turns a completed local change into a
//! branch, commit, pushed ref and pull request back-linked to the issue
//! (`submit`). Supporting flows post task drafts as issues and manage the
//! env template the tool adds to a project.
//!
//! Seams for testing: git operations go through [`vcs::VcsPort`], remote
//! calls through [`github::IssueTrackerPort`], and console output through
//! [`report::Reporter`].

pub mod color;
pub mod compose;
pub mod config;
pub mod doctor;
pub mod envfile;
pub mod errors;
pub mod github;
pub mod install;
pub mod names;
pub mod report;
pub mod util;
pub mod vcs;
pub mod workflow;

pub use color::{color_enabled_stderr, color_enabled_stdout, paint, set_color_mode, ColorMode};
pub use errors::{exit_code_for_workflow_error, WorkflowError, WorkflowResult};
pub use github::{Comment, GithubClient, Issue, IssueTrackerPort, PullRequest, PullRequestDraft};
pub use report::{ConsoleReporter, Reporter};
pub use vcs::{GitCli, RepoSnapshot, VcsPort};
pub use workflow::{Orchestrator, SubmitOptions, SubmitOutcome};
