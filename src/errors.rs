//! Error mapping guide:
//! - Every fatal workflow error exits 1; 127 is reserved for a required
//!   external binary (git) that cannot be found or spawned.
//! - Fatal workflow errors abort the remaining lifecycle steps.
//! - Secondary remote operations (fetch comments, post comment) are reported as
//!   warnings by the orchestrator and never reach this mapping.

use std::fmt;
use std::io;

/// Fatal error taxonomy for the issue/PR lifecycle.
#[derive(Debug)]
pub enum WorkflowError {
    /// Missing or malformed credential / repo identifier, or an unreadable
    /// user-supplied input file.
    Config(String),
    /// Not a repository, an invalid precondition for submission, or a failed
    /// git command.
    Vcs(String),
    /// Non-2xx response from the issue tracker, with parsed detail.
    RemoteApi { status: u16, detail: String },
    /// Local file read/write failure.
    Io(io::Error),
    /// A required external binary could not be found or spawned.
    CommandNotFound(String),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::Config(msg) => write!(f, "configuration error: {msg}"),
            WorkflowError::Vcs(msg) => write!(f, "git error: {msg}"),
            WorkflowError::RemoteApi { status, detail } => {
                write!(f, "GitHub API error ({status}): {detail}")
            }
            WorkflowError::Io(e) => write!(f, "i/o error: {e}"),
            WorkflowError::CommandNotFound(name) => write!(f, "command not found: {name}"),
        }
    }
}

impl std::error::Error for WorkflowError {}

impl From<io::Error> for WorkflowError {
    fn from(e: io::Error) -> Self {
        WorkflowError::Io(e)
    }
}

/// Convert WorkflowError to exit code: 127 for a missing binary, 1 otherwise.
pub fn exit_code_for_workflow_error(e: &WorkflowError) -> u8 {
    match e {
        WorkflowError::CommandNotFound(_) => 127,
        _ => 1,
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
