//! Credential/repository configuration, layered from the process environment
//! and the nearest `.env` file found by upward search.
//!
//! File values override process-environment values, matching the original
//! toolkit scripts this workflow replaces.

use std::path::{Path, PathBuf};

use crate::envfile;
use crate::errors::{WorkflowError, WorkflowResult};

pub const TOKEN_KEY: &str = "GITHUB_TOKEN";
pub const REPO_KEY: &str = "GITHUB_REPO";

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub owner: String,
    pub repo: String,
    /// Where the values came from, for diagnostics.
    pub env_path: Option<PathBuf>,
}

impl Config {
    /// Load and validate configuration starting the `.env` search at `start_dir`.
    pub fn load(start_dir: &Path) -> WorkflowResult<Self> {
        let env_path = envfile::locate(start_dir);
        let mut token = std::env::var(TOKEN_KEY).ok();
        let mut repo = std::env::var(REPO_KEY).ok();

        if let Some(ref path) = env_path {
            let content = std::fs::read_to_string(path)?;
            let vars = envfile::parse_env(&content);
            if let Some(v) = envfile::env_get(&vars, TOKEN_KEY) {
                token = Some(v.to_string());
            }
            if let Some(v) = envfile::env_get(&vars, REPO_KEY) {
                repo = Some(v.to_string());
            }
        }

        let token = token.filter(|t| !t.is_empty()).ok_or_else(|| {
            WorkflowError::Config(format!("missing {TOKEN_KEY}; set it in your .env file"))
        })?;
        let repo_full = repo.filter(|r| !r.is_empty()).ok_or_else(|| {
            WorkflowError::Config(format!(
                "missing {REPO_KEY}; set it in your .env file (owner/repo)"
            ))
        })?;

        let (owner, repo) = split_repo(&repo_full)?;
        Ok(Self {
            token,
            owner,
            repo,
            env_path,
        })
    }
}

/// Split `owner/name`; anything other than exactly one non-empty pair is a
/// configuration error.
pub fn split_repo(full: &str) -> WorkflowResult<(String, String)> {
    let mut parts = full.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(WorkflowError::Config(format!(
            "{REPO_KEY} must use owner/repo format, got {full:?}"
        ))),
    }
}
