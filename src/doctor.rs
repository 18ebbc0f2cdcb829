//! Environment diagnostics for the `doctor` subcommand. Read-only; never
//! prints secret values, only which keys are present.

use std::path::Path;

use which::which;

use crate::config::{REPO_KEY, TOKEN_KEY};
use crate::envfile;
use crate::vcs::{GitCli, VcsPort};

pub fn run(start_dir: &Path) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("prflow doctor");
    eprintln!("  version: v{version}");
    eprintln!(
        "  build: {} ({}, {})",
        env!("PRFLOW_BUILD_DATE"),
        env!("PRFLOW_BUILD_TARGET"),
        env!("PRFLOW_BUILD_PROFILE")
    );
    eprintln!("  rustc: {}", env!("PRFLOW_BUILD_RUSTC"));
    eprintln!("  host: {} / {}", std::env::consts::OS, std::env::consts::ARCH);

    match which("git") {
        Ok(p) => {
            eprintln!("  git: {}", p.display());
            let git = GitCli::with_cwd(start_dir);
            eprintln!(
                "  repository: {}",
                if git.inside_work_tree() {
                    "detected"
                } else {
                    "not found"
                }
            );
            if git.inside_work_tree() {
                match git.current_branch() {
                    Ok(b) => eprintln!("  current branch: {b}"),
                    Err(e) => eprintln!("  current branch: unavailable ({e})"),
                }
            }
        }
        Err(e) => {
            eprintln!("  git: not found ({e})");
        }
    }

    match envfile::locate(start_dir) {
        Some(env_path) => {
            eprintln!("  env file: {}", env_path.display());
            let vars = std::fs::read_to_string(&env_path)
                .map(|content| envfile::parse_env(&content))
                .unwrap_or_default();
            for key in [TOKEN_KEY, REPO_KEY] {
                eprintln!(
                    "  {key}: {}",
                    if envfile::env_get(&vars, key).is_some() {
                        "present"
                    } else {
                        "missing"
                    }
                );
            }
        }
        None => {
            eprintln!("  env file: not found in directory hierarchy");
        }
    }

    eprintln!("doctor: completed diagnostics.");
}
