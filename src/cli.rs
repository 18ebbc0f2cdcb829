use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Run diagnostics to check environment and configuration
    Doctor,

    /// Fetch a GitHub issue and write its plan document under plans/active/
    Generate {
        /// GitHub issue number
        issue_number: u64,
    },

    /// Turn the current work into a branch, commit, push and pull request
    Submit {
        /// GitHub issue number the work implements
        #[arg(long)]
        issue: u64,

        /// Path to developer notes to embed in the PR body
        #[arg(long = "notes-file")]
        notes_file: Option<PathBuf>,

        /// Skip embedding Implementation Notes from the plan document
        #[arg(long = "no-prp-notes")]
        no_prp_notes: bool,

        /// Collapse Implementation Notes in the PR body
        #[arg(long = "collapse-prp-notes")]
        collapse_prp_notes: bool,

        /// Preview the PR body without touching git or creating the PR
        #[arg(long = "dry-run", short = 'n')]
        dry_run: bool,
    },

    /// Post a task draft markdown file as a new GitHub issue
    Post {
        /// Path to the draft (first `# ` heading becomes the title)
        draft: PathBuf,
    },

    /// Add the workflow's env template to the current project
    Install,

    /// Remove the workflow's env additions from the current project
    Uninstall,
}

#[derive(Parser, Debug)]
#[command(
    name = "prflow",
    version,
    about = "Pull a GitHub issue into a local plan document, then turn finished work into a branch, commit, push and linked PR.",
    after_long_help = "Examples:\n  prflow generate 42\n  prflow submit --issue=42\n  prflow submit --issue=42 --notes-file=temp/pr-notes.md\n  prflow submit --issue=42 --dry-run\n"
)]
pub(crate) struct Cli {
    /// Print detailed execution info
    #[arg(long)]
    pub(crate) verbose: bool,

    /// Colorize output: auto|always|never
    #[arg(long = "color", value_enum)]
    pub(crate) color: Option<prflow::ColorMode>,

    #[command(subcommand)]
    pub(crate) command: Command,
}
