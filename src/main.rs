use std::process::ExitCode;

use clap::Parser;

use prflow::config::Config;
use prflow::errors::exit_code_for_workflow_error;
use prflow::report::{ConsoleReporter, Reporter};
use prflow::util::fs::project_root;
use prflow::workflow::{Orchestrator, SubmitOptions};
use prflow::{GitCli, GithubClient, WorkflowResult};

mod cli;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    if let Some(mode) = cli.color {
        prflow::set_color_mode(mode);
    }

    let reporter = ConsoleReporter;
    let cwd = match std::env::current_dir() {
        Ok(d) => d,
        Err(e) => {
            reporter.error(&format!("cannot determine working directory: {e}"));
            return ExitCode::from(1);
        }
    };

    match run(&cli, &cwd, &reporter) {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            reporter.error(&e.to_string());
            ExitCode::from(exit_code_for_workflow_error(&e))
        }
    }
}

fn run(cli: &cli::Cli, cwd: &std::path::Path, reporter: &ConsoleReporter) -> WorkflowResult<()> {
    // Local-only commands never need credentials or the remote client.
    match &cli.command {
        cli::Command::Doctor => {
            prflow::doctor::run(cwd);
            return Ok(());
        }
        cli::Command::Install => return prflow::install::install(cwd, reporter),
        cli::Command::Uninstall => return prflow::install::uninstall(cwd, reporter),
        _ => {}
    }

    let config = Config::load(cwd)?;
    if cli.verbose {
        if let Some(ref env_path) = config.env_path {
            reporter.info(&format!("Loaded environment from: {}", env_path.display()));
        }
        reporter.info(&format!("Repository: {}/{}", config.owner, config.repo));
    }

    let git = GitCli::with_cwd(cwd);
    let tracker = GithubClient::new(&config.token, &config.owner, &config.repo)?;
    let orchestrator = Orchestrator::new(&git, &tracker, reporter, project_root(cwd));

    match &cli.command {
        cli::Command::Generate { issue_number } => {
            orchestrator.generate(*issue_number).map(|_| ())
        }

        cli::Command::Submit {
            issue,
            notes_file,
            no_prp_notes,
            collapse_prp_notes,
            dry_run,
        } => {
            let opts = SubmitOptions {
                issue: *issue,
                notes_file: notes_file.clone(),
                no_plan_notes: *no_prp_notes,
                collapse_plan_notes: *collapse_prp_notes,
                dry_run: *dry_run,
            };
            orchestrator.submit(&opts).map(|_| ())
        }

        cli::Command::Post { draft } => orchestrator.post_issue(draft).map(|_| ()),

        // Handled above.
        cli::Command::Doctor | cli::Command::Install | cli::Command::Uninstall => unreachable!(),
    }
}
