//! Install/uninstall flows for the project-local `.env.example` template.
//!
//! These are the only flows that touch the tool-managed env section; PR
//! submission never writes env files. Both operations are idempotent and
//! externally observable: a second install changes nothing, and uninstall
//! removes exactly what install added.

use std::path::Path;

use crate::envfile::{self, CleanupOutcome};
use crate::errors::WorkflowResult;
use crate::report::Reporter;

pub const ENV_EXAMPLE_NAME: &str = ".env.example";

/// Template written into new projects; the marker line keys the cleanup.
pub const ENV_TEMPLATE: &str = "\
# Prflow Environment Variables
GITHUB_TOKEN=your_github_token_here
GITHUB_REPO=owner/repo-name
";

/// Create `.env.example` from the template, or merge missing keys into an
/// existing one without disturbing user content.
pub fn install(project_dir: &Path, reporter: &dyn Reporter) -> WorkflowResult<()> {
    let path = project_dir.join(ENV_EXAMPLE_NAME);

    if !path.exists() {
        std::fs::write(&path, ENV_TEMPLATE)?;
        reporter.success(&format!("{ENV_EXAMPLE_NAME} created"));
        return Ok(());
    }

    let existing = std::fs::read_to_string(&path)?;
    let (merged, changed) = envfile::merge(ENV_TEMPLATE, &existing);
    if changed {
        std::fs::write(&path, merged)?;
        reporter.info(&format!(
            "Merged workflow variables into existing {ENV_EXAMPLE_NAME}"
        ));
    } else {
        reporter.info(&format!("{ENV_EXAMPLE_NAME} already up to date"));
    }
    Ok(())
}

/// Strip the tool-managed section from `.env.example`, deleting the file
/// when nothing else remains.
pub fn uninstall(project_dir: &Path, reporter: &dyn Reporter) -> WorkflowResult<()> {
    let path = project_dir.join(ENV_EXAMPLE_NAME);

    if !path.exists() {
        reporter.info(&format!("No {ENV_EXAMPLE_NAME} found; nothing to clean"));
        return Ok(());
    }

    let content = std::fs::read_to_string(&path)?;
    match envfile::cleanup(&content) {
        CleanupOutcome::Unchanged => {
            reporter.info(&format!(
                "No tool-managed section in {ENV_EXAMPLE_NAME}; leaving it alone"
            ));
        }
        CleanupOutcome::Rewritten(remaining) => {
            std::fs::write(&path, remaining)?;
            reporter.success(&format!(
                "Cleaned workflow variables from {ENV_EXAMPLE_NAME}"
            ));
        }
        CleanupOutcome::Delete => {
            std::fs::remove_file(&path)?;
            reporter.success(&format!("Removed empty {ENV_EXAMPLE_NAME}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingReporter;

    #[test]
    fn install_writes_template_when_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let reporter = RecordingReporter::new();
        install(tmp.path(), &reporter).unwrap();
        let written = std::fs::read_to_string(tmp.path().join(ENV_EXAMPLE_NAME)).unwrap();
        assert_eq!(written, ENV_TEMPLATE);
    }

    #[test]
    fn install_merges_missing_keys_and_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(ENV_EXAMPLE_NAME);
        std::fs::write(&path, "GITHUB_TOKEN=real-token\n").unwrap();

        let reporter = RecordingReporter::new();
        install(tmp.path(), &reporter).unwrap();
        let after_first = std::fs::read_to_string(&path).unwrap();
        assert!(after_first.contains("GITHUB_TOKEN=real-token"));
        assert!(after_first.contains("GITHUB_REPO=owner/repo-name"));

        install(tmp.path(), &reporter).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), after_first);
    }

    #[test]
    fn uninstall_round_trip_restores_user_content() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(ENV_EXAMPLE_NAME);
        let user_content = "MY_KEY=mine\n";
        std::fs::write(&path, user_content).unwrap();

        let reporter = RecordingReporter::new();
        install(tmp.path(), &reporter).unwrap();
        uninstall(tmp.path(), &reporter).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), user_content);
    }

    #[test]
    fn uninstall_deletes_template_only_file() {
        let tmp = tempfile::tempdir().unwrap();
        let reporter = RecordingReporter::new();
        install(tmp.path(), &reporter).unwrap();
        uninstall(tmp.path(), &reporter).unwrap();
        assert!(!tmp.path().join(ENV_EXAMPLE_NAME).exists());
    }

    #[test]
    fn uninstall_without_file_is_a_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let reporter = RecordingReporter::new();
        uninstall(tmp.path(), &reporter).unwrap();
    }
}
