//! `KEY=VALUE` env-file handling: discovery, parsing, and the marker-delimited
//! tool-managed section used by install/uninstall.
//!
//! The merge never rewrites user lines; missing keys are appended in template
//! order under the marker. Cleanup removes exactly the marker-delimited span
//! and keeps everything else verbatim.

use std::path::{Path, PathBuf};

use crate::util::fs::{find_upward, DEFAULT_MAX_DEPTH};

/// Header comment delimiting the span this tool owns inside an env file.
pub const MANAGED_SECTION_MARKER: &str = "# Prflow Environment Variables";

/// Walk upward from `start_dir` until a `.env` file is found.
pub fn locate(start_dir: &Path) -> Option<PathBuf> {
    find_upward(
        start_dir,
        |dir| dir.join(".env").is_file(),
        DEFAULT_MAX_DEPTH,
    )
    .map(|dir| dir.join(".env"))
}

/// Extract variable definitions from env-file content.
///
/// A line defines a variable iff, after trimming, it is non-empty, not a
/// comment, and contains `=`. The value is everything after the first `=`
/// (it may itself contain `=`). Malformed and comment lines are skipped
/// silently. Order of first appearance is preserved; a repeated key keeps
/// its last value without gaining a second slot.
pub fn parse_env(content: &str) -> Vec<(String, String)> {
    let mut vars: Vec<(String, String)> = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(eq) = trimmed.find('=') else {
            continue;
        };
        let key = trimmed[..eq].trim().to_string();
        let value = trimmed[eq + 1..].trim().to_string();
        if let Some(slot) = vars.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            vars.push((key, value));
        }
    }
    vars
}

/// Lookup helper over [`parse_env`] output.
pub fn env_get<'a>(vars: &'a [(String, String)], key: &str) -> Option<&'a str> {
    vars.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Merge template variables into existing env-file content.
///
/// Template keys absent from `existing` are appended, in template order,
/// under [`MANAGED_SECTION_MARKER`]. Existing keys, values and ordering are
/// never altered. Returns the merged content and whether anything changed.
pub fn merge(template: &str, existing: &str) -> (String, bool) {
    let candidates = parse_env(template);
    let present = parse_env(existing);

    let missing: Vec<&(String, String)> = candidates
        .iter()
        .filter(|(key, _)| env_get(&present, key).is_none())
        .collect();

    if missing.is_empty() {
        return (existing.to_string(), false);
    }

    let mut merged = existing.to_string();
    if !merged.is_empty() && !merged.ends_with('\n') {
        merged.push('\n');
    }
    merged.push('\n');
    merged.push_str(MANAGED_SECTION_MARKER);
    merged.push('\n');
    for (key, value) in missing {
        merged.push_str(&format!("{key}={value}\n"));
    }

    (merged, true)
}

/// Result of stripping the tool-managed section from env-file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// No tool-managed section present; content untouched.
    Unchanged,
    /// Section removed; write this content back.
    Rewritten(String),
    /// Nothing but the tool-managed section remained; delete the file.
    Delete,
}

/// Remove the tool-managed section from env-file content.
///
/// The section starts at the marker line and ends at the next comment line
/// that is not a blank "continuation" comment (stripped line starting with
/// `#` not followed by a space, or another section header), or end-of-file.
/// This end heuristic is deliberately kept as documented for behavior
/// compatibility. Trailing blank lines are stripped.
pub fn cleanup(content: &str) -> CleanupOutcome {
    let lines: Vec<&str> = content.split('\n').collect();

    let Some(start) = lines
        .iter()
        .position(|line| line.trim() == MANAGED_SECTION_MARKER)
    else {
        return CleanupOutcome::Unchanged;
    };

    let mut end = lines.len();
    for (idx, line) in lines.iter().enumerate().skip(start + 1) {
        let stripped = line.trim();
        if stripped.starts_with('#')
            && !stripped.starts_with("# ")
            && stripped != MANAGED_SECTION_MARKER
        {
            end = idx;
            break;
        }
    }

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    kept.extend_from_slice(&lines[..start]);
    kept.extend_from_slice(&lines[end..]);

    while kept.last().is_some_and(|l| l.trim().is_empty()) {
        kept.pop();
    }

    if kept.is_empty() {
        return CleanupOutcome::Delete;
    }
    CleanupOutcome::Rewritten(format!("{}\n", kept.join("\n")))
}
