//! Document composition: the long-form issue-context plan document, the
//! short-form PR body, and the Implementation Notes extractor.
//!
//! Section ordering and the 1500-character collapse threshold are exact
//! contracts; other tooling parses these documents.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::github::{Comment, Issue};

/// Implementation Notes longer than this (in characters) render inside a
/// collapsible block.
pub const COLLAPSE_THRESHOLD: usize = 1500;

/// Parse a GitHub timestamp and re-render it canonically (RFC 3339); fall
/// back to the raw source string when unparseable.
fn normalize_instant(raw: &str) -> String {
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// `YYYY-MM-DD` when parseable, else the raw string.
fn normalize_date(raw: &str) -> String {
    let date_only = format_description!("[year]-[month]-[day]");
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .and_then(|dt| dt.format(&date_only).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// Render the long-form issue-context document written into the plan
/// directory. Comment order is preserved as received (oldest first).
pub fn issue_context_document(issue: &Issue, comments: &[Comment], now: OffsetDateTime) -> String {
    let body = match issue.body.as_deref() {
        Some(b) if !b.is_empty() => b,
        _ => "No description provided.",
    };
    let created = if issue.created_at.is_empty() {
        "unknown".to_string()
    } else {
        normalize_instant(&issue.created_at)
    };

    let mut doc = format!(
        "# {title}\n\n\
         **GitHub Issue:** #{number} - {url}\n\
         **Created:** {created} by {author}\n\
         **Status:** {state}\n\n\
         ---\n\n\
         ## 🎯 Original Request\n\n\
         {body}\n",
        title = issue.title,
        number = issue.number,
        url = issue.html_url,
        author = issue.user.login,
        state = issue.state,
    );

    if !comments.is_empty() {
        doc.push_str("\n---\n\n## 💬 Discussion & Refinements\n");
        for (idx, comment) in comments.iter().enumerate() {
            let date = if comment.created_at.is_empty() {
                "unknown".to_string()
            } else {
                normalize_date(&comment.created_at)
            };
            doc.push_str(&format!(
                "\n### Comment {n} - {login} ({date})\n\n{body}\n",
                n = idx + 1,
                login = comment.user.login,
                body = comment.body,
            ));
        }
    }

    let generated = now
        .format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string());
    doc.push_str(&format!(
        "\n---\n\n\
         ## 🛠️ Implementation Notes\n\n\
         *This section will be filled during execution based on the discussion above.*\n\n\
         ## ✅ Acceptance Criteria\n\n\
         *Extracted from the original request and discussion above.*\n\n\
         ---\n\n\
         *Generated from GitHub Issue #{number} on {generated}*\n\
         *Ready for submission with `prflow submit --issue={number}`*\n",
        number = issue.number,
    ));

    doc
}

/// Render the pull-request body.
///
/// Fixed order: Overview, optional Developer Notes, optional Implementation
/// Notes (collapsed when requested or over [`COLLAPSE_THRESHOLD`]), Related
/// Work, Validation, automation footer.
pub fn pr_body(
    issue_number: u64,
    plan_reference: Option<&str>,
    developer_notes: &str,
    implementation_notes: &str,
    collapse_notes: bool,
) -> String {
    let mut lines: Vec<String> = vec![
        "## Overview".to_string(),
        format!("This pull request implements the feature requested in issue #{issue_number}."),
        String::new(),
    ];

    if !developer_notes.trim().is_empty() {
        lines.push("## Developer Notes".to_string());
        lines.push(developer_notes.trim().to_string());
        lines.push(String::new());
    }

    if !implementation_notes.trim().is_empty() {
        if collapse_notes || implementation_notes.chars().count() > COLLAPSE_THRESHOLD {
            lines.push("<details>".to_string());
            lines.push("<summary><strong>Implementation Notes (from plan)</strong></summary>".to_string());
            lines.push(String::new());
            lines.push(implementation_notes.trim().to_string());
            lines.push(String::new());
            lines.push("</details>".to_string());
            lines.push(String::new());
        } else {
            lines.push(implementation_notes.trim().to_string());
            lines.push(String::new());
        }
    }

    let reference = plan_reference.unwrap_or("Manual implementation");
    lines.push("## Related Work".to_string());
    lines.push(format!("- **Implements**: Closes #{issue_number}"));
    lines.push(format!("- **Guided by**: `{reference}`"));
    lines.push(String::new());
    lines.push("## Validation".to_string());
    lines.push("- [x] All local checks pass.".to_string());
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push("*This PR was created automatically via the prflow workflow.*".to_string());

    lines.join("\n")
}

/// Extract the first sub-heading section whose heading text contains
/// "implementation" (case-insensitive). The span runs from that heading up
/// to, but not including, the next sub-heading, or end of document. Empty
/// string when no such heading exists.
pub fn extract_implementation_notes(plan_text: &str) -> String {
    let lines: Vec<&str> = plan_text.lines().collect();

    let Some(start) = lines.iter().position(|line| {
        let trimmed = line.trim();
        trimmed.starts_with("##") && trimmed.to_lowercase().contains("implementation")
    }) else {
        return String::new();
    };

    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| line.trim().starts_with("##"))
        .map(|(idx, _)| idx)
        .unwrap_or(lines.len());

    lines[start..end].join("\n").trim().to_string()
}

/// The automated comment posted back on the originating issue.
pub fn issue_comment_body(pr_url: &str) -> String {
    format!(
        "🤖 **Implementation Complete!**\n\n\
         The feature requested in this issue has been implemented and is ready for review.\n\n\
         **Pull Request**: {pr_url}\n\n\
         The implementation has passed all local validation checks. \
         Please review the changes and merge when ready."
    )
}
