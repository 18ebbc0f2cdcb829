//! Deterministic identifier synthesis from issue titles.
//!
//! All three functions are pure and total: any title, including empty or pure
//! punctuation, yields a valid identifier through the documented fallbacks.

/// Issue-tag prefixes stripped from titles before slugging file names.
const TITLE_TAGS: [&str; 4] = ["[feat]:", "[feature]:", "[bug]:", "[enhancement]:"];

fn strip_tag(title: &str, tag: &str) -> String {
    let trimmed = title.trim_start();
    // get() refuses non-boundary slices, so multibyte titles never panic.
    match trimmed.get(..tag.len()) {
        Some(head) if head.eq_ignore_ascii_case(tag) => trimmed[tag.len()..].to_string(),
        _ => title.to_string(),
    }
}

/// Lower-case, replace non-alphanumeric/non-space characters with spaces, and
/// hyphen-join the remaining tokens. Runs of whitespace collapse into single
/// hyphens; empty tokens disappear.
fn slugify(text: &str) -> String {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|ch| if ch.is_alphanumeric() || ch == ' ' { ch } else { ' ' })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join("-")
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// `feat/{issue_number}-{slug}`, slug capped at 50 characters, `update` when
/// the title slugs away to nothing.
pub fn branch_name(issue_number: u64, title: &str) -> String {
    let mut slug = truncate(&slugify(&strip_tag(title, "[feat]:")), 50);
    if slug.is_empty() {
        slug = "update".to_string();
    }
    format!("feat/{issue_number}-{slug}")
}

/// `feat(issue-{n}): {title}` with the `[feat]:` tag stripped. Punctuation is
/// preserved; only branch and file slugs are scrubbed.
pub fn commit_message(issue_number: u64, title: &str) -> String {
    let cleaned = strip_tag(title, "[feat]:").trim().to_string();
    let subject = if cleaned.is_empty() {
        format!("Issue {issue_number}")
    } else {
        cleaned
    };
    format!("feat(issue-{issue_number}): {subject}")
}

/// `{issue_number}-{slug}.md`, slug capped at 100 characters, `issue` when
/// the title slugs away to nothing. Strips all known tag prefixes.
pub fn plan_filename(issue_number: u64, title: &str) -> String {
    let mut cleaned = title.to_string();
    for tag in TITLE_TAGS {
        cleaned = strip_tag(&cleaned, tag);
    }
    let mut slug = truncate(&slugify(&cleaned), 100);
    if slug.is_empty() {
        slug = "issue".to_string();
    }
    format!("{issue_number}-{slug}.md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_name_strips_tag_and_punctuation() {
        assert_eq!(
            branch_name(42, "[feat]: Add Dark Mode!!"),
            "feat/42-add-dark-mode"
        );
    }

    #[test]
    fn branch_name_tag_strip_is_case_insensitive() {
        assert_eq!(branch_name(5, "[FEAT]: Quick Fix"), "feat/5-quick-fix");
    }

    #[test]
    fn branch_name_empty_title_falls_back_to_update() {
        assert_eq!(branch_name(7, ""), "feat/7-update");
        assert_eq!(branch_name(7, "!!!???"), "feat/7-update");
    }

    #[test]
    fn branch_name_slug_is_capped_at_fifty() {
        let title = "a".repeat(120);
        let name = branch_name(1, &title);
        let slug = name.strip_prefix("feat/1-").unwrap();
        assert_eq!(slug.len(), 50);
    }

    #[test]
    fn branch_name_matches_slug_alphabet() {
        let name = branch_name(9, "Søme Wéird Title — with™ marks");
        let slug = name.strip_prefix("feat/9-").unwrap();
        assert!(!slug.is_empty() && slug.len() <= 50);
        // Non-ASCII alphanumerics lowercase in place; everything else
        // collapses to single hyphens with no leading/trailing hyphen.
        assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        assert!(!slug.contains("--"));
    }

    #[test]
    fn commit_message_preserves_punctuation() {
        assert_eq!(
            commit_message(42, "[feat]: Add Dark Mode!!"),
            "feat(issue-42): Add Dark Mode!!"
        );
    }

    #[test]
    fn commit_message_empty_title_names_the_issue() {
        assert_eq!(commit_message(7, ""), "feat(issue-7): Issue 7");
        assert_eq!(commit_message(7, "[feat]:   "), "feat(issue-7): Issue 7");
    }

    #[test]
    fn plan_filename_strips_known_tags() {
        assert_eq!(
            plan_filename(12, "[BUG]: Crash on empty input"),
            "12-crash-on-empty-input.md"
        );
        assert_eq!(
            plan_filename(12, "[enhancement]: Faster startup"),
            "12-faster-startup.md"
        );
    }

    #[test]
    fn plan_filename_empty_title_falls_back_to_issue() {
        assert_eq!(plan_filename(7, ""), "7-issue.md");
    }

    #[test]
    fn plan_filename_is_capped_at_one_hundred() {
        let title = "word ".repeat(60);
        let name = plan_filename(3, &title);
        let slug = name
            .strip_prefix("3-")
            .and_then(|s| s.strip_suffix(".md"))
            .unwrap();
        assert!(slug.len() <= 100);
    }

    #[test]
    fn synthesis_is_deterministic() {
        let a = branch_name(42, "[feat]: Add Dark Mode!!");
        let b = branch_name(42, "[feat]: Add Dark Mode!!");
        assert_eq!(a, b);
    }
}
