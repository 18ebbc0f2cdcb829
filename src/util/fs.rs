use std::path::{Path, PathBuf};

/// Default ancestor-walk bound; deep enough for any sane checkout layout.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Walk upward from `start` through parent directories, returning the first
/// ancestor (including `start` itself) for which `predicate` holds. The walk
/// is bounded by `max_depth` so it terminates even on exotic filesystems.
pub fn find_upward<P>(start: &Path, predicate: P, max_depth: usize) -> Option<PathBuf>
where
    P: Fn(&Path) -> bool,
{
    let mut current = start.to_path_buf();
    for _ in 0..max_depth {
        if predicate(&current) {
            return Some(current);
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return None,
        }
    }
    None
}

/// First ancestor of `start` containing a `.git` entry; falls back to `start`
/// when nothing matches (mirrors how the submission flow resolves its root).
pub fn project_root(start: &Path) -> PathBuf {
    find_upward(start, |dir| dir.join(".git").exists(), DEFAULT_MAX_DEPTH)
        .unwrap_or_else(|| start.to_path_buf())
}

/// Ensure a directory exists, creating parents as needed.
pub fn ensure_dir(p: &Path) -> std::io::Result<()> {
    if !p.exists() {
        std::fs::create_dir_all(p)?;
    }
    Ok(())
}
