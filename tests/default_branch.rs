mod common;

use common::FakeVcs;
use prflow::vcs;
use prflow::WorkflowError;

#[test]
fn remote_head_wins_when_recorded() {
    let mut fake = FakeVcs::new("main", false);
    fake.remote_head = Some("refs/remotes/origin/develop".to_string());
    fake.remote_branches = vec!["main".to_string(), "develop".to_string()];
    assert_eq!(vcs::default_branch(&fake), "develop");
}

#[test]
fn conventional_candidates_in_priority_order() {
    let mut fake = FakeVcs::new("main", false);
    fake.remote_head = None;
    fake.remote_branches = vec!["dev".to_string(), "master".to_string()];
    // master outranks dev even though dev is listed first.
    assert_eq!(vcs::default_branch(&fake), "master");
}

#[test]
fn first_remote_branch_when_no_candidate_matches() {
    let mut fake = FakeVcs::new("main", false);
    fake.remote_head = None;
    fake.remote_branches = vec!["release-1".to_string(), "release-2".to_string()];
    assert_eq!(vcs::default_branch(&fake), "release-1");
}

#[test]
fn literal_main_when_everything_fails() {
    let mut fake = FakeVcs::new("x", false);
    fake.remote_head = None;
    fake.remote_branches = Vec::new(); // fake errors on empty list
    assert_eq!(vcs::default_branch(&fake), "main");
}

#[test]
fn ensure_ready_rejects_outside_repository() {
    let mut fake = FakeVcs::new("main", true);
    fake.inside = false;
    let err = vcs::ensure_ready(&fake).unwrap_err();
    assert!(matches!(err, WorkflowError::Vcs(_)));
}

#[test]
fn ensure_ready_accepts_clean_feature_branch() {
    let fake = FakeVcs::new("feature/login", false);
    let snapshot = vcs::ensure_ready(&fake).unwrap();
    assert_eq!(snapshot.current_branch, "feature/login");
    assert!(!snapshot.is_dirty);
}

#[test]
fn ensure_ready_accepts_dirty_tree_on_any_branch() {
    let fake = FakeVcs::new("main", true);
    let snapshot = vcs::ensure_ready(&fake).unwrap();
    assert!(snapshot.is_dirty);
}

#[test]
fn ensure_ready_performs_no_remote_queries() {
    let fake = FakeVcs::new("feature/x", false);
    vcs::ensure_ready(&fake).unwrap();
    assert_eq!(*fake.remote_queries.borrow(), 0);
}

#[test]
fn snapshot_is_derived_fresh() {
    let fake = FakeVcs::new("feat/1-a", true);
    let first = vcs::ensure_ready(&fake).unwrap();
    assert!(first.is_dirty);
    *fake.dirty.borrow_mut() = false;
    let second = vcs::ensure_ready(&fake).unwrap();
    assert!(!second.is_dirty);
}
