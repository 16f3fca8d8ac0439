//! PR state store and commit index.

use super::PullRequestRecord;
use crate::types::{CommitSha, PrId};
use std::collections::HashMap;
use tracing::debug;

/// PR id → readiness record, plus commit SHA → PR id
///
/// Entries in the commit index are never pruned: after a PR moves to a new
/// head (or is removed) its old SHAs keep pointing at it. Callers must
/// compare the resolved record's `head_sha` with the commit they hold before
/// acting on it.
#[derive(Debug, Default)]
pub struct PrStore {
    prs: HashMap<PrId, PullRequestRecord>,
    commits: HashMap<CommitSha, PrId>,
}

impl PrStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a PR record
    pub fn get(&self, id: &PrId) -> Option<&PullRequestRecord> {
        self.prs.get(id)
    }

    /// Look up a PR record for mutation
    pub fn get_mut(&mut self, id: &PrId) -> Option<&mut PullRequestRecord> {
        self.prs.get_mut(id)
    }

    /// Create or refresh the record for `id` at `head_sha`.
    ///
    /// A missing record is created empty. An existing record whose head
    /// differs from `head_sha` has all evidence dropped and `done` cleared.
    /// Either way `head_sha` is (re)registered in the commit index.
    pub fn upsert(&mut self, id: &PrId, head_sha: &str) -> &mut PullRequestRecord {
        self.commits.insert(head_sha.to_string(), id.clone());

        let record = self.prs.entry(id.clone()).or_insert_with(|| {
            debug!(pr = %id, sha = head_sha, "tracking new PR");
            PullRequestRecord::new(head_sha)
        });

        if !record.is_at(head_sha) {
            debug!(
                pr = %id,
                old_sha = %record.head_sha,
                new_sha = head_sha,
                "head moved, resetting evidence"
            );
            record.reset(head_sha);
        }

        record
    }

    /// Resolve a commit SHA to the PR it was last registered for
    pub fn resolve_by_commit(&self, sha: &str) -> Option<&PrId> {
        self.commits.get(sha)
    }

    /// Stop tracking a PR. Commit index entries are left in place.
    pub fn remove(&mut self, id: &PrId) -> Option<PullRequestRecord> {
        self.prs.remove(id)
    }

    /// Whether a record exists for `id`
    pub fn contains(&self, id: &PrId) -> bool {
        self.prs.contains_key(id)
    }

    /// Number of tracked PRs
    pub fn len(&self) -> usize {
        self.prs.len()
    }

    /// Whether no PRs are tracked
    pub fn is_empty(&self) -> bool {
        self.prs.is_empty()
    }

    /// Iterate over tracked PRs
    pub fn iter(&self) -> impl Iterator<Item = (&PrId, &PullRequestRecord)> {
        self.prs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CheckState;

    fn pr(number: u64) -> PrId {
        PrId::new("acme", "widgets", number)
    }

    #[test]
    fn test_upsert_creates_empty_record() {
        let mut store = PrStore::new();
        let record = store.upsert(&pr(1), "aaa");

        assert_eq!(record.head_sha, "aaa");
        assert!(record.checks.is_empty());
        assert!(record.reviews.is_empty());
        assert_eq!(record.mergeable, None);
        assert!(!record.done);
        assert_eq!(store.len(), 1);
        assert_eq!(store.resolve_by_commit("aaa"), Some(&pr(1)));
    }

    #[test]
    fn test_upsert_same_head_keeps_evidence() {
        let mut store = PrStore::new();
        let record = store.upsert(&pr(1), "aaa");
        record.checks.insert("ci".to_string(), CheckState::Success);
        record.reviews.insert(7, true);
        record.mergeable = Some(true);
        record.done = true;

        let record = store.upsert(&pr(1), "aaa");
        assert_eq!(record.checks.get("ci"), Some(&CheckState::Success));
        assert_eq!(record.reviews.get(&7), Some(&true));
        assert_eq!(record.mergeable, Some(true));
        assert!(record.done);
    }

    #[test]
    fn test_upsert_new_head_resets_evidence() {
        let mut store = PrStore::new();
        let record = store.upsert(&pr(1), "aaa");
        record.head_ref = Some("feature".to_string());
        record.checks.insert("ci".to_string(), CheckState::Success);
        record.reviews.insert(7, true);
        record.mergeable = Some(true);
        record.done = true;

        let record = store.upsert(&pr(1), "bbb");
        assert_eq!(record.head_sha, "bbb");
        assert!(record.checks.is_empty());
        assert!(record.reviews.is_empty());
        assert_eq!(record.mergeable, None);
        assert!(!record.done);
        // Branch name is not evidence about the commit
        assert_eq!(record.head_ref.as_deref(), Some("feature"));
    }

    #[test]
    fn test_stale_commit_entries_remain() {
        let mut store = PrStore::new();
        store.upsert(&pr(1), "aaa");
        store.upsert(&pr(1), "bbb");

        assert_eq!(store.resolve_by_commit("aaa"), Some(&pr(1)));
        assert_eq!(store.resolve_by_commit("bbb"), Some(&pr(1)));
        assert!(!store.get(&pr(1)).unwrap().is_at("aaa"));
    }

    #[test]
    fn test_remove_leaves_commit_index() {
        let mut store = PrStore::new();
        store.upsert(&pr(1), "aaa");
        store.upsert(&pr(2), "ccc");

        let removed = store.remove(&pr(1)).unwrap();
        assert_eq!(removed.head_sha, "aaa");
        assert!(!store.contains(&pr(1)));
        assert!(store.contains(&pr(2)));
        assert_eq!(store.resolve_by_commit("aaa"), Some(&pr(1)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_resolve_unknown_commit() {
        let store = PrStore::new();
        assert!(store.resolve_by_commit("nope").is_none());
        assert!(store.is_empty());
    }
}
