//! Aggregated readiness evidence for a single pull request.

use crate::types::{CheckState, CommitSha};
use std::collections::HashMap;

/// Everything known about a PR's current head commit
///
/// All evidence (`checks`, `reviews`, `mergeable`) describes `head_sha`
/// only. [`PrStore::upsert`](super::PrStore::upsert) resets it whenever the
/// head moves, so nothing observed for a superseded commit survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRecord {
    /// Commit currently under review
    pub head_sha: CommitSha,
    /// Source branch, used for post-merge deletion
    pub head_ref: Option<String>,
    /// Check context name → outcome
    pub checks: HashMap<String, CheckState>,
    /// Review id → approved
    pub reviews: HashMap<u64, bool>,
    /// Platform-computed mergeability (`None` while unknown)
    pub mergeable: Option<bool>,
    /// A merge has been dispatched and not rolled back
    pub done: bool,
}

impl PullRequestRecord {
    /// Fresh record with no evidence
    pub fn new(head_sha: impl Into<CommitSha>) -> Self {
        Self {
            head_sha: head_sha.into(),
            head_ref: None,
            checks: HashMap::new(),
            reviews: HashMap::new(),
            mergeable: None,
            done: false,
        }
    }

    /// Move to a new head commit, dropping all evidence.
    pub(super) fn reset(&mut self, head_sha: impl Into<CommitSha>) {
        self.head_sha = head_sha.into();
        self.checks.clear();
        self.reviews.clear();
        self.mergeable = None;
        self.done = false;
    }

    /// Whether this record describes `sha`
    pub fn is_at(&self, sha: &str) -> bool {
        self.head_sha == sha
    }
}
