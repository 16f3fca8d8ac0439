//! Effects (side effects as data).
//!
//! The state machine never talks to the platform itself. It returns effects
//! describing the work it wants done; [`execute_effect`](super::execute_effect)
//! performs them and turns the results back into events.

use crate::events::CheckEvent;
use crate::types::{CommitSha, MergeMethod, PrId};
use std::time::Duration;

/// Work requested by a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// List the repository's open PRs to find the one whose head is the
    /// check's commit.
    LookupCommit {
        /// Check waiting for resolution
        check: CheckEvent,
    },

    /// Read the PR's mergeability once, after `delay`.
    ProbeMergeable {
        /// PR to probe
        pr: PrId,
        /// Head the probe is for
        head_sha: CommitSha,
        /// How long to wait before reading
        delay: Duration,
    },

    /// List the PR's submitted reviews.
    FetchReviews {
        /// PR to list reviews for
        pr: PrId,
        /// Head the reviews should target
        head_sha: CommitSha,
    },

    /// Merge the PR at exactly `head_sha`, then optionally delete its branch.
    Merge {
        /// PR to merge
        pr: PrId,
        /// Expected head SHA
        head_sha: CommitSha,
        /// Source branch, if known
        head_ref: Option<String>,
        /// Merge method
        method: MergeMethod,
        /// Delete `head_ref` after a successful merge
        delete_branch: bool,
    },
}

impl Effect {
    /// PR this effect concerns, if it names one
    pub const fn pr(&self) -> Option<&PrId> {
        match self {
            Self::LookupCommit { .. } => None,
            Self::ProbeMergeable { pr, .. }
            | Self::FetchReviews { pr, .. }
            | Self::Merge { pr, .. } => Some(pr),
        }
    }
}
