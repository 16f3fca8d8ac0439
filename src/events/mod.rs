//! Events consumed by the auto-merge state machine
//!
//! Two families share one queue:
//! - inbound notifications decoded from webhook deliveries ([`payload`])
//! - completions of asynchronous work the state machine asked for
//!   (commit lookup, mergeability probe, review backfill, merge)
//!
//! Completions carry the head SHA that was current when the work was
//! requested so handlers can discard results for a superseded commit.

pub mod payload;

pub use payload::{Delivery, parse_delivery};

use crate::types::{CheckState, CommitSha, OpenPullRequest, PrId, RepoRef, ReviewSummary};

/// A review was submitted (or dismissed) on a PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEvent {
    /// PR the review belongs to
    pub pr: PrId,
    /// PR head at the time of the review
    pub head_sha: CommitSha,
    /// PR source branch
    pub head_ref: String,
    /// Review (submission) id
    pub review_id: u64,
    /// Raw review state (`approved`, `commented`, `changes_requested`, ...)
    pub state: String,
}

/// What happened to a PR in a `pull_request` event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestAction {
    /// Opened, synchronized, reopened, edited, ...
    Updated,
    /// Closed, with or without merging
    Closed,
}

/// A PR was opened or updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// PR identity
    pub pr: PrId,
    /// Current head commit
    pub head_sha: CommitSha,
    /// PR source branch
    pub head_ref: String,
    /// Kind of update
    pub action: PullRequestAction,
}

/// An external system reported a check result for a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckEvent {
    /// Repository the commit lives in
    pub repo: RepoRef,
    /// Commit the check ran against
    pub commit: CommitSha,
    /// Check context name
    pub context: String,
    /// Check outcome
    pub state: CheckState,
    /// PR named by the payload, when it names one (check runs do, statuses don't)
    pub pr: Option<PrId>,
}

/// How a dispatched merge ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The platform merged the PR
    Merged {
        /// Merge commit SHA, when reported
        sha: Option<String>,
        /// Whether the source branch was deleted afterwards
        branch_deleted: bool,
    },
    /// The merge call failed or was refused
    Failed(String),
}

/// Everything the state machine reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // =========================================================================
    // Inbound notifications
    // =========================================================================
    /// Review submitted or dismissed
    Review(ReviewEvent),
    /// PR opened, updated or closed
    PullRequest(PullRequestEvent),
    /// Commit status or check run reported
    Check(CheckEvent),

    // =========================================================================
    // Completions of requested work
    // =========================================================================
    /// Out-of-band lookup of an unindexed commit finished
    CommitResolved {
        /// The check that could not be resolved locally
        check: CheckEvent,
        /// The open PR whose head matches, if any
        found: Option<OpenPullRequest>,
    },
    /// Delayed mergeability probe finished
    MergeableProbed {
        /// PR that was probed
        pr: PrId,
        /// Head the probe was scheduled for
        head_sha: CommitSha,
        /// Mergeability reported by the platform
        mergeable: Option<bool>,
    },
    /// Review backfill finished
    ReviewsFetched {
        /// PR whose reviews were listed
        pr: PrId,
        /// Head the backfill was scheduled for
        head_sha: CommitSha,
        /// Reviews reported by the platform
        reviews: Vec<ReviewSummary>,
    },
    /// Merge (and optional branch deletion) finished
    MergeFinished {
        /// PR that was merged
        pr: PrId,
        /// Head that was passed as the expected SHA
        head_sha: CommitSha,
        /// Result of the merge
        outcome: MergeOutcome,
    },
}
