//! Readiness evaluation - pure function over a PR record
//!
//! No I/O happens here. Every piece of evidence must be present and
//! favorable: a PR with no recorded checks or no recorded reviews is
//! blocked, never vacuously ready.

use crate::tracking::PullRequestRecord;

/// Why a PR can't be merged yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// A merge has already been dispatched for this head
    AlreadyActioned,
    /// The platform hasn't reported mergeability for this head yet
    MergeabilityUnknown,
    /// The platform reports conflicts
    NotMergeable,
    /// No reviews recorded
    NoReviews,
    /// At least one review doesn't approve
    NotApproved {
        /// Number of non-approving reviews
        count: usize,
    },
    /// No checks recorded
    NoChecks,
    /// At least one check is pending or failed
    ChecksNotPassing {
        /// Contexts that haven't succeeded, sorted
        contexts: Vec<String>,
    },
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyActioned => write!(f, "merge already dispatched"),
            Self::MergeabilityUnknown => write!(f, "mergeability unknown"),
            Self::NotMergeable => write!(f, "has merge conflicts"),
            Self::NoReviews => write!(f, "no reviews"),
            Self::NotApproved { count } => write!(f, "{count} review(s) not approving"),
            Self::NoChecks => write!(f, "no checks"),
            Self::ChecksNotPassing { contexts } => {
                write!(f, "checks not passing: {}", contexts.join(", "))
            }
        }
    }
}

/// Verdict for a PR record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Readiness {
    /// Everything blocking the merge; empty means ready
    pub blocking_reasons: Vec<BlockReason>,
}

impl Readiness {
    /// Whether the PR may be merged now
    pub fn is_ready(&self) -> bool {
        self.blocking_reasons.is_empty()
    }
}

impl std::fmt::Display for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_ready() {
            return write!(f, "ready");
        }
        let reasons: Vec<String> = self.blocking_reasons.iter().map(ToString::to_string).collect();
        write!(f, "blocked: {}", reasons.join(", "))
    }
}

/// Evaluate a record (PURE - no I/O, easily testable)
pub fn evaluate(record: &PullRequestRecord) -> Readiness {
    let mut blocking_reasons = Vec::new();

    if record.done {
        blocking_reasons.push(BlockReason::AlreadyActioned);
    }

    match record.mergeable {
        Some(true) => {}
        Some(false) => blocking_reasons.push(BlockReason::NotMergeable),
        None => blocking_reasons.push(BlockReason::MergeabilityUnknown),
    }

    if record.reviews.is_empty() {
        blocking_reasons.push(BlockReason::NoReviews);
    } else {
        let count = record.reviews.values().filter(|approved| !**approved).count();
        if count > 0 {
            blocking_reasons.push(BlockReason::NotApproved { count });
        }
    }

    if record.checks.is_empty() {
        blocking_reasons.push(BlockReason::NoChecks);
    } else {
        let mut contexts: Vec<String> = record
            .checks
            .iter()
            .filter(|(_, state)| !state.is_success())
            .map(|(context, _)| context.clone())
            .collect();
        if !contexts.is_empty() {
            contexts.sort();
            blocking_reasons.push(BlockReason::ChecksNotPassing { contexts });
        }
    }

    Readiness { blocking_reasons }
}
