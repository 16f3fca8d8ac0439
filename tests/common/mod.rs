//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{DeleteBranchCall, MergePrCall, MockPlatformService};

use eggtimer::events::{CheckEvent, Event, PullRequestAction, PullRequestEvent, ReviewEvent};
use eggtimer::merge::{AutoMerger, Effect, MergeOptions};
use eggtimer::types::{CheckState, PrId, RepoRef};
use std::time::Duration;

pub const OWNER: &str = "dgmltn";
pub const REPO: &str = "api-test";

pub fn repo() -> RepoRef {
    RepoRef::new(OWNER, REPO)
}

pub fn pr(number: u64) -> PrId {
    PrId::new(OWNER, REPO, number)
}

/// Options with no probe delay
pub fn options() -> MergeOptions {
    MergeOptions {
        probe_delay: Duration::ZERO,
        ..MergeOptions::default()
    }
}

pub fn machine() -> AutoMerger {
    AutoMerger::new(options())
}

pub fn review(pr: &PrId, sha: &str, review_id: u64, state: &str) -> Event {
    Event::Review(ReviewEvent {
        pr: pr.clone(),
        head_sha: sha.to_string(),
        head_ref: format!("branch-{}", pr.number),
        review_id,
        state: state.to_string(),
    })
}

pub fn pushed(pr: &PrId, sha: &str) -> Event {
    Event::PullRequest(PullRequestEvent {
        pr: pr.clone(),
        head_sha: sha.to_string(),
        head_ref: format!("branch-{}", pr.number),
        action: PullRequestAction::Updated,
    })
}

pub fn closed(pr: &PrId, sha: &str) -> Event {
    Event::PullRequest(PullRequestEvent {
        pr: pr.clone(),
        head_sha: sha.to_string(),
        head_ref: format!("branch-{}", pr.number),
        action: PullRequestAction::Closed,
    })
}

/// Commit status (no PR in the payload)
pub fn status(sha: &str, context: &str, state: CheckState) -> Event {
    Event::Check(CheckEvent {
        repo: repo(),
        commit: sha.to_string(),
        context: context.to_string(),
        state,
        pr: None,
    })
}

pub fn mergeable(pr: &PrId, sha: &str, value: Option<bool>) -> Event {
    Event::MergeableProbed {
        pr: pr.clone(),
        head_sha: sha.to_string(),
        mergeable: value,
    }
}

/// Merge effects in a batch
pub fn merges(effects: &[Effect]) -> Vec<&Effect> {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::Merge { .. }))
        .collect()
}

/// Drive a PR to the point where only mergeability is missing:
/// one approving review and one passing check at `sha`.
pub fn approved_and_green(machine: &mut AutoMerger, pr: &PrId, sha: &str) {
    machine.handle(review(pr, sha, 1, "approved"));
    machine.handle(status(sha, "ci", CheckState::Success));
}
