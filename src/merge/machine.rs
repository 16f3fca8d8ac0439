//! The auto-merge state machine.

use crate::events::Event;
use crate::merge::Effect;
use crate::tracking::PrStore;
use crate::types::MergeMethod;
use std::time::Duration;

/// Default wait before reading mergeability after a push or review
pub const DEFAULT_PROBE_DELAY: Duration = Duration::from_secs(10);

/// Knobs for the merge orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Delete the source branch after a successful merge
    pub delete_after_merge: bool,
    /// Wait before reading mergeability
    pub probe_delay: Duration,
    /// Merge method passed to the platform
    pub method: MergeMethod,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            delete_after_merge: false,
            probe_delay: DEFAULT_PROBE_DELAY,
            method: MergeMethod::default(),
        }
    }
}

/// Owns the PR store and turns events into effects
///
/// `handle` is synchronous and performs no I/O, so any sequence of events
/// can be replayed in tests without a platform. The event loop in
/// [`run_event_loop`](super::run_event_loop) feeds it one event at a time,
/// which is the only mutual exclusion the store needs.
#[derive(Debug, Default)]
pub struct AutoMerger {
    pub(super) store: PrStore,
    pub(super) options: MergeOptions,
}

impl AutoMerger {
    /// Create a state machine with an empty store
    pub fn new(options: MergeOptions) -> Self {
        Self {
            store: PrStore::new(),
            options,
        }
    }

    /// Tracked PRs
    pub const fn store(&self) -> &PrStore {
        &self.store
    }

    /// Apply one event and return the work it requires
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Review(review) => self.on_review(review),
            Event::PullRequest(update) => self.on_pull_request(update),
            Event::Check(check) => self.on_check(check),
            Event::CommitResolved { check, found } => self.on_commit_resolved(check, found),
            Event::MergeableProbed {
                pr,
                head_sha,
                mergeable,
            } => self.on_mergeable_probed(&pr, &head_sha, mergeable),
            Event::ReviewsFetched {
                pr,
                head_sha,
                reviews,
            } => self.on_reviews_fetched(&pr, &head_sha, reviews),
            Event::MergeFinished {
                pr,
                head_sha,
                outcome,
            } => {
                self.on_merge_finished(&pr, &head_sha, outcome);
                Vec::new()
            }
        }
    }
}
