//! Event ingestion - folding notifications into the PR store
//!
//! Every handler ends by asking the orchestrator whether the PR became
//! ready. Handlers for completed work first check that the record still
//! describes the head the work was requested for; results for a superseded
//! commit are dropped.

use super::{AutoMerger, Effect};
use crate::events::{CheckEvent, PullRequestAction, PullRequestEvent, ReviewEvent};
use crate::types::{OpenPullRequest, PrId, ReviewSummary};
use tracing::{debug, info};

/// Whether a review state counts as an approval
pub fn is_approval(state: &str) -> bool {
    state.eq_ignore_ascii_case("approved")
}

impl AutoMerger {
    pub(super) fn on_review(&mut self, event: ReviewEvent) -> Vec<Effect> {
        let approved = is_approval(&event.state);
        debug!(
            pr = %event.pr,
            review_id = event.review_id,
            approved,
            "review"
        );

        let record = self.store.upsert(&event.pr, &event.head_sha);
        record.reviews.insert(event.review_id, approved);
        record.head_ref = Some(event.head_ref);

        self.refresh_and_evaluate(&event.pr, &event.head_sha)
    }

    pub(super) fn on_pull_request(&mut self, event: PullRequestEvent) -> Vec<Effect> {
        if event.action == PullRequestAction::Closed {
            if self.store.remove(&event.pr).is_some() {
                info!(pr = %event.pr, "PR closed, no longer tracking");
            }
            return Vec::new();
        }

        debug!(pr = %event.pr, sha = %event.head_sha, "pull request updated");
        let record = self.store.upsert(&event.pr, &event.head_sha);
        record.head_ref = Some(event.head_ref);

        self.refresh_and_evaluate(&event.pr, &event.head_sha)
    }

    pub(super) fn on_check(&mut self, check: CheckEvent) -> Vec<Effect> {
        debug!(
            repo = %check.repo,
            sha = %check.commit,
            context = %check.context,
            state = %check.state,
            "check"
        );

        // The payload's PR wins; the commit index is only a fallback.
        let resolved = match &check.pr {
            Some(pr) => Some(pr.clone()),
            None => match self.store.resolve_by_commit(&check.commit) {
                Some(pr) if self.store.contains(pr) => Some(pr.clone()),
                Some(pr) => {
                    // Dangling entry left by a merge or close
                    debug!(
                        pr = %pr,
                        sha = %check.commit,
                        "PR no longer tracked, dropping check"
                    );
                    return Vec::new();
                }
                None => None,
            },
        };

        match resolved {
            Some(pr) => self.record_check(&pr, check, None),
            None => {
                debug!(sha = %check.commit, "commit not indexed, looking up open PRs");
                vec![Effect::LookupCommit { check }]
            }
        }
    }

    pub(super) fn on_commit_resolved(
        &mut self,
        check: CheckEvent,
        found: Option<OpenPullRequest>,
    ) -> Vec<Effect> {
        let Some(open) = found else {
            info!(
                repo = %check.repo,
                sha = %check.commit,
                "no open PR for commit, dropping check"
            );
            return Vec::new();
        };

        debug!(pr = %open.id, sha = %check.commit, "resolved commit");
        self.record_check(&open.id, check, Some(open.head_ref))
    }

    /// Store a check result against `pr`.
    ///
    /// `listed_branch` is set when the platform's open-PR listing showed the
    /// check's commit as the PR's head. Such a check moves the record to that
    /// commit, since the push notification may still be on its way. Any other
    /// check for a commit other than the current head is stale and dropped.
    /// A PR seen for the first time is tracked at the check's commit.
    fn record_check(
        &mut self,
        pr: &PrId,
        check: CheckEvent,
        listed_branch: Option<String>,
    ) -> Vec<Effect> {
        let head_moved = match self.store.get(pr) {
            Some(record) if record.is_at(&check.commit) => false,
            Some(record) if listed_branch.is_some() => {
                debug!(
                    pr = %pr,
                    sha = %check.commit,
                    old_sha = %record.head_sha,
                    "platform lists check commit as head, moving"
                );
                true
            }
            Some(record) => {
                debug!(
                    pr = %pr,
                    sha = %check.commit,
                    head = %record.head_sha,
                    "check for superseded commit, dropping"
                );
                return Vec::new();
            }
            None => true,
        };

        let record = self.store.upsert(pr, &check.commit);
        if listed_branch.is_some() {
            record.head_ref = listed_branch;
        }
        record.checks.insert(check.context, check.state);

        if head_moved {
            self.refresh_and_evaluate(pr, &check.commit)
        } else {
            self.evaluate_only(pr)
        }
    }

    pub(super) fn on_mergeable_probed(
        &mut self,
        pr: &PrId,
        head_sha: &str,
        mergeable: Option<bool>,
    ) -> Vec<Effect> {
        let Some(record) = self.store.get_mut(pr) else {
            debug!(pr = %pr, "mergeability for untracked PR, dropping");
            return Vec::new();
        };
        if !record.is_at(head_sha) {
            debug!(pr = %pr, sha = head_sha, "mergeability for superseded commit, dropping");
            return Vec::new();
        }

        debug!(pr = %pr, ?mergeable, "mergeability");
        record.mergeable = mergeable;
        self.evaluate_only(pr)
    }

    pub(super) fn on_reviews_fetched(
        &mut self,
        pr: &PrId,
        head_sha: &str,
        reviews: Vec<ReviewSummary>,
    ) -> Vec<Effect> {
        let Some(record) = self.store.get_mut(pr) else {
            debug!(pr = %pr, "reviews for untracked PR, dropping");
            return Vec::new();
        };
        if !record.is_at(head_sha) {
            debug!(pr = %pr, sha = head_sha, "reviews for superseded commit, dropping");
            return Vec::new();
        }

        let mut recorded = 0;
        for review in reviews {
            if review
                .commit_id
                .as_deref()
                .is_some_and(|commit| commit != head_sha)
            {
                continue;
            }
            record.reviews.insert(review.id, review.approved);
            recorded += 1;
        }
        debug!(pr = %pr, recorded, "backfilled reviews");

        self.evaluate_only(pr)
    }

    /// Schedule a mergeability probe and review backfill for the head, then
    /// evaluate.
    fn refresh_and_evaluate(&mut self, pr: &PrId, head_sha: &str) -> Vec<Effect> {
        let mut effects = vec![
            Effect::ProbeMergeable {
                pr: pr.clone(),
                head_sha: head_sha.to_string(),
                delay: self.options.probe_delay,
            },
            Effect::FetchReviews {
                pr: pr.clone(),
                head_sha: head_sha.to_string(),
            },
        ];
        effects.extend(self.merge_if_ready(pr));
        effects
    }

    fn evaluate_only(&mut self, pr: &PrId) -> Vec<Effect> {
        self.merge_if_ready(pr).into_iter().collect()
    }
}
