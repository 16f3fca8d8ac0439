//! Effect execution - effectful operations
//!
//! Takes an [`Effect`] produced by the state machine, performs it against
//! the platform and returns the completion event to feed back. Remote
//! failures are logged here; only a failed merge is reported back, since it
//! is the one failure the state machine reacts to.

use super::Effect;
use crate::events::{CheckEvent, Event, MergeOutcome};
use crate::platform::PlatformService;
use crate::types::{CommitSha, MergeMethod, PrId};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Execute one effect (EFFECTFUL)
pub async fn execute_effect(platform: &dyn PlatformService, effect: Effect) -> Option<Event> {
    match effect {
        Effect::LookupCommit { check } => lookup_commit(platform, check).await,
        Effect::ProbeMergeable {
            pr,
            head_sha,
            delay,
        } => probe_mergeable(platform, pr, head_sha, delay).await,
        Effect::FetchReviews { pr, head_sha } => fetch_reviews(platform, pr, head_sha).await,
        Effect::Merge {
            pr,
            head_sha,
            head_ref,
            method,
            delete_branch,
        } => {
            let outcome = merge(
                platform,
                &pr,
                &head_sha,
                head_ref.as_deref(),
                method,
                delete_branch,
            )
            .await;
            Some(Event::MergeFinished {
                pr,
                head_sha,
                outcome,
            })
        }
    }
}

async fn lookup_commit(platform: &dyn PlatformService, check: CheckEvent) -> Option<Event> {
    match platform.list_open_pull_requests(&check.repo).await {
        Ok(open) => {
            let found = open.into_iter().find(|pr| pr.head_sha == check.commit);
            Some(Event::CommitResolved { check, found })
        }
        Err(e) => {
            warn!(
                repo = %check.repo,
                sha = %check.commit,
                error = %e,
                "can't list open PRs, dropping check"
            );
            None
        }
    }
}

async fn probe_mergeable(
    platform: &dyn PlatformService,
    pr: PrId,
    head_sha: CommitSha,
    delay: Duration,
) -> Option<Event> {
    tokio::time::sleep(delay).await;

    match platform.get_pr_details(&pr).await {
        Ok(details) if details.head_sha != head_sha => {
            debug!(
                pr = %pr,
                sha = %head_sha,
                platform_sha = %details.head_sha,
                "platform head moved, discarding mergeability"
            );
            None
        }
        Ok(details) => Some(Event::MergeableProbed {
            pr,
            head_sha,
            mergeable: details.mergeable,
        }),
        Err(e) => {
            warn!(pr = %pr, error = %e, "can't read mergeability");
            None
        }
    }
}

async fn fetch_reviews(
    platform: &dyn PlatformService,
    pr: PrId,
    head_sha: CommitSha,
) -> Option<Event> {
    match platform.list_reviews(&pr).await {
        Ok(reviews) => Some(Event::ReviewsFetched {
            pr,
            head_sha,
            reviews,
        }),
        Err(e) => {
            warn!(pr = %pr, error = %e, "can't list reviews");
            None
        }
    }
}

async fn merge(
    platform: &dyn PlatformService,
    pr: &PrId,
    head_sha: &str,
    head_ref: Option<&str>,
    method: MergeMethod,
    delete_branch: bool,
) -> MergeOutcome {
    let result = match platform.merge_pr(pr, head_sha, method).await {
        Ok(result) if result.merged => result,
        Ok(result) => {
            // Merge API returned but didn't merge
            return MergeOutcome::Failed(
                result
                    .message
                    .unwrap_or_else(|| "merge not performed".to_string()),
            );
        }
        Err(e) => return MergeOutcome::Failed(e.to_string()),
    };

    let branch_deleted = if delete_branch {
        match head_ref {
            Some(branch) => match platform.delete_branch(&pr.repo, branch).await {
                Ok(()) => {
                    info!(pr = %pr, branch, "deleted branch");
                    true
                }
                Err(e) => {
                    warn!(pr = %pr, branch, error = %e, "could not delete branch");
                    false
                }
            },
            None => {
                warn!(pr = %pr, "branch unknown, not deleting");
                false
            }
        }
    } else {
        false
    };

    MergeOutcome::Merged {
        sha: result.sha,
        branch_deleted,
    }
}
