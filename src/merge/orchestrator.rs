//! Merge orchestration - the ready → merging → merged transitions
//!
//! ```text
//! PENDING --ready--> MERGING --ok--> MERGED [--> branch deleted]
//!                       |
//!                       +--failed--> PENDING (done cleared)
//! ```
//!
//! `done` is set before the merge effect is emitted. Until the outcome
//! comes back, every evaluation of the PR reports it as already actioned,
//! so a second ready-making event can't dispatch a second merge.

use super::readiness::evaluate;
use super::{AutoMerger, Effect};
use crate::events::MergeOutcome;
use crate::types::PrId;
use tracing::{debug, info, warn};

impl AutoMerger {
    /// Emit a merge for `pr` if it is tracked and ready.
    pub(super) fn merge_if_ready(&mut self, pr: &PrId) -> Option<Effect> {
        let record = self.store.get_mut(pr)?;

        let readiness = evaluate(record);
        if !readiness.is_ready() {
            debug!(pr = %pr, %readiness, "not ready");
            return None;
        }

        record.done = true;
        info!(pr = %pr, sha = %record.head_sha, "approved, merging");

        Some(Effect::Merge {
            pr: pr.clone(),
            head_sha: record.head_sha.clone(),
            head_ref: record.head_ref.clone(),
            method: self.options.method,
            delete_branch: self.options.delete_after_merge,
        })
    }

    pub(super) fn on_merge_finished(&mut self, pr: &PrId, head_sha: &str, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Merged {
                sha,
                branch_deleted,
            } => {
                // The PR is merged whatever happened to the record meanwhile.
                self.store.remove(pr);
                info!(
                    pr = %pr,
                    merge_sha = sha.as_deref().unwrap_or("(no sha)"),
                    branch_deleted,
                    "merged"
                );
            }
            MergeOutcome::Failed(message) => match self.store.get_mut(pr) {
                Some(record) if record.is_at(head_sha) => {
                    record.done = false;
                    warn!(
                        pr = %pr,
                        sha = head_sha,
                        %message,
                        "could not merge, will retry on next event"
                    );
                }
                Some(_) => {
                    debug!(
                        pr = %pr,
                        sha = head_sha,
                        %message,
                        "merge failed for superseded commit"
                    );
                }
                None => {
                    debug!(pr = %pr, %message, "merge failed for untracked PR");
                }
            },
        }
    }
}
