//! Platform services
//!
//! The remote calls the auto-merge core depends on, behind one trait so the
//! state machine can be driven against GitHub or a test double.

mod github;

pub use github::GitHubService;

use crate::config::GitHubSettings;
use crate::error::Result;
use crate::types::{
    MergeMethod, MergeResult, OpenPullRequest, PrId, PullRequestDetails, RepoRef, ReviewSummary,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Platform service trait for the calls the merge core makes
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Get current PR details, including the platform's mergeability verdict
    async fn get_pr_details(&self, pr: &PrId) -> Result<PullRequestDetails>;

    /// List every open PR in a repository (all pages)
    async fn list_open_pull_requests(&self, repo: &RepoRef) -> Result<Vec<OpenPullRequest>>;

    /// List submitted reviews on a PR
    async fn list_reviews(&self, pr: &PrId) -> Result<Vec<ReviewSummary>>;

    /// Merge a PR, only if its head is still `expected_head_sha`
    async fn merge_pr(
        &self,
        pr: &PrId,
        expected_head_sha: &str,
        method: MergeMethod,
    ) -> Result<MergeResult>;

    /// Delete a branch
    async fn delete_branch(&self, repo: &RepoRef, branch: &str) -> Result<()>;
}

/// Create the GitHub platform service from settings and a resolved token
pub fn create_platform_service(
    settings: &GitHubSettings,
    token: &str,
) -> Result<Arc<dyn PlatformService>> {
    let service = GitHubService::new(token, settings.host.clone())?;
    Ok(Arc::new(service))
}
