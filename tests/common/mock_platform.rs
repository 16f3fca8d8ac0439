//! Mock platform service for testing
//!
//! Not every helper is used by every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use eggtimer::error::{Error, Result};
use eggtimer::platform::PlatformService;
use eggtimer::types::{
    MergeMethod, MergeResult, OpenPullRequest, PrId, PullRequestDetails, RepoRef, ReviewSummary,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr: PrId,
    pub expected_head_sha: String,
    pub method: MergeMethod,
}

/// Call record for `delete_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteBranchCall {
    pub repo: RepoRef,
    pub branch: String,
}

/// Hand-written mock of `PlatformService`
///
/// Features:
/// - Configurable responses per PR / repository
/// - Call tracking for verification
/// - Error injection for failure path testing
#[derive(Default)]
pub struct MockPlatformService {
    pr_details_responses: Mutex<HashMap<PrId, PullRequestDetails>>,
    open_prs_responses: Mutex<HashMap<RepoRef, Vec<OpenPullRequest>>>,
    reviews_responses: Mutex<HashMap<PrId, Vec<ReviewSummary>>>,
    merge_responses: Mutex<HashMap<PrId, MergeResult>>,
    // Call tracking
    get_pr_details_calls: Mutex<Vec<PrId>>,
    list_open_calls: Mutex<Vec<RepoRef>>,
    list_reviews_calls: Mutex<Vec<PrId>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    delete_branch_calls: Mutex<Vec<DeleteBranchCall>>,
    // Error injection
    error_on_list_open: Mutex<Option<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
    error_on_delete_branch: Mutex<Option<String>>,
}

impl MockPlatformService {
    pub fn new() -> Self {
        Self::default()
    }

    // === Error injection methods ===

    /// Make `list_open_pull_requests` return an error
    pub fn fail_list_open(&self, msg: &str) {
        *self.error_on_list_open.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `delete_branch` return an error
    pub fn fail_delete_branch(&self, msg: &str) {
        *self.error_on_delete_branch.lock().unwrap() = Some(msg.to_string());
    }

    // === Response setup ===

    /// Set the response for `get_pr_details`
    pub fn set_pr_details(&self, pr: &PrId, head_sha: &str, mergeable: Option<bool>) {
        self.pr_details_responses.lock().unwrap().insert(
            pr.clone(),
            PullRequestDetails {
                head_sha: head_sha.to_string(),
                mergeable,
            },
        );
    }

    /// Add an open PR to the repository listing
    pub fn add_open_pr(&self, pr: &PrId, head_sha: &str, head_ref: &str) {
        self.open_prs_responses
            .lock()
            .unwrap()
            .entry(pr.repo.clone())
            .or_default()
            .push(OpenPullRequest {
                id: pr.clone(),
                head_sha: head_sha.to_string(),
                head_ref: head_ref.to_string(),
            });
    }

    /// Set the response for `list_reviews`
    pub fn set_reviews(&self, pr: &PrId, reviews: Vec<ReviewSummary>) {
        self.reviews_responses
            .lock()
            .unwrap()
            .insert(pr.clone(), reviews);
    }

    /// Set the response for `merge_pr` (defaults to a successful merge)
    pub fn set_merge_response(&self, pr: &PrId, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr.clone(), result);
    }

    // === Call inspection ===

    pub fn get_pr_details_calls(&self) -> Vec<PrId> {
        self.get_pr_details_calls.lock().unwrap().clone()
    }

    pub fn list_open_calls(&self) -> Vec<RepoRef> {
        self.list_open_calls.lock().unwrap().clone()
    }

    pub fn list_reviews_calls(&self) -> Vec<PrId> {
        self.list_reviews_calls.lock().unwrap().clone()
    }

    pub fn merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    pub fn delete_branch_calls(&self) -> Vec<DeleteBranchCall> {
        self.delete_branch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_pr_details(&self, pr: &PrId) -> Result<PullRequestDetails> {
        self.get_pr_details_calls.lock().unwrap().push(pr.clone());
        self.pr_details_responses
            .lock()
            .unwrap()
            .get(pr)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("no details for {pr}")))
    }

    async fn list_open_pull_requests(&self, repo: &RepoRef) -> Result<Vec<OpenPullRequest>> {
        self.list_open_calls.lock().unwrap().push(repo.clone());
        if let Some(msg) = self.error_on_list_open.lock().unwrap().clone() {
            return Err(Error::Platform(msg));
        }
        Ok(self
            .open_prs_responses
            .lock()
            .unwrap()
            .get(repo)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_reviews(&self, pr: &PrId) -> Result<Vec<ReviewSummary>> {
        self.list_reviews_calls.lock().unwrap().push(pr.clone());
        Ok(self
            .reviews_responses
            .lock()
            .unwrap()
            .get(pr)
            .cloned()
            .unwrap_or_default())
    }

    async fn merge_pr(
        &self,
        pr: &PrId,
        expected_head_sha: &str,
        method: MergeMethod,
    ) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            pr: pr.clone(),
            expected_head_sha: expected_head_sha.to_string(),
            method,
        });
        if let Some(msg) = self.error_on_merge_pr.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }
        Ok(self
            .merge_responses
            .lock()
            .unwrap()
            .get(pr)
            .cloned()
            .unwrap_or_else(|| MergeResult {
                merged: true,
                sha: Some(format!("merge-of-{expected_head_sha}")),
                message: None,
            }))
    }

    async fn delete_branch(&self, repo: &RepoRef, branch: &str) -> Result<()> {
        self.delete_branch_calls
            .lock()
            .unwrap()
            .push(DeleteBranchCall {
                repo: repo.clone(),
                branch: branch.to_string(),
            });
        match self.error_on_delete_branch.lock().unwrap().clone() {
            Some(msg) => Err(Error::GitHubApi(msg)),
            None => Ok(()),
        }
    }
}
