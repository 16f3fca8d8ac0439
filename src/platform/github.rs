//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    MergeMethod, MergeResult, OpenPullRequest, PrId, PullRequestDetails, RepoRef, ReviewSummary,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::pulls::ReviewState;
use octocrab::params::repos::Reference;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Page size used when listing open pull requests
const LIST_PAGE_SIZE: usize = 100;

/// Public GitHub API root
const GITHUB_API: &str = "https://api.github.com";

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests (PR listing)
    token: String,
    /// HTTP client for raw requests (PR listing)
    http_client: Client,
    /// API root for raw requests, without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` selects a GitHub Enterprise instance; `None` targets github.com.
    pub fn new(token: &str, host: Option<String>) -> Result<Self> {
        let api_base = host.map_or_else(
            || GITHUB_API.to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_api_base(token, &api_base)
    }

    /// Create a service against an explicit API root (e.g. a local mock server)
    pub fn with_api_base(token: &str, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&api_base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("eggtimer")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    /// Fetch one page of open pull requests
    async fn list_open_page(&self, repo: &RepoRef, page: u32) -> Result<Vec<PullSummary>> {
        let url = format!(
            "{}/repos/{}/{}/pulls?state=open&per_page={LIST_PAGE_SIZE}&page={page}",
            self.api_base, repo.owner, repo.name
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to list pull requests: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "Listing pull requests for {repo} returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse pull requests: {e}")))
    }
}

#[derive(Deserialize)]
struct PullSummary {
    url: String,
    head: HeadSummary,
}

#[derive(Deserialize)]
struct HeadSummary {
    sha: String,
    #[serde(rename = "ref")]
    ref_name: String,
}

impl PullSummary {
    /// `None` (with a warning) when the API URL isn't a PR URL
    fn into_open_pull_request(self) -> Option<OpenPullRequest> {
        match PrId::from_api_url(&self.url) {
            Ok(id) => Some(OpenPullRequest {
                id,
                head_sha: self.head.sha,
                head_ref: self.head.ref_name,
            }),
            Err(e) => {
                warn!(url = %self.url, error = %e, "skipping unrecognized pull request");
                None
            }
        }
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_pr_details(&self, pr: &PrId) -> Result<PullRequestDetails> {
        debug!(pr = %pr, "getting PR details");

        let pull = self
            .client
            .pulls(&pr.repo.owner, &pr.repo.name)
            .get(pr.number)
            .await?;

        let details = PullRequestDetails {
            head_sha: pull.head.sha,
            mergeable: pull.mergeable,
        };

        debug!(
            pr = %pr,
            sha = %details.head_sha,
            mergeable = ?details.mergeable,
            "got PR details"
        );
        Ok(details)
    }

    async fn list_open_pull_requests(&self, repo: &RepoRef) -> Result<Vec<OpenPullRequest>> {
        debug!(repo = %repo, "listing open PRs");

        let mut result = Vec::new();
        for page in 1u32.. {
            let pulls = self.list_open_page(repo, page).await?;
            let count = pulls.len();
            result.extend(pulls.into_iter().filter_map(PullSummary::into_open_pull_request));
            if count < LIST_PAGE_SIZE {
                break;
            }
        }

        debug!(repo = %repo, count = result.len(), "listed open PRs");
        Ok(result)
    }

    async fn list_reviews(&self, pr: &PrId) -> Result<Vec<ReviewSummary>> {
        debug!(pr = %pr, "listing reviews");

        let first_page = self
            .client
            .pulls(&pr.repo.owner, &pr.repo.name)
            .list_reviews(pr.number)
            .send()
            .await?;
        let reviews = self.client.all_pages(first_page).await?;

        // Pending reviews are unsubmitted drafts
        let result: Vec<ReviewSummary> = reviews
            .into_iter()
            .filter_map(|r| {
                let state = r.state?;
                if state == ReviewState::Pending {
                    return None;
                }
                Some(ReviewSummary {
                    id: r.id.0,
                    approved: state == ReviewState::Approved,
                    commit_id: r.commit_id,
                })
            })
            .collect();

        debug!(pr = %pr, count = result.len(), "listed reviews");
        Ok(result)
    }

    async fn merge_pr(
        &self,
        pr: &PrId,
        expected_head_sha: &str,
        method: MergeMethod,
    ) -> Result<MergeResult> {
        debug!(pr = %pr, sha = expected_head_sha, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&pr.repo.owner, &pr.repo.name)
            .merge(pr.number)
            .sha(expected_head_sha)
            .method(octocrab_method)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr = %pr,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn delete_branch(&self, repo: &RepoRef, branch: &str) -> Result<()> {
        debug!(repo = %repo, branch, "deleting branch");
        self.client
            .repos(&repo.owner, &repo.name)
            .delete_ref(&Reference::Branch(branch.to_string()))
            .await?;
        debug!(repo = %repo, branch, "deleted branch");
        Ok(())
    }
}
