//! Core types for eggtimer

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

/// Git commit SHA (hex)
pub type CommitSha = String;

/// A repository on the platform, `owner/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoRef {
    /// Create a repository reference
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Stable identity of a pull request
///
/// Derived from the PR's canonical API URL
/// (`https://api.github.com/repos/{owner}/{repo}/pulls/{number}`), so two
/// events about the same PR always map to the same key no matter which
/// payload they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrId {
    /// Repository the PR belongs to
    pub repo: RepoRef,
    /// PR number
    pub number: u64,
}

impl PrId {
    /// Create a PR id from its parts
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            repo: RepoRef::new(owner, repo),
            number,
        }
    }

    /// Parse a PR API URL.
    ///
    /// Accepts `https://api.github.com/repos/o/r/pulls/5` as well as the
    /// GitHub Enterprise form `https://ghe.example.com/api/v3/repos/o/r/pulls/5`.
    pub fn from_api_url(api_url: &str) -> Result<Self> {
        let invalid = || Error::InvalidPrUrl(api_url.to_string());

        let parsed = Url::parse(api_url).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid());
        }

        let segments: Vec<&str> = parsed
            .path_segments()
            .ok_or_else(invalid)?
            .filter(|s| !s.is_empty())
            .collect();

        let rest = match segments.as_slice() {
            ["api", "v3", rest @ ..] => rest,
            rest => rest,
        };

        match rest {
            ["repos", owner, repo, "pulls", number] => {
                let number = number.parse().map_err(|_| invalid())?;
                Ok(Self::new(*owner, *repo, number))
            }
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for PrId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.repo, self.number)
    }
}

/// Outcome of an external check/status against a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckState {
    /// Check passed
    Success,
    /// Check is still running
    Pending,
    /// Check failed or errored
    Failure,
}

impl CheckState {
    /// Map a commit status `state` (`success`, `pending`, `failure`, `error`).
    ///
    /// Anything else is treated as a failure and logged.
    pub fn from_status(state: &str) -> Self {
        match state {
            "success" => Self::Success,
            "pending" => Self::Pending,
            "failure" | "error" => Self::Failure,
            other => {
                warn!(state = other, "unknown check state, treating as failure");
                Self::Failure
            }
        }
    }

    /// Map a check run's `status` and `conclusion`.
    ///
    /// Runs that haven't completed are pending. Completed runs pass on
    /// `success`, `neutral` or `skipped`.
    pub fn from_check_run(status: &str, conclusion: Option<&str>) -> Self {
        if status != "completed" {
            return Self::Pending;
        }
        match conclusion {
            Some("success" | "neutral" | "skipped") => Self::Success,
            _ => Self::Failure,
        }
    }

    /// Whether this check counts towards readiness
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Pending => write!(f, "pending"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// PR details as reported by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestDetails {
    /// Head commit the platform currently sees
    pub head_sha: CommitSha,
    /// Whether PR can be merged (no conflicts)
    /// - `Some(true)` = mergeable
    /// - `Some(false)` = has conflicts
    /// - `None` = unknown (GitHub still computing)
    pub mergeable: Option<bool>,
}

/// An open PR as returned by the repository listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPullRequest {
    /// PR identity
    pub id: PrId,
    /// Head commit
    pub head_sha: CommitSha,
    /// Head branch name
    pub head_ref: String,
}

/// A submitted review on a PR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    /// Review (submission) id
    pub id: u64,
    /// Whether the review approves the PR
    pub approved: bool,
    /// Commit the review was submitted against
    pub commit_id: Option<CommitSha>,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Squash all commits into one
    Squash,
    /// Create a merge commit
    #[default]
    Merge,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}
