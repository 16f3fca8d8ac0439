//! Error types for eggtimer

use thiserror::Error;

/// Errors raised by the auto-merge core and its collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API call failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Error returned by octocrab
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Generic platform failure (used by non-GitHub services and test doubles)
    #[error("platform error: {0}")]
    Platform(String),

    /// No usable GitHub token could be found
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration file could not be read or parsed
    #[error("config error: {0}")]
    Config(String),

    /// A pull request API URL did not match the expected shape
    #[error("invalid pull request URL: {0}")]
    InvalidPrUrl(String),

    /// A webhook payload could not be decoded
    #[error("invalid webhook payload: {0}")]
    Payload(String),

    /// JSON (de)serialization failure
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
