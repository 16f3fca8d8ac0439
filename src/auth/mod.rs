//! Authentication for GitHub
//!
//! Supports a configured token, environment variables and the `gh` CLI.

mod github;

pub use github::{GitHubAuthConfig, get_github_auth, resolve_static_token};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from the config file
    Config,
    /// Token from environment variable
    EnvVar,
    /// Token from CLI tool (gh)
    Cli,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config => write!(f, "config"),
            Self::EnvVar => write!(f, "environment"),
            Self::Cli => write!(f, "gh cli"),
        }
    }
}
