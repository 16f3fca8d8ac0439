//! GitHub token resolution

use super::AuthSource;
use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve a token from the config value or the environment.
///
/// `env` looks up a variable by name. Blank values are ignored.
pub fn resolve_static_token(
    configured: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<GitHubAuthConfig> {
    if let Some(token) = configured.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(GitHubAuthConfig {
            token: token.to_string(),
            source: AuthSource::Config,
        });
    }

    TOKEN_ENV_VARS.iter().find_map(|name| {
        let token = env(name)?;
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        debug!(var = name, "using GitHub token from environment");
        Some(GitHubAuthConfig {
            token: token.to_string(),
            source: AuthSource::EnvVar,
        })
    })
}

/// Get GitHub authentication
///
/// Order: config token, `GITHUB_TOKEN`, `GH_TOKEN`, then `gh auth token`.
pub async fn get_github_auth(
    configured: Option<&str>,
    host: Option<&str>,
) -> Result<GitHubAuthConfig> {
    if let Some(auth) = resolve_static_token(configured, |name| std::env::var(name).ok()) {
        return Ok(auth);
    }

    if let Some(token) = gh_cli_token(host).await {
        debug!("using GitHub token from gh cli");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "no GitHub token found: set [github] token in the config, GITHUB_TOKEN or GH_TOKEN, \
         or run `gh auth login`"
            .to_string(),
    ))
}

/// Ask the gh CLI for a token; `None` if gh is missing or logged out
async fn gh_cli_token(host: Option<&str>) -> Option<String> {
    let mut cmd = Command::new("gh");
    cmd.args(["auth", "token"]);
    if let Some(host) = host {
        cmd.args(["--hostname", host]);
    }

    let output = match cmd.output().await {
        Ok(output) => output,
        Err(e) => {
            debug!(error = %e, "gh cli not available");
            return None;
        }
    };
    if !output.status.success() {
        debug!(status = %output.status, "gh auth token failed");
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}
