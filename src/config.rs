//! Configuration file loading
//!
//! ```toml
//! delete_after_merge = true
//! mergeable_probe_delay_secs = 10
//! merge_method = "squash"
//!
//! [github]
//! host = "github.example.com"   # GitHub Enterprise, omit for github.com
//! token = "ghp_..."             # optional, see `auth`
//! ```

use crate::error::{Error, Result};
use crate::merge::{DEFAULT_PROBE_DELAY, MergeOptions};
use crate::types::MergeMethod;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the user's config dir
const CONFIG_DIR: &str = "eggtimer";

/// Config filename
const CONFIG_FILE: &str = "config.toml";

/// GitHub connection settings
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubSettings {
    /// GitHub Enterprise host (None for github.com)
    pub host: Option<String>,
    /// API token; falls back to the environment and `gh`
    pub token: Option<String>,
}

impl std::fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// eggtimer configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Delete the source branch after a successful merge
    pub delete_after_merge: bool,
    /// Seconds to wait before reading mergeability after a push or review
    pub mergeable_probe_delay_secs: u64,
    /// Merge method
    pub merge_method: MergeMethod,
    /// GitHub connection settings
    pub github: GitHubSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delete_after_merge: false,
            mergeable_probe_delay_secs: DEFAULT_PROBE_DELAY.as_secs(),
            merge_method: MergeMethod::default(),
            github: GitHubSettings::default(),
        }
    }
}

impl Config {
    /// Default config location (`$XDG_CONFIG_HOME/eggtimer/config.toml` or the
    /// platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Load an explicitly given file, or the default file if it exists.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Orchestrator options derived from this config
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            delete_after_merge: self.delete_after_merge,
            probe_delay: Duration::from_secs(self.mergeable_probe_delay_secs),
            method: self.merge_method,
        }
    }
}
