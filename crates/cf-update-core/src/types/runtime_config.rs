//! Runtime configuration types for operational parameters
//!
//! These types control where artifacts and release metadata are fetched
//! from, HTTP client behavior, and how the binary swap reacts to failure.

use serde::{Deserialize, Serialize};

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Where the latest published version is looked up
    #[serde(default)]
    pub release_source: ReleaseSourceConfig,

    /// Binary replacement behavior
    #[serde(default)]
    pub update: UpdateConfig,
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Base URL of the artifact download service
    #[serde(default = "default_release_url")]
    pub release_url: String,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Download timeout in seconds; the transport default applies when unset
    #[serde(default)]
    pub download_timeout_secs: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            release_url: default_release_url(),
            user_agent: default_user_agent(),
            download_timeout_secs: None,
        }
    }
}

fn default_release_url() -> String {
    "https://cli.run.pivotal.io".to_string()
}

fn default_user_agent() -> String {
    format!(
        "cf-update/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Release metadata source (GitHub tags of the cf CLI repository)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseSourceConfig {
    /// GitHub API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Repository owner
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,

    /// Repository name
    #[serde(default = "default_repo_name")]
    pub repo_name: String,
}

impl Default for ReleaseSourceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_repo_owner() -> String {
    "cloudfoundry".to_string()
}
fn default_repo_name() -> String {
    "cli".to_string()
}

/// Binary replacement settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateConfig {
    /// Rename `<path>.old` back into place when the final swap fails.
    /// Off by default: the previous binary is left at `<path>.old` for
    /// manual recovery.
    #[serde(default)]
    pub rollback_on_swap_failure: bool,
}
