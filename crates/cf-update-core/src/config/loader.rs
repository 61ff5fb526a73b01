//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.cf-update/config.yaml)
//! 3. Environment variables (CF_UPDATE_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "runtime-defaults.yaml";
const USER_CONFIG_FILE: &str = "config.yaml";

/// Configuration hierarchy loader
pub struct ConfigLoader {
    /// Directory holding the user configuration file
    config_dir: Utf8PathBuf,
}

impl ConfigLoader {
    /// Create a loader rooted at the standard config directory (~/.cf-update)
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|p| Error::invalid_config(format!("Home directory is not UTF-8: {:?}", p)))?;

        Ok(Self {
            config_dir: home.join(".cf-update"),
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load(&self) -> Result<RuntimeConfig> {
        let mut config = Self::load_embedded_config::<RuntimeConfig>(DEFAULTS_FILE)?;

        let user_config_path = self.config_dir.join(USER_CONFIG_FILE);
        if user_config_path.exists() {
            debug!("Loading user config from {}", user_config_path);
            // Keys missing from the user file fall back to serde defaults,
            // which match the embedded defaults.
            config = self.load_yaml_file::<RuntimeConfig>(&user_config_path)?;
        }

        Self::apply_env_overrides(config)
    }

    /// Load an embedded configuration file
    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Load a YAML file and parse it
    fn load_yaml_file<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("CF_UPDATE_RELEASE_URL") {
            config.network.release_url = val;
        }

        if let Ok(val) = env::var("CF_UPDATE_USER_AGENT") {
            config.network.user_agent = val;
        }

        if let Ok(val) = env::var("CF_UPDATE_DOWNLOAD_TIMEOUT_SECS") {
            config.network.download_timeout_secs = Some(val.parse().map_err(|_| {
                Error::invalid_config("CF_UPDATE_DOWNLOAD_TIMEOUT_SECS must be a valid number")
            })?);
        }

        if let Ok(val) = env::var("CF_UPDATE_GITHUB_API_URL") {
            config.release_source.api_url = val;
        }

        if let Ok(val) = env::var("CF_UPDATE_REPO_OWNER") {
            config.release_source.repo_owner = val;
        }

        if let Ok(val) = env::var("CF_UPDATE_REPO_NAME") {
            config.release_source.repo_name = val;
        }

        if let Ok(val) = env::var("CF_UPDATE_ROLLBACK_ON_SWAP_FAILURE") {
            config.update.rollback_on_swap_failure = parse_bool(&val).ok_or_else(|| {
                Error::invalid_config("CF_UPDATE_ROLLBACK_ON_SWAP_FAILURE must be true or false")
            })?;
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
