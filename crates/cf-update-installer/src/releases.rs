//! Latest-version lookup against the cf CLI's GitHub tags

use cf_update_core::types::ReleaseSourceConfig;
use semver::Version;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// A repository tag as returned by the GitHub API
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    /// Tag name (e.g., "v6.14.0")
    pub name: String,
}

/// Outcome of comparing the installed version with the latest release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCheck {
    /// Version currently installed
    pub current: Version,

    /// Latest published version
    pub latest: Version,

    /// Whether `latest` is newer than `current`
    pub outdated: bool,
}

/// Looks up the latest published cf CLI version
pub struct LatestRelease {
    client: reqwest::Client,
    source: ReleaseSourceConfig,
}

impl LatestRelease {
    /// Create a checker for the configured repository
    pub fn new(source: ReleaseSourceConfig, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::release(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, source })
    }

    /// Fetch all tags of the repository
    pub async fn tags(&self) -> Result<Vec<Tag>> {
        let url = format!(
            "{}/repos/{}/{}/tags?per_page=100",
            self.source.api_url.trim_end_matches('/'),
            self.source.repo_owner,
            self.source.repo_name
        );

        debug!("Fetching tags from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| Error::release(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::release(format!(
                "Failed to fetch tags: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::release(format!("Invalid tag list from {}: {}", url, e)))
    }

    /// Latest release version among the repository tags
    pub async fn latest(&self) -> Result<Version> {
        let tags = self.tags().await?;
        latest_version(&tags).ok_or_else(|| {
            Error::release(format!(
                "No release tags found in {}/{}",
                self.source.repo_owner, self.source.repo_name
            ))
        })
    }

    /// Compare `current` with the latest release
    pub async fn check(&self, current: &str) -> Result<VersionCheck> {
        let current = Version::parse(current.trim_start_matches('v'))
            .map_err(|e| Error::release(format!("Invalid current version {}: {}", current, e)))?;
        let latest = self.latest().await?;
        let outdated = latest > current;

        if outdated {
            info!("Update available: {} -> {}", current, latest);
        } else {
            debug!("Already on latest version: {}", current);
        }

        Ok(VersionCheck {
            current,
            latest,
            outdated,
        })
    }
}

/// Highest semantic version among tags that look like releases
///
/// Tags without a `.` are ignored and a leading `v` is dropped. Tags that do
/// not parse as semver, and prereleases, are skipped.
pub fn latest_version(tags: &[Tag]) -> Option<Version> {
    tags.iter()
        .filter(|tag| tag.name.contains('.'))
        .filter_map(|tag| Version::parse(tag.name.trim_start_matches('v')).ok())
        .filter(|version| version.pre.is_empty())
        .max()
}
