//! Release artifact resolution
//!
//! Maps an OS/architecture pair to the published cf release identifier and
//! archive format, and builds the download URL for a version. No network
//! access happens here.

use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};

/// Release identifiers published by the download service
pub const MACOSX64: &str = "macosx64-binary";
pub const LINUX32: &str = "linux32-binary";
pub const LINUX64: &str = "linux64-binary";
pub const WINDOWS32: &str = "windows32-exe";
pub const WINDOWS64: &str = "windows64-exe";

/// Binary member names inside the archives
pub const CF_BINARY: &str = "cf";
pub const CF_EXE: &str = "cf.exe";

/// Container format of a release artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// gzip-compressed tar stream
    TarGz,
    /// zip archive
    Zip,
}

impl ArchiveFormat {
    /// Extension used for the downloaded file
    pub fn extension(&self) -> &'static str {
        match self {
            Self::TarGz => "tgz",
            Self::Zip => "zip",
        }
    }

    /// Name of the binary entry inside archives of this format
    pub fn binary_member(&self) -> &'static str {
        match self {
            Self::TarGz => CF_BINARY,
            Self::Zip => CF_EXE,
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TarGz => write!(f, "tar.gz"),
            Self::Zip => write!(f, "zip"),
        }
    }
}

/// Static description of the artifact published for one platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// Release identifier used in the download query
    pub release: &'static str,

    /// Archive container format
    pub format: ArchiveFormat,
}

impl ArtifactDescriptor {
    const fn new(release: &'static str, format: ArchiveFormat) -> Self {
        Self { release, format }
    }

    /// Name of the binary entry to extract
    pub fn binary_member(&self) -> &'static str {
        self.format.binary_member()
    }

    /// Look up the artifact for an OS/architecture pair
    ///
    /// OS names follow `std::env::consts::OS` (`darwin` is accepted for
    /// macOS). On Linux and Windows any architecture other than 32-bit x86
    /// gets the 64-bit artifact; macOS has a single artifact.
    pub fn for_platform(os: &str, arch: &str) -> Result<Self> {
        let os_lower = os.to_ascii_lowercase();
        let is_32bit = matches!(
            arch.to_ascii_lowercase().as_str(),
            "x86" | "386" | "i386" | "i586" | "i686"
        );

        let descriptor = match os_lower.as_str() {
            "macos" | "darwin" | "osx" => Self::new(MACOSX64, ArchiveFormat::TarGz),
            "linux" if is_32bit => Self::new(LINUX32, ArchiveFormat::TarGz),
            "linux" => Self::new(LINUX64, ArchiveFormat::TarGz),
            "windows" if is_32bit => Self::new(WINDOWS32, ArchiveFormat::Zip),
            "windows" => Self::new(WINDOWS64, ArchiveFormat::Zip),
            _ => return Err(Error::unsupported_platform(os, arch)),
        };

        Ok(descriptor)
    }
}

/// Where to fetch one version of the artifact from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Fully built download URL
    pub url: String,

    /// Artifact being downloaded
    pub artifact: ArtifactDescriptor,

    /// Requested version
    pub version: String,
}

impl DownloadTarget {
    /// Archive format of the artifact
    pub fn format(&self) -> ArchiveFormat {
        self.artifact.format
    }

    /// File name for the downloaded archive inside the workspace
    pub fn file_name(&self) -> String {
        format!("{}.{}", CF_BINARY, self.artifact.format.extension())
    }
}

/// Resolve the download target for a platform and version
///
/// `release_url` is the base of the download service, e.g.
/// `https://cli.run.pivotal.io`.
pub fn resolve(release_url: &str, os: &str, arch: &str, version: &str) -> Result<DownloadTarget> {
    let artifact = ArtifactDescriptor::for_platform(os, arch)?;
    let url = format!(
        "{}/stable?release={}&version={}",
        release_url.trim_end_matches('/'),
        artifact.release,
        version
    );

    debug!(
        "Resolved {}-{} -> {} ({}): {}",
        os, arch, artifact.release, artifact.format, url
    );

    Ok(DownloadTarget {
        url,
        artifact,
        version: version.to_string(),
    })
}

/// Resolve the download target for the platform this binary was built for
pub fn resolve_current(release_url: &str, version: &str) -> Result<DownloadTarget> {
    resolve(
        release_url,
        std::env::consts::OS,
        std::env::consts::ARCH,
        version,
    )
}
