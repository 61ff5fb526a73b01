//! Self-update machinery for the cf CLI
//!
//! Provides:
//! - Release artifact resolution per OS/architecture
//! - Artifact download with progress reporting
//! - Single-member extraction from tar.gz and zip archives
//! - Staging of the new binary beside the live one
//! - Rename-based replacement of the running binary
//! - Latest-version lookup against the cf CLI's GitHub tags

pub mod download;
pub mod error;
pub mod extract;
pub mod installer;
pub mod platform;
pub mod progress;
pub mod releases;
pub mod replace;

pub use download::{ArtifactDownloader, DownloadProgress};
pub use error::{DownloadFailure, Error, Result};
pub use extract::{extract_tar_gz, extract_zip};
pub use installer::Installer;
pub use platform::{resolve, resolve_current, ArchiveFormat, ArtifactDescriptor, DownloadTarget};
pub use progress::{BarProgress, NoProgress, ProgressSink};
pub use releases::{LatestRelease, VersionCheck};
pub use replace::{BinaryPaths, FileOps, Replacement, StdFileOps};
