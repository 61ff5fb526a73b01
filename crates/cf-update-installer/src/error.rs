//! Error types for cf-update-installer
//!
//! Every variant is fatal for the update attempt that produced it. The
//! messages are written for the person running the update: the swap failure
//! in particular says where the previous binary went and how to restore it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using cf-update-installer's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Update errors
#[derive(Error, Debug)]
pub enum Error {
    /// No artifact is published for this OS/architecture
    #[error("No binary is available for your OS: {os} ({arch})")]
    UnsupportedPlatform { os: String, arch: String },

    /// Could not create the private temporary workspace
    #[error("Failed to create temporary workspace: {0}")]
    Workspace(#[source] io::Error),

    /// The artifact could not be fetched
    #[error("Failed to download {url}: {reason}")]
    DownloadFailed {
        url: String,
        #[source]
        reason: DownloadFailure,
    },

    /// The archive could not be opened or decoded
    #[error("Failed to read archive {}: {source}", .archive.display())]
    Archive {
        archive: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive does not contain the expected binary
    #[error("{member} is not found in {}", .archive.display())]
    MemberNotFound { member: String, archive: PathBuf },

    /// Writing the extracted binary failed
    #[error("Failed to write {}: {source}", .dest.display())]
    Extract {
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Swap requested but no staged binary exists
    #[error("Staged binary {} does not exist", .staged.display())]
    StagedBinaryMissing { staged: PathBuf },

    /// The live binary could not be moved out of the way; nothing was changed
    #[error(
        "Failed to move {} to {}: {source}\nNothing was changed. The downloaded binary is kept at {}",
        .live.display(), .backup.display(), .staged.display()
    )]
    BackupFailed {
        live: PathBuf,
        backup: PathBuf,
        staged: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The new binary could not be moved into place; the live binary is missing
    #[error(
        "Failed to move {} to {}: {source}\n{} is now missing. Your previous cf binary is at {}; \
         restore it with: mv \"{}\" \"{}\"",
        .staged.display(), .live.display(), .live.display(), .backup.display(),
        .backup.display(), .live.display()
    )]
    SwapFailed {
        live: PathBuf,
        staged: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The swap failed but the previous binary was restored
    #[error(
        "Failed to move {} to {}: {source}\nThe previous binary was restored; the downloaded binary is kept at {}",
        .staged.display(), .live.display(), .staged.display()
    )]
    SwapRolledBack {
        live: PathBuf,
        staged: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Release metadata lookup failed
    #[error("Release check failed: {message}")]
    Release { message: String },
}

/// Why a download failed
#[derive(Error, Debug)]
pub enum DownloadFailure {
    /// The server answered with something other than 200 OK
    #[error("Invalid status code: {0}")]
    BadStatus(u16),

    /// Connection or body transfer error
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Writing the downloaded bytes to disk failed
    #[error("{0}")]
    Write(#[from] io::Error),
}

impl Error {
    /// Create an unsupported platform error
    pub fn unsupported_platform(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Create a download failure for the given URL
    pub fn download_failed(url: impl Into<String>, reason: impl Into<DownloadFailure>) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a member not found error
    pub fn member_not_found(member: impl Into<String>, archive: impl Into<PathBuf>) -> Self {
        Self::MemberNotFound {
            member: member.into(),
            archive: archive.into(),
        }
    }

    /// Create a release metadata error
    pub fn release(message: impl Into<String>) -> Self {
        Self::Release {
            message: message.into(),
        }
    }

    /// HTTP status of a rejected download, if that is what failed
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::DownloadFailed {
                reason: DownloadFailure::BadStatus(status),
                ..
            } => Some(*status),
            _ => None,
        }
    }
}
