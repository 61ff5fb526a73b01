//! Rename-based replacement of the live binary
//!
//! A running executable cannot be overwritten or unlinked on every OS, but it
//! can always be renamed. The swap therefore runs as three ordered steps on
//! the path triple `{P, P.new, P.old}`:
//!
//! 1. rename `P` to `P.old` (backup)
//! 2. rename `P.new` to `P` (swap)
//! 3. remove `P.old` (best-effort cleanup)
//!
//! If step 1 fails nothing has changed and the staged download is kept. If
//! step 2 fails `P` is missing and the previous binary sits at `P.old`; by
//! default it is left there for manual recovery, see
//! [`Replacement::with_rollback`].

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

const STAGED_SUFFIX: &str = ".new";
const BACKUP_SUFFIX: &str = ".old";

/// The live, staged and backup paths of one binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPaths {
    /// Binary the host launches (`P`)
    pub live: PathBuf,

    /// Freshly extracted binary waiting to be swapped in (`P.new`)
    pub staged: PathBuf,

    /// Where the previous binary is parked during the swap (`P.old`)
    pub backup: PathBuf,
}

impl BinaryPaths {
    /// Build the path triple for a live binary
    pub fn for_live(live: impl Into<PathBuf>) -> Self {
        let live = live.into();
        Self {
            staged: with_suffix(&live, STAGED_SUFFIX),
            backup: with_suffix(&live, BACKUP_SUFFIX),
            live,
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Filesystem operations used by the swap
pub trait FileOps {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// [`FileOps`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileOps;

impl FileOps for StdFileOps {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// Swaps a staged binary into the live location
pub struct Replacement<F: FileOps = StdFileOps> {
    paths: BinaryPaths,
    ops: F,
    rollback_on_swap_failure: bool,
}

impl Replacement<StdFileOps> {
    /// Create a replacement for the given path triple
    pub fn new(paths: BinaryPaths) -> Self {
        Self {
            paths,
            ops: StdFileOps,
            rollback_on_swap_failure: false,
        }
    }
}

impl<F: FileOps> Replacement<F> {
    /// Use different filesystem operations
    pub fn with_file_ops<G: FileOps>(self, ops: G) -> Replacement<G> {
        Replacement {
            paths: self.paths,
            ops,
            rollback_on_swap_failure: self.rollback_on_swap_failure,
        }
    }

    /// Rename `P.old` back to `P` when the swap step fails
    pub fn with_rollback(mut self, enabled: bool) -> Self {
        self.rollback_on_swap_failure = enabled;
        self
    }

    /// The path triple being operated on
    pub fn paths(&self) -> &BinaryPaths {
        &self.paths
    }

    /// Run the backup, swap and cleanup steps in order
    pub fn run(&self) -> Result<()> {
        let BinaryPaths {
            live,
            staged,
            backup,
        } = &self.paths;

        if !self.ops.exists(staged) {
            return Err(Error::StagedBinaryMissing {
                staged: staged.clone(),
            });
        }

        self.remove_stale_backup();

        debug!("Rename {} -> {}", live.display(), backup.display());
        self.ops
            .rename(live, backup)
            .map_err(|source| Error::BackupFailed {
                live: live.clone(),
                backup: backup.clone(),
                staged: staged.clone(),
                source,
            })?;

        debug!("Rename {} -> {}", staged.display(), live.display());
        if let Err(source) = self.ops.rename(staged, live) {
            return Err(self.swap_failed(source));
        }

        if let Err(e) = self.ops.remove_file(backup) {
            warn!("Failed to remove {}: {}", backup.display(), e);
        }

        info!("Replaced {}", live.display());
        Ok(())
    }

    /// Remove a `P.old` left behind by an earlier run
    fn remove_stale_backup(&self) {
        let backup = &self.paths.backup;
        if !self.ops.exists(backup) {
            return;
        }

        debug!("Removing stale backup {}", backup.display());
        if let Err(e) = self.ops.remove_file(backup) {
            warn!("Failed to remove stale backup {}: {}", backup.display(), e);
        }
    }

    fn swap_failed(&self, source: io::Error) -> Error {
        let BinaryPaths {
            live,
            staged,
            backup,
        } = &self.paths;

        if self.rollback_on_swap_failure {
            warn!("Swap failed, restoring {}", live.display());
            match self.ops.rename(backup, live) {
                Ok(()) => {
                    return Error::SwapRolledBack {
                        live: live.clone(),
                        staged: staged.clone(),
                        source,
                    }
                }
                Err(e) => warn!("Rollback failed: {}", e),
            }
        }

        Error::SwapFailed {
            live: live.clone(),
            staged: staged.clone(),
            backup: backup.clone(),
            source,
        }
    }
}
