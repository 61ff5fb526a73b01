//! Installer: resolve, download and extract one cf release
//!
//! The installer owns a private temporary workspace for the duration of a
//! single [`Installer::install`] call. The archive is downloaded into it and
//! the binary extracted to the caller's save path, which is the staged
//! `<live>.new` path; the live binary itself is never written here. The
//! workspace is removed when the call returns, whatever the outcome.

use std::path::{Path, PathBuf};

use cf_update_core::RuntimeConfig;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::download::ArtifactDownloader;
use crate::error::{Error, Result};
use crate::extract::{extract_tar_gz, extract_zip};
use crate::platform::{self, ArchiveFormat, DownloadTarget};
use crate::progress::{NoProgress, ProgressSink};
use crate::replace::BinaryPaths;

const WORKSPACE_PREFIX: &str = "cf-update";

/// Installs one resolved cf release to a path
pub struct Installer {
    target: DownloadTarget,
    downloader: ArtifactDownloader,
    progress: Box<dyn ProgressSink>,
    workspace_root: Option<PathBuf>,
}

impl Installer {
    /// Create an installer for `version` on the platform this binary runs on
    pub fn new(version: &str, config: &RuntimeConfig) -> Result<Self> {
        let target = platform::resolve_current(&config.network.release_url, version)?;
        Self::with_target(target, config)
    }

    /// Create an installer for `version` on an explicit platform
    pub fn for_platform(os: &str, arch: &str, version: &str, config: &RuntimeConfig) -> Result<Self> {
        let target = platform::resolve(&config.network.release_url, os, arch, version)?;
        Self::with_target(target, config)
    }

    fn with_target(target: DownloadTarget, config: &RuntimeConfig) -> Result<Self> {
        let downloader = ArtifactDownloader::new(&config.network)?;

        Ok(Self {
            target,
            downloader,
            progress: Box::new(NoProgress),
            workspace_root: None,
        })
    }

    /// Report download progress to `sink`
    pub fn with_progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(sink);
        self
    }

    /// Create workspaces under `root` instead of the system temp directory
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// The resolved download target
    pub fn target(&self) -> &DownloadTarget {
        &self.target
    }

    /// Stage the new binary beside the live one (`<live>.new`)
    pub async fn install_staged(&self, paths: &BinaryPaths) -> Result<()> {
        self.install(&paths.staged).await
    }

    /// Download the release and extract its binary to `save_path`
    pub async fn install(&self, save_path: &Path) -> Result<()> {
        let workspace = self.create_workspace()?;
        debug!("Workspace: {}", workspace.path().display());

        let result = self.install_in(workspace.path(), save_path).await;

        let workspace_path = workspace.path().to_path_buf();
        if let Err(e) = workspace.close() {
            warn!(
                "Failed to remove workspace {}: {}",
                workspace_path.display(),
                e
            );
        }

        result
    }

    fn create_workspace(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);

        let workspace = match &self.workspace_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        workspace.map_err(Error::Workspace)
    }

    async fn install_in(&self, workspace: &Path, save_path: &Path) -> Result<()> {
        let archive_path = workspace.join(self.target.file_name());

        self.downloader
            .download(&self.target.url, &archive_path, self.progress.as_ref())
            .await?;

        info!("Start extracting from {}", archive_path.display());
        let member = self.target.artifact.binary_member();
        match self.target.format() {
            ArchiveFormat::TarGz => extract_tar_gz(&archive_path, member, save_path),
            ArchiveFormat::Zip => extract_zip(&archive_path, member, save_path),
        }
    }
}
