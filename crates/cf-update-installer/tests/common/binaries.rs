//! Fake binaries, progress recorders and failing filesystem operations

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cf_update_core::RuntimeConfig;
use cf_update_installer::{DownloadProgress, FileOps, ProgressSink};

/// Create a fake binary file with the given content
pub fn create_fake_binary(path: &Path, content: &[u8]) -> io::Result<()> {
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}

/// Script body that behaves like `cf -v` for the given version
pub fn cf_version_script(version: &str) -> String {
    format!(
        "#!/bin/sh\nif [ \"$1\" = \"-v\" ]; then\n    echo \"cf version {}+2654a47-2015-11-18\"\n    exit 0\nfi\nexit 1\n",
        version
    )
}

/// Unix permission bits of a file
#[cfg(unix)]
pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

/// Runtime config pointing downloads at a mock server
pub fn config_for(server_uri: &str) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.network.release_url = server_uri.to_string();
    config.release_source.api_url = server_uri.to_string();
    config
}

/// Number of entries in a directory
pub fn entry_count(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

/// Progress sink that records every call
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    pub updates: Arc<Mutex<Vec<DownloadProgress>>>,
    pub finished: Arc<Mutex<Option<DownloadProgress>>>,
}

impl RecordingProgress {
    pub fn updates(&self) -> Vec<DownloadProgress> {
        self.updates.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Option<DownloadProgress> {
        self.finished.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn update(&self, progress: &DownloadProgress) {
        self.updates.lock().unwrap().push(progress.clone());
    }

    fn finish(&self, progress: &DownloadProgress) {
        *self.finished.lock().unwrap() = Some(progress.clone());
    }
}

/// File operations that fail renames out of one path
pub struct FailRenameFrom {
    pub from: PathBuf,
}

impl FileOps for FailRenameFrom {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if from == self.from {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "simulated rename failure",
            ));
        }
        fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// File operations whose removals always fail
pub struct FailRemove;

impl FileOps for FailRemove {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_file(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "simulated remove failure",
        ))
    }
}

/// File operations that fail every rename
pub struct FailAllRenames;

impl FileOps for FailAllRenames {
    fn rename(&self, _from: &Path, _to: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "simulated rename failure",
        ))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}
