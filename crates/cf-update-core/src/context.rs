//! Host context: where the installed `cf` lives and which version it is
//!
//! The updater only needs two facts from its host before an update attempt:
//! the filesystem path of the binary to replace and the version it reports.
//! [`HostContext`] exposes exactly those, so tests can supply a
//! [`StaticContext`] while the CLI detects the real values with [`CfContext`].

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::CF_EXECUTABLE;

/// Matches the semantic version inside `cf -v` output,
/// e.g. `cf version 6.14.0+2654a47-2015-11-18`
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+").expect("valid version regex"));

/// Capabilities the updater needs from its host
pub trait HostContext {
    /// Path of the live binary that will be replaced
    fn executable_path(&self) -> &Path;

    /// Version string of the live binary (e.g. "6.14.0")
    fn version(&self) -> &str;
}

/// Context of the `cf` binary installed on this machine
#[derive(Debug, Clone)]
pub struct CfContext {
    path: PathBuf,
    version: String,
}

impl CfContext {
    /// Locate `cf` on PATH and read its version
    pub fn detect() -> Result<Self> {
        let path = which::which(CF_EXECUTABLE).map_err(|e| Error::ExecutableNotFound {
            name: CF_EXECUTABLE.to_string(),
            reason: e.to_string(),
        })?;

        Self::at(path)
    }

    /// Use an explicit binary path and read its version
    pub fn at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let version = read_binary_version(&path)?;

        debug!("cf version: {}", version);
        debug!("cf path to update: {}", path.display());

        Ok(Self { path, version })
    }
}

impl HostContext for CfContext {
    fn executable_path(&self) -> &Path {
        &self.path
    }

    fn version(&self) -> &str {
        &self.version
    }
}

/// Fixed context values
#[derive(Debug, Clone)]
pub struct StaticContext {
    pub path: PathBuf,
    pub version: String,
}

impl StaticContext {
    pub fn new(path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}

impl HostContext for StaticContext {
    fn executable_path(&self) -> &Path {
        &self.path
    }

    fn version(&self) -> &str {
        &self.version
    }
}

/// Run `<binary> -v` and extract the version number it reports
pub fn read_binary_version(binary: &Path) -> Result<String> {
    let output = Command::new(binary)
        .arg("-v")
        .output()
        .map_err(|e| Error::version_command(e.to_string(), String::new()))?;

    if !output.status.success() {
        return Err(Error::version_command(
            format!("{} exited with {}", binary.display(), output.status),
            String::from_utf8_lossy(&output.stderr),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_version(&stdout).ok_or_else(|| Error::VersionNotFound {
        output: stdout.trim().to_string(),
    })
}

/// Extract the first `MAJOR.MINOR.PATCH` occurrence from version output
pub fn parse_version(output: &str) -> Option<String> {
    VERSION_RE.find(output).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_from_cf_output() {
        assert_eq!(
            parse_version("cf version 6.14.0+2654a47-2015-11-18\n").as_deref(),
            Some("6.14.0")
        );
        assert_eq!(parse_version("cf version 8.7.10").as_deref(), Some("8.7.10"));
        assert_eq!(parse_version("cf version dev"), None);
    }

    #[test]
    fn test_static_context() {
        let ctx = StaticContext::new("/usr/local/bin/cf", "6.10.0");
        assert_eq!(ctx.executable_path(), Path::new("/usr/local/bin/cf"));
        assert_eq!(ctx.version(), "6.10.0");
    }

    #[test]
    fn test_read_version_missing_binary() {
        let err = read_binary_version(Path::new("/nonexistent/cf")).unwrap_err();
        assert!(matches!(err, Error::VersionCommand { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_cf_context_at_script() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let cf = temp.path().join("cf");
        std::fs::write(
            &cf,
            "#!/bin/sh\necho \"cf version 6.10.0+b6a3d30-2015-02-06\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&cf, std::fs::Permissions::from_mode(0o755)).unwrap();

        let ctx = CfContext::at(&cf).unwrap();
        assert_eq!(ctx.version(), "6.10.0");
        assert_eq!(ctx.executable_path(), cf.as_path());
    }

    #[cfg(unix)]
    #[test]
    fn test_cf_context_failing_binary() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let cf = temp.path().join("cf");
        std::fs::write(&cf, "#!/bin/sh\necho 'boom' >&2\nexit 3\n").unwrap();
        std::fs::set_permissions(&cf, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = CfContext::at(&cf).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
