//! Error types for cf-update-core

use thiserror::Error;

/// Result type alias using cf-update-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for cf-update
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The cf executable could not be located
    #[error("Could not find `{name}` on PATH: {reason}")]
    ExecutableNotFound { name: String, reason: String },

    /// Running the binary to read its version failed
    #[error("Failed to get cf version string: {reason}\nOutput of cf command:\n{stderr}")]
    VersionCommand { reason: String, stderr: String },

    /// The version output did not contain a version number
    #[error("No version number found in output: {output}")]
    VersionNotFound { output: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a version command error
    pub fn version_command(reason: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::VersionCommand {
            reason: reason.into(),
            stderr: stderr.into(),
        }
    }
}
