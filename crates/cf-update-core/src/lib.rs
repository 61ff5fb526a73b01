//! # cf-update-core
//!
//! Core library for cf-update providing:
//! - Runtime configuration types and the hierarchical loader
//! - Host context (location and version of the installed `cf` binary)
//! - Error types shared by the CLI

pub mod config;
pub mod context;
pub mod error;
pub mod types;

pub use config::ConfigLoader;
pub use context::{read_binary_version, CfContext, HostContext, StaticContext};
pub use error::{Error, Result};
pub use types::RuntimeConfig;

/// Name of the executable this tool keeps up to date
pub const CF_EXECUTABLE: &str = "cf";
