//! Type definitions for cf-update

mod runtime_config;

pub use runtime_config::{NetworkConfig, ReleaseSourceConfig, RuntimeConfig, UpdateConfig};
