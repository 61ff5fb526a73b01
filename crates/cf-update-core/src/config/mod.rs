//! Configuration loading for cf-update

mod loader;

pub use loader::ConfigLoader;
