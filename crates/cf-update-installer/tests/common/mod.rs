//! Common test infrastructure for cf-update-installer tests
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Versions, release identifiers, test content
//! - `archives`: tar.gz and zip archive builders
//! - `mock_server`: Wiremock setup helpers for the download and tags endpoints
//! - `binaries`: Fake cf binaries, progress recorders and failing file operations

// Not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod archives;
pub mod binaries;
pub mod constants;
pub mod mock_server;

pub use archives::*;
pub use binaries::*;
pub use constants::*;
pub use mock_server::*;
