//! Shared constants for test infrastructure

// Version constants
pub const VERSION_6_10_0: &str = "6.10.0";
pub const VERSION_6_13_0: &str = "6.13.0";
pub const VERSION_6_14_0: &str = "6.14.0";

// Release identifiers
pub const RELEASE_LINUX64: &str = "linux64-binary";
pub const RELEASE_WINDOWS64: &str = "windows64-exe";

// Archive member names
pub const MEMBER_CF: &str = "cf";
pub const MEMBER_CF_EXE: &str = "cf.exe";

// Binary content for testing
pub const ORIGINAL_CONTENT: &[u8] = b"original cf binary";
pub const NEW_CONTENT: &[u8] = b"new cf binary";
pub const OTHER_CONTENT: &[u8] = b"not the binary you are looking for";
pub const GARBAGE_CONTENT: &[u8] = b"this is not an archive at all";

// Unix permission bits
pub const MODE_EXECUTABLE: u32 = 0o755;
pub const MODE_RESTRICTED: u32 = 0o750;
pub const MODE_DATA: u32 = 0o644;
