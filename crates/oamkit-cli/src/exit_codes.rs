//! Standard exit codes for CLI operations
//!
//! Argument errors are reported by clap with its own code (2).

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Application not found, or no application in the bundle
pub const NOT_FOUND: i32 = 3;

/// Input error - unreadable archive, invalid YAML, unconvertible application
pub const INPUT_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
