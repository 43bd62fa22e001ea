//! CLI command implementations
//!
//! Commands return process exit codes:
//! - 0: success
//! - 1: backup finished with failed dashboards
//! - 2: configuration error
//! - 4: AWS identity or connection error
//! - 5: fatal error

pub mod backup;
pub mod init;
pub mod list;
pub mod validate;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PARTIAL_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;
pub const EXIT_CONNECTION_ERROR: i32 = 4;
pub const EXIT_FATAL: i32 = 5;
