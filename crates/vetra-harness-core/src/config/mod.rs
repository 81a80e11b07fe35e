//! Harness configuration.
//!
//! All environment variables are read in exactly one place
//! ([`HarnessOptions::from_env`]) and threaded explicitly into the
//! matrix runner. Inner components never touch the process
//! environment themselves.

mod options;

pub use options::{HarnessOptions, VersionSpec};
