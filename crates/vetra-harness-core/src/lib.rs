//! # vetra-harness-core
//!
//! Foundation crate for the vetra plugin verification harness.
//! Defines plugin metadata types, harness configuration, findings,
//! errors, and tracing setup. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod errors;
pub mod findings;
pub mod plugin;
pub mod trace;

// Re-export the most commonly used types at the crate root.
pub use config::{HarnessOptions, VersionSpec};
pub use errors::PluginConfigError;
pub use findings::{normalize_findings, Finding, NormalizedResults, RunResult};
pub use plugin::{PluginDefinition, PluginFile, ResolutionStrategy};
