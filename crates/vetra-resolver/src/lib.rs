//! # vetra-resolver
//!
//! Resolves the latest published version of each vetra plugin by
//! querying the registry its metadata points at: source-repository
//! release tags, npm, PyPI, Packagist, or a local `gem` query.
//! Also hosts the batch version-update driver that walks every
//! plugin directory and refreshes recorded versions.

pub mod archive;
pub mod batch;
pub mod errors;
pub mod github;
pub mod registries;
pub mod resolver;

pub use batch::{rewrite_versions, BatchUpdater, UpdateReport};
pub use errors::ResolveError;
pub use github::GithubClient;
pub use resolver::VersionResolver;
