//! # vetra-harness
//!
//! Drives the vetra CLI against plugin fixtures and verifies its
//! output with recorded snapshots. For every discovered fixture
//! target and every version the policy selects, one isolated,
//! version-controlled sandbox is provisioned, the external command
//! runs once inside it, and the normalized findings are compared
//! against (or recorded into) the target's snapshot file.

pub mod discovery;
pub mod driver;
pub mod errors;
pub mod matrix;
pub mod policy;
pub mod sandbox;
pub mod snapshot;
pub mod structure;

pub use discovery::{discover_inputs, FixtureInput, TestTarget};
pub use driver::SandboxDriver;
pub use errors::{ExecError, PolicyError, ProvisionError, SnapshotError};
pub use matrix::{CaseResult, CaseStatus, MatrixReport, MatrixRunner, SnapshotMode};
pub use policy::select_versions;
pub use sandbox::Sandbox;
pub use snapshot::{match_snapshot, serialize_results, SnapshotOutcome};
