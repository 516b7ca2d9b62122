//! Shared domain types for fleetspec.
//!
//! Everything that crosses a crate boundary lives here: normalized
//! target paths, deployment targets, revision records, and task
//! instance state as reported by the orchestrator.

mod instance;
mod path;
mod revision;
mod target;

pub use instance::{InstanceStatus, ServiceState, TaskInstance};
pub use path::{TargetPath, TargetPathError};
pub use revision::{Revision, RevisionId};
pub use target::DeployTarget;
