//! Diff-gated deployment reconciliation.
//!
//! A newly registered revision is compared structurally against each
//! live target's currently bound revision; only targets whose diff is
//! non-empty are updated. Reconciliation is sequential per target and
//! collects failures instead of aborting the batch, so one bad target
//! never hides the outcome of the others.

mod canonical;
mod config;
mod diff;
mod error;
mod reconcile;

pub use canonical::canonicalize_keys;
pub use config::DeployConfig;
pub use diff::{DeploymentDiffer, DEFAULT_IGNORED_FIELDS};
pub use error::{DeployError, DeployResult};
pub use reconcile::{ReconcileDriver, ReconcileReport, ReconcileSummary, TargetOutcome};
