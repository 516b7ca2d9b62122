//! Deployment error types

use fleetspec_orchestrator::OrchestratorError;
use fleetspec_types::DeployTarget;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the deployment path.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("deploy config file is not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("failed to read deploy config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse deploy config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A configured target has no live counterpart. This aborts the
    /// whole diff batch: a config naming a nonexistent service or
    /// rule is an authoring error, not a transient condition.
    #[error("{target} is not a live target")]
    UnknownTarget { target: DeployTarget },

    #[error("failed to serialize revision content for diffing: {0}")]
    ContentSerialize(serde_yaml::Error),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

/// Result type for deployment operations
pub type DeployResult<T> = std::result::Result<T, DeployError>;
