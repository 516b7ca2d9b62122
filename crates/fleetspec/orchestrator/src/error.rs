//! Orchestrator error types

use thiserror::Error;

/// Errors surfaced by orchestrator and scheduler-rule calls.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("remote call failed: {0}")]
    Remote(String),
}

/// Result type for orchestrator operations
pub type OrchestratorResult<T> = std::result::Result<T, OrchestratorError>;
