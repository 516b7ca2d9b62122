//! Overlay error types

use fleetspec_types::TargetPathError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced during overlay resolution.
///
/// All of these are fatal for the current resolution: a broken
/// fragment hierarchy is a configuration error, never retried.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("can't read fragment {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("can't parse fragment {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to render template {path}: {source}")]
    Template {
        path: PathBuf,
        source: minijinja::Error,
    },

    #[error("failed to decode variable bindings for template rendering: {0}")]
    BindingDecode(serde_yaml::Error),

    #[error("resolved task {task} is not a mapping")]
    TaskNotMapping { task: String },

    #[error("containerDefinitions of task {task} is missing or not a sequence")]
    ContainerDefinitionsShape { task: String },

    #[error(transparent)]
    Path(#[from] TargetPathError),
}

/// Result type for overlay operations
pub type OverlayResult<T> = std::result::Result<T, OverlayError>;
