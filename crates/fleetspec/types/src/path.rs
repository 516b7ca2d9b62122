//! Normalized logical target paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while normalizing a target path.
#[derive(Debug, Error)]
pub enum TargetPathError {
    #[error("target path {0:?} escapes the hierarchy root")]
    EscapesRoot(String),

    #[error(r#"invalid name {0:?} (contains "/")"#)]
    NameContainsSeparator(String),
}

/// A slash-separated logical path into the fragment hierarchy.
///
/// Always normalized: a single leading separator, no trailing
/// separator, no empty or `.` components. `..` components pop the
/// previous component and may not climb above the root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetPath {
    components: Vec<String>,
}

impl TargetPath {
    /// Normalize a user-supplied path. Leading and duplicate
    /// separators are tolerated; the result is rooted.
    pub fn new(raw: &str) -> Result<Self, TargetPathError> {
        let mut components: Vec<String> = Vec::new();
        for part in raw.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    if components.pop().is_none() {
                        return Err(TargetPathError::EscapesRoot(raw.to_string()));
                    }
                }
                name => components.push(name.to_string()),
            }
        }
        Ok(Self { components })
    }

    /// A single-component path for a name, rejecting embedded
    /// separators. Used for container names referenced from a task.
    pub fn from_name(name: &str) -> Result<Self, TargetPathError> {
        if name.contains('/') {
            return Err(TargetPathError::NameContainsSeparator(name.to_string()));
        }
        Ok(Self {
            components: vec![name.to_string()],
        })
    }

    /// Path components, shallowest first.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// The directory this path names, resolved under `root`.
    pub fn resolve_under(&self, root: &Path) -> PathBuf {
        let mut dir = root.to_path_buf();
        for c in &self.components {
            dir.push(c);
        }
        dir
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.components.join("/"))
    }
}

impl TryFrom<String> for TargetPath {
    type Error = TargetPathError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<TargetPath> for String {
    fn from(path: TargetPath) -> Self {
        path.to_string()
    }
}
