//! Registered workload revisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a registered revision.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RevisionId(String);

impl RevisionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable registered workload specification.
///
/// Created by registration, never mutated; later registrations of the
/// same family supersede it with a higher ordinal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    /// Opaque identifier assigned at registration.
    pub id: RevisionId,

    /// Monotonic ordinal within the family.
    pub ordinal: u64,

    /// Workload family (task name) this revision belongs to.
    pub family: String,

    /// Full structural content of the registered specification.
    pub content: serde_json::Value,

    /// Registration timestamp. Never part of structural comparison.
    pub registered_at: DateTime<Utc>,
}
