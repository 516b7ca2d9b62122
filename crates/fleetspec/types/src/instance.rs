//! Task instance state as reported by the orchestrator.

use crate::RevisionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a task instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    Provisioning,
    Pending,
    Activating,
    Running,
    Deactivating,
    Stopping,
    Deprovisioning,
    Stopped,
}

impl InstanceStatus {
    /// Whether this status means the instance is being torn down.
    /// An instance of the watched revision in one of these states is
    /// a deployment failure, not a transient condition.
    pub fn is_tearing_down(self) -> bool {
        matches!(
            self,
            InstanceStatus::Deactivating
                | InstanceStatus::Stopping
                | InstanceStatus::Deprovisioning
                | InstanceStatus::Stopped
        )
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstanceStatus::Provisioning => "PROVISIONING",
            InstanceStatus::Pending => "PENDING",
            InstanceStatus::Activating => "ACTIVATING",
            InstanceStatus::Running => "RUNNING",
            InstanceStatus::Deactivating => "DEACTIVATING",
            InstanceStatus::Stopping => "STOPPING",
            InstanceStatus::Deprovisioning => "DEPROVISIONING",
            InstanceStatus::Stopped => "STOPPED",
        };
        write!(f, "{s}")
    }
}

/// One running (or transitioning) task instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInstance {
    /// Revision this instance was launched from.
    pub revision: RevisionId,

    /// What the orchestrator wants the instance to be doing.
    pub desired_status: InstanceStatus,

    /// Last status the orchestrator observed.
    pub last_status: InstanceStatus,
}

/// Live state of a service target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceState {
    pub service: String,

    /// Number of instances the service should keep running.
    pub desired_count: u32,

    /// Revision the service is currently bound to.
    pub bound_revision: RevisionId,
}
