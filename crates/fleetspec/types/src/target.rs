//! Deployment targets: live bindings of a workload revision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One live unit consuming a workload revision.
///
/// Many targets may reference one workload; targets are grouped by
/// cluster for batched status queries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeployTarget {
    /// A long-running service on a cluster.
    Service { cluster: String, service: String },

    /// A cron-scheduled job driven by a scheduler rule.
    ScheduledJob {
        cluster: String,
        rule: String,
        schedule: String,
    },
}

impl DeployTarget {
    pub fn cluster(&self) -> &str {
        match self {
            DeployTarget::Service { cluster, .. } => cluster,
            DeployTarget::ScheduledJob { cluster, .. } => cluster,
        }
    }

    /// Service or rule name, depending on the variant.
    pub fn name(&self) -> &str {
        match self {
            DeployTarget::Service { service, .. } => service,
            DeployTarget::ScheduledJob { rule, .. } => rule,
        }
    }
}

impl fmt::Display for DeployTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployTarget::Service { cluster, service } => {
                write!(f, "[cluster: {cluster}, service: {service}]")
            }
            DeployTarget::ScheduledJob { cluster, rule, .. } => {
                write!(f, "[cluster: {cluster}, rule: {rule}]")
            }
        }
    }
}
