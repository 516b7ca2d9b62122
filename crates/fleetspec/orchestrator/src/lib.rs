//! Collaborator traits for the cluster orchestrator and the
//! scheduled-rule provider.
//!
//! The deployment and watch engines consume these traits only; no
//! cloud provider surface leaks past this boundary. Calls may fail
//! transiently (network, auth) or permanently (not found); retry
//! policy, if any, belongs to the implementation.

mod error;
mod memory;

pub use error::{OrchestratorError, OrchestratorResult};
pub use memory::InMemoryOrchestrator;

use async_trait::async_trait;
use fleetspec_types::{Revision, RevisionId, ServiceState, TaskInstance};
use serde::{Deserialize, Serialize};

/// A scheduler rule's current schedule expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRule {
    pub name: String,
    pub schedule_expression: String,
}

/// One target bound to a scheduler rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTarget {
    pub id: String,
    pub revision: RevisionId,
}

/// The cluster orchestrator: revision registry plus live service
/// state. Each call is a self-contained request/response; the handle
/// is shared freely across concurrent callers.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Describe a batch of services on one cluster. Services the
    /// orchestrator does not know are absent from the result, not an
    /// error.
    async fn describe_services(
        &self,
        cluster: &str,
        services: &[String],
    ) -> OrchestratorResult<Vec<ServiceState>>;

    /// Describe a registered revision by identifier.
    async fn describe_revision(&self, id: &RevisionId) -> OrchestratorResult<Revision>;

    /// Register a new revision of `family` from a structural
    /// specification. The returned revision is immutable.
    async fn register_revision(
        &self,
        family: &str,
        content: serde_json::Value,
    ) -> OrchestratorResult<Revision>;

    /// Bind a service to a revision. Idempotent.
    async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        revision: &RevisionId,
    ) -> OrchestratorResult<()>;

    /// List task instances currently attached to a service.
    async fn list_instances(
        &self,
        cluster: &str,
        service: &str,
    ) -> OrchestratorResult<Vec<TaskInstance>>;
}

/// The scheduled-rule provider: cron rules whose targets consume
/// workload revisions.
#[async_trait]
pub trait ScheduleRules: Send + Sync {
    /// Describe a rule's current schedule expression.
    async fn describe_rule(&self, name: &str) -> OrchestratorResult<ScheduleRule>;

    /// Replace a rule's schedule expression.
    async fn update_schedule(&self, name: &str, expression: &str) -> OrchestratorResult<()>;

    /// List the targets bound to a rule.
    async fn list_rule_targets(&self, name: &str) -> OrchestratorResult<Vec<RuleTarget>>;

    /// Rebind one rule target to a revision. Idempotent.
    async fn update_rule_target(
        &self,
        name: &str,
        target_id: &str,
        revision: &RevisionId,
    ) -> OrchestratorResult<()>;
}
