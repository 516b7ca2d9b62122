//! In-memory implementation for development and tests.

use crate::{
    Orchestrator, OrchestratorError, OrchestratorResult, RuleTarget, ScheduleRule, ScheduleRules,
};
use async_trait::async_trait;
use dashmap::DashMap;
use fleetspec_types::{Revision, RevisionId, ServiceState, TaskInstance};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct ServiceRecord {
    desired_count: u32,
    bound_revision: RevisionId,
}

#[derive(Debug, Clone)]
struct RuleRecord {
    schedule_expression: String,
    targets: Vec<RuleTarget>,
}

/// In-memory orchestrator and rule provider.
///
/// Backs local development and the engine tests; state is keyed the
/// same way the remote APIs key theirs (cluster + name).
#[derive(Default)]
pub struct InMemoryOrchestrator {
    revisions: DashMap<RevisionId, Revision>,
    ordinals: DashMap<String, u64>,
    services: DashMap<(String, String), ServiceRecord>,
    instances: DashMap<(String, String), Vec<TaskInstance>>,
    rules: DashMap<String, RuleRecord>,
}

impl InMemoryOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a service with a desired count and an initial revision.
    pub fn put_service(
        &self,
        cluster: &str,
        service: &str,
        desired_count: u32,
        revision: RevisionId,
    ) {
        self.services.insert(
            (cluster.to_string(), service.to_string()),
            ServiceRecord {
                desired_count,
                bound_revision: revision,
            },
        );
    }

    /// Replace the instance set attached to a service.
    pub fn put_instances(&self, cluster: &str, service: &str, instances: Vec<TaskInstance>) {
        self.instances
            .insert((cluster.to_string(), service.to_string()), instances);
    }

    /// Seed a scheduler rule with its targets.
    pub fn put_rule(&self, name: &str, schedule_expression: &str, targets: Vec<RuleTarget>) {
        self.rules.insert(
            name.to_string(),
            RuleRecord {
                schedule_expression: schedule_expression.to_string(),
                targets,
            },
        );
    }
}

#[async_trait]
impl Orchestrator for InMemoryOrchestrator {
    async fn describe_services(
        &self,
        cluster: &str,
        services: &[String],
    ) -> OrchestratorResult<Vec<ServiceState>> {
        let mut out = Vec::new();
        for service in services {
            let key = (cluster.to_string(), service.clone());
            if let Some(record) = self.services.get(&key) {
                out.push(ServiceState {
                    service: service.clone(),
                    desired_count: record.desired_count,
                    bound_revision: record.bound_revision.clone(),
                });
            }
        }
        Ok(out)
    }

    async fn describe_revision(&self, id: &RevisionId) -> OrchestratorResult<Revision> {
        self.revisions
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| OrchestratorError::NotFound(format!("revision {id}")))
    }

    async fn register_revision(
        &self,
        family: &str,
        content: serde_json::Value,
    ) -> OrchestratorResult<Revision> {
        let mut ordinal = self.ordinals.entry(family.to_string()).or_insert(0);
        *ordinal += 1;
        let revision = Revision {
            id: RevisionId::new(format!("{family}:{}/{}", *ordinal, Uuid::new_v4())),
            ordinal: *ordinal,
            family: family.to_string(),
            content,
            registered_at: chrono::Utc::now(),
        };
        self.revisions.insert(revision.id.clone(), revision.clone());
        Ok(revision)
    }

    async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        revision: &RevisionId,
    ) -> OrchestratorResult<()> {
        let key = (cluster.to_string(), service.to_string());
        match self.services.get_mut(&key) {
            Some(mut record) => {
                record.bound_revision = revision.clone();
                Ok(())
            }
            None => Err(OrchestratorError::NotFound(format!(
                "service {service} in cluster {cluster}"
            ))),
        }
    }

    async fn list_instances(
        &self,
        cluster: &str,
        service: &str,
    ) -> OrchestratorResult<Vec<TaskInstance>> {
        let key = (cluster.to_string(), service.to_string());
        Ok(self
            .instances
            .get(&key)
            .map(|i| i.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl ScheduleRules for InMemoryOrchestrator {
    async fn describe_rule(&self, name: &str) -> OrchestratorResult<ScheduleRule> {
        self.rules
            .get(name)
            .map(|r| ScheduleRule {
                name: name.to_string(),
                schedule_expression: r.schedule_expression.clone(),
            })
            .ok_or_else(|| OrchestratorError::NotFound(format!("rule {name}")))
    }

    async fn update_schedule(&self, name: &str, expression: &str) -> OrchestratorResult<()> {
        match self.rules.get_mut(name) {
            Some(mut record) => {
                record.schedule_expression = expression.to_string();
                Ok(())
            }
            None => Err(OrchestratorError::NotFound(format!("rule {name}"))),
        }
    }

    async fn list_rule_targets(&self, name: &str) -> OrchestratorResult<Vec<RuleTarget>> {
        self.rules
            .get(name)
            .map(|r| r.targets.clone())
            .ok_or_else(|| OrchestratorError::NotFound(format!("rule {name}")))
    }

    async fn update_rule_target(
        &self,
        name: &str,
        target_id: &str,
        revision: &RevisionId,
    ) -> OrchestratorResult<()> {
        match self.rules.get_mut(name) {
            Some(mut record) => {
                for target in &mut record.targets {
                    if target.id == target_id {
                        target.revision = revision.clone();
                        return Ok(());
                    }
                }
                Err(OrchestratorError::NotFound(format!(
                    "target {target_id} on rule {name}"
                )))
            }
            None => Err(OrchestratorError::NotFound(format!("rule {name}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_register_revision_increments_ordinal() {
        let orch = InMemoryOrchestrator::new();
        let r1 = orch
            .register_revision("web", json!({"cpu": 256}))
            .await
            .unwrap();
        let r2 = orch
            .register_revision("web", json!({"cpu": 512}))
            .await
            .unwrap();

        assert_eq!(r1.ordinal, 1);
        assert_eq!(r2.ordinal, 2);
        assert_ne!(r1.id, r2.id);

        let fetched = orch.describe_revision(&r1.id).await.unwrap();
        assert_eq!(fetched.content, json!({"cpu": 256}));
    }

    #[tokio::test]
    async fn test_describe_services_skips_unknown() {
        let orch = InMemoryOrchestrator::new();
        orch.put_service("prod", "web", 2, RevisionId::new("web:1"));

        let states = orch
            .describe_services("prod", &["web".into(), "ghost".into()])
            .await
            .unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].service, "web");
    }

    #[tokio::test]
    async fn test_update_service_rebinds() {
        let orch = InMemoryOrchestrator::new();
        orch.put_service("prod", "web", 2, RevisionId::new("web:1"));
        orch.update_service("prod", "web", &RevisionId::new("web:2"))
            .await
            .unwrap();

        let states = orch
            .describe_services("prod", &["web".into()])
            .await
            .unwrap();
        assert_eq!(states[0].bound_revision, RevisionId::new("web:2"));
    }

    #[tokio::test]
    async fn test_rule_target_rebind() {
        let orch = InMemoryOrchestrator::new();
        orch.put_rule(
            "nightly",
            "cron(0 3 * * ? *)",
            vec![RuleTarget {
                id: "t1".into(),
                revision: RevisionId::new("batch:1"),
            }],
        );

        orch.update_schedule("nightly", "cron(0 4 * * ? *)")
            .await
            .unwrap();
        orch.update_rule_target("nightly", "t1", &RevisionId::new("batch:2"))
            .await
            .unwrap();

        let rule = orch.describe_rule("nightly").await.unwrap();
        assert_eq!(rule.schedule_expression, "cron(0 4 * * ? *)");
        let targets = orch.list_rule_targets("nightly").await.unwrap();
        assert_eq!(targets[0].revision, RevisionId::new("batch:2"));
    }
}
