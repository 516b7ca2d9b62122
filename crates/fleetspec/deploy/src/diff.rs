//! Per-target structural diff between the live revision and a newly
//! registered one.

use crate::error::{DeployError, DeployResult};
use fleetspec_orchestrator::{Orchestrator, ScheduleRules};
use fleetspec_types::{DeployTarget, Revision, RevisionId};
use serde_json::Value;
use similar::TextDiff;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Fields excluded from comparison: registration bookkeeping and
/// opaque payload the orchestrator attaches to a described revision.
pub const DEFAULT_IGNORED_FIELDS: &[&str] = &[
    "registeredAt",
    "deregisteredAt",
    "registeredBy",
    "requiresAttributes",
    "compatibilities",
];

/// Computes, for each configured target, the structural delta between
/// the revision the target is bound to and the newly registered one.
/// Identifier churn alone never produces a diff; an empty diff string
/// means the target is already up to date.
pub struct DeploymentDiffer {
    orchestrator: Arc<dyn Orchestrator>,
    rules: Arc<dyn ScheduleRules>,
    ignored_fields: BTreeSet<String>,
}

impl DeploymentDiffer {
    pub fn new(orchestrator: Arc<dyn Orchestrator>, rules: Arc<dyn ScheduleRules>) -> Self {
        Self {
            orchestrator,
            rules,
            ignored_fields: DEFAULT_IGNORED_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }

    /// Replace the ignored-field set.
    pub fn with_ignored_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Diff `new` against every target's live binding.
    ///
    /// Any target without a live counterpart fails the whole batch;
    /// see [`DeployError::UnknownTarget`].
    pub async fn diff(
        &self,
        targets: &[DeployTarget],
        new: &Revision,
    ) -> DeployResult<BTreeMap<DeployTarget, String>> {
        let bound = self.bound_revisions(targets).await?;

        let mut diffs = BTreeMap::new();
        for (target, revision_id) in bound {
            let current = self.orchestrator.describe_revision(&revision_id).await?;
            let text = revision_diff(&current, new, &self.ignored_fields)?;
            debug!(%target, up_to_date = text.is_empty(), "revision diff computed");
            diffs.insert(target, text);
        }
        Ok(diffs)
    }

    /// The revision each target is currently bound to. Service
    /// bindings are fetched in one batch per cluster.
    async fn bound_revisions(
        &self,
        targets: &[DeployTarget],
    ) -> DeployResult<BTreeMap<DeployTarget, RevisionId>> {
        let mut services_by_cluster: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for target in targets {
            if let DeployTarget::Service { cluster, service } = target {
                services_by_cluster
                    .entry(cluster)
                    .or_default()
                    .push(service.clone());
            }
        }

        let mut live: HashMap<(String, String), RevisionId> = HashMap::new();
        for (cluster, services) in &services_by_cluster {
            let states = self.orchestrator.describe_services(cluster, services).await?;
            for state in states {
                live.insert(
                    (cluster.to_string(), state.service),
                    state.bound_revision,
                );
            }
        }

        let mut bound = BTreeMap::new();
        for target in targets {
            let revision_id = match target {
                DeployTarget::Service { cluster, service } => live
                    .get(&(cluster.clone(), service.clone()))
                    .cloned()
                    .ok_or_else(|| DeployError::UnknownTarget {
                        target: target.clone(),
                    })?,
                DeployTarget::ScheduledJob { rule, .. } => {
                    let rule_targets = match self.rules.list_rule_targets(rule).await {
                        Ok(rule_targets) => rule_targets,
                        Err(fleetspec_orchestrator::OrchestratorError::NotFound(_)) => {
                            return Err(DeployError::UnknownTarget {
                                target: target.clone(),
                            })
                        }
                        Err(err) => return Err(err.into()),
                    };
                    rule_targets
                        .first()
                        .map(|t| t.revision.clone())
                        .ok_or_else(|| DeployError::UnknownTarget {
                            target: target.clone(),
                        })?
                }
            };
            bound.insert(target.clone(), revision_id);
        }
        Ok(bound)
    }
}

/// Unified diff of two revisions' structural content.
///
/// Identifier, ordinal and registration timestamp live outside the
/// content and never participate; fields named in `ignored` are
/// stripped from both sides first.
pub fn revision_diff(
    current: &Revision,
    new: &Revision,
    ignored: &BTreeSet<String>,
) -> DeployResult<String> {
    let current_text = canonical_text(&current.content, ignored)?;
    let new_text = canonical_text(&new.content, ignored)?;
    if current_text == new_text {
        return Ok(String::new());
    }
    Ok(TextDiff::from_lines(&current_text, &new_text)
        .unified_diff()
        .context_radius(3)
        .header("current", "new")
        .to_string())
}

fn canonical_text(content: &Value, ignored: &BTreeSet<String>) -> DeployResult<String> {
    let stripped = match content {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !ignored.contains(*key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    };
    // object keys serialize in sorted order, so the text is canonical
    serde_yaml::to_string(&stripped).map_err(DeployError::ContentSerialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetspec_orchestrator::InMemoryOrchestrator;
    use serde_json::json;

    fn service(cluster: &str, service: &str) -> DeployTarget {
        DeployTarget::Service {
            cluster: cluster.into(),
            service: service.into(),
        }
    }

    async fn setup() -> (Arc<InMemoryOrchestrator>, Revision) {
        let orch = Arc::new(InMemoryOrchestrator::new());
        let old = orch
            .register_revision("web", json!({"cpu": "256", "registeredAt": "old"}))
            .await
            .unwrap();
        orch.put_service("prod", "svcA", 2, old.id.clone());
        let new = orch
            .register_revision("web", json!({"cpu": "512", "registeredAt": "new"}))
            .await
            .unwrap();
        (orch, new)
    }

    #[tokio::test]
    async fn test_changed_content_produces_diff() {
        let (orch, new) = setup().await;
        let differ = DeploymentDiffer::new(orch.clone(), orch.clone());

        let targets = vec![service("prod", "svcA")];
        let diffs = differ.diff(&targets, &new).await.unwrap();
        let text = &diffs[&targets[0]];
        assert!(text.contains("-cpu: '256'"), "diff was: {text}");
        assert!(text.contains("+cpu: '512'"), "diff was: {text}");
    }

    #[tokio::test]
    async fn test_identifier_churn_alone_is_empty_diff() {
        let orch = Arc::new(InMemoryOrchestrator::new());
        let old = orch
            .register_revision("web", json!({"cpu": "256"}))
            .await
            .unwrap();
        orch.put_service("prod", "svcA", 2, old.id.clone());
        // identical content, new identifier and ordinal
        let new = orch
            .register_revision("web", json!({"cpu": "256"}))
            .await
            .unwrap();

        let differ = DeploymentDiffer::new(orch.clone(), orch.clone());
        let targets = vec![service("prod", "svcA")];
        let diffs = differ.diff(&targets, &new).await.unwrap();
        assert_eq!(diffs[&targets[0]], "");
    }

    #[tokio::test]
    async fn test_ignored_fields_do_not_diff() {
        let (orch, _) = setup().await;
        // same cpu, different registration bookkeeping
        let newer = orch
            .register_revision("web", json!({"cpu": "256", "registeredAt": "changed"}))
            .await
            .unwrap();

        let differ = DeploymentDiffer::new(orch.clone(), orch.clone());
        let targets = vec![service("prod", "svcA")];
        let diffs = differ.diff(&targets, &newer).await.unwrap();
        assert_eq!(diffs[&targets[0]], "");
    }

    #[tokio::test]
    async fn test_unknown_target_fails_the_batch() {
        let (orch, new) = setup().await;
        let differ = DeploymentDiffer::new(orch.clone(), orch.clone());

        let targets = vec![service("prod", "svcA"), service("prod", "ghost")];
        let err = differ.diff(&targets, &new).await.unwrap_err();
        assert!(matches!(err, DeployError::UnknownTarget { .. }));
    }

    #[tokio::test]
    async fn test_job_target_diffs_via_rule_binding() {
        let (orch, new) = setup().await;
        let old_id = orch
            .describe_services("prod", &["svcA".into()])
            .await
            .unwrap()[0]
            .bound_revision
            .clone();
        orch.put_rule(
            "nightly",
            "cron(0 3 * * ? *)",
            vec![fleetspec_orchestrator::RuleTarget {
                id: "t1".into(),
                revision: old_id,
            }],
        );

        let differ = DeploymentDiffer::new(orch.clone(), orch.clone());
        let target = DeployTarget::ScheduledJob {
            cluster: "prod".into(),
            rule: "nightly".into(),
            schedule: "cron(0 3 * * ? *)".into(),
        };
        let diffs = differ.diff(&[target.clone()], &new).await.unwrap();
        assert!(!diffs[&target].is_empty());
    }
}
