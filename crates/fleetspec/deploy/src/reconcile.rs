//! Applying a new revision to targets whose diff is non-empty.

use fleetspec_orchestrator::{Orchestrator, OrchestratorResult, ScheduleRules};
use fleetspec_types::{DeployTarget, Revision};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Outcome of one target's reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    /// The target was rebound to the new revision.
    Updated,

    /// Empty diff; no update call was issued.
    AlreadyCurrent,

    /// The update call failed; siblings were still attempted.
    Failed { reason: String },
}

impl fmt::Display for TargetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetOutcome::Updated => write!(f, "updated"),
            TargetOutcome::AlreadyCurrent => write!(f, "already up to date"),
            TargetOutcome::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// One row of the reconciliation outcome table.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub target: DeployTarget,
    pub outcome: TargetOutcome,
}

/// The complete per-target outcome table for one reconciliation pass.
/// Every configured target appears exactly once, even when some
/// failed.
#[derive(Debug, Default)]
pub struct ReconcileSummary {
    pub reports: Vec<ReconcileReport>,
}

impl ReconcileSummary {
    /// Targets whose update failed.
    pub fn failed(&self) -> Vec<&DeployTarget> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, TargetOutcome::Failed { .. }))
            .map(|r| &r.target)
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed().is_empty()
    }
}

/// Applies a new revision sequentially to every target with a
/// non-empty diff. Update calls are independently idempotent and
/// rate-sensitive, so there is no per-target concurrency here.
pub struct ReconcileDriver {
    orchestrator: Arc<dyn Orchestrator>,
    rules: Arc<dyn ScheduleRules>,
}

impl ReconcileDriver {
    pub fn new(orchestrator: Arc<dyn Orchestrator>, rules: Arc<dyn ScheduleRules>) -> Self {
        Self {
            orchestrator,
            rules,
        }
    }

    /// Attempt every target and return the full outcome table.
    /// Failures are captured per target, never propagated mid-batch.
    pub async fn apply(
        &self,
        diffs: &BTreeMap<DeployTarget, String>,
        new: &Revision,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        for (target, diff) in diffs {
            let outcome = if diff.is_empty() {
                info!(%target, "already up to date");
                TargetOutcome::AlreadyCurrent
            } else {
                match self.apply_one(target, new).await {
                    Ok(()) => {
                        info!(%target, revision = %new.id, "target updated");
                        TargetOutcome::Updated
                    }
                    Err(err) => {
                        error!(%target, %err, "failed to update target");
                        TargetOutcome::Failed {
                            reason: err.to_string(),
                        }
                    }
                }
            };
            summary.reports.push(ReconcileReport {
                target: target.clone(),
                outcome,
            });
        }
        summary
    }

    async fn apply_one(&self, target: &DeployTarget, new: &Revision) -> OrchestratorResult<()> {
        match target {
            DeployTarget::Service { cluster, service } => {
                self.orchestrator
                    .update_service(cluster, service, &new.id)
                    .await
            }
            DeployTarget::ScheduledJob { rule, schedule, .. } => {
                let current = self.rules.describe_rule(rule).await?;
                if current.schedule_expression != *schedule {
                    info!(%rule, %schedule, "updating schedule expression");
                    self.rules.update_schedule(rule, schedule).await?;
                }
                for rule_target in self.rules.list_rule_targets(rule).await? {
                    if rule_target.revision != new.id {
                        self.rules
                            .update_rule_target(rule, &rule_target.id, &new.id)
                            .await?;
                    }
                }
                Ok(())
            }
        }
    }
}
