//! The per-target convergence pollers.

use crate::state::{WatchResult, WatchState};
use fleetspec_orchestrator::Orchestrator;
use fleetspec_types::{InstanceStatus, ServiceState, TaskInstance};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

/// What one sample concluded about a target.
enum Sample {
    Converged,
    DeployFailed(InstanceStatus),
    Polling,
}

/// Evaluate one sample of a target's state.
///
/// Instances bound to a different revision than the service's are
/// ignored for counting but logged for diagnostics. A tearing-down
/// instance of the watched revision takes precedence over everything
/// else, including a satisfied desired count.
fn evaluate(state: &ServiceState, instances: &[TaskInstance]) -> Sample {
    let mut matching = Vec::new();
    for instance in instances {
        if instance.revision == state.bound_revision {
            matching.push(instance);
        } else {
            debug!(
                service = %state.service,
                revision = %instance.revision,
                "instance bound to another revision; ignoring"
            );
        }
    }

    if let Some(bad) = matching.iter().find(|i| i.last_status.is_tearing_down()) {
        return Sample::DeployFailed(bad.last_status);
    }
    if matching.iter().any(|i| {
        i.desired_status != InstanceStatus::Running || i.last_status != InstanceStatus::Running
    }) {
        return Sample::Polling;
    }
    if matching.len() as u32 != state.desired_count {
        return Sample::Polling;
    }
    Sample::Converged
}

/// Watches a set of services on one cluster until each reaches a
/// terminal state.
pub struct Watcher {
    orchestrator: Arc<dyn Orchestrator>,
    interval: Duration,
    timeout: Duration,
}

impl Watcher {
    pub fn new(orchestrator: Arc<dyn Orchestrator>, interval: Duration, timeout: Duration) -> Self {
        Self {
            orchestrator,
            interval,
            timeout,
        }
    }

    /// Start one worker per service. Each worker sends exactly one
    /// terminal [`WatchResult`]; the returned receiver closes once
    /// every worker has reported.
    pub fn watch(&self, cluster: &str, services: Vec<String>) -> mpsc::Receiver<WatchResult> {
        let (tx, rx) = mpsc::channel(services.len().max(1));
        for service in services {
            let worker = Worker {
                orchestrator: self.orchestrator.clone(),
                cluster: cluster.to_string(),
                service,
                interval: self.interval,
                timeout: self.timeout,
                tx: tx.clone(),
            };
            tokio::spawn(worker.run());
        }
        rx
    }
}

struct Worker {
    orchestrator: Arc<dyn Orchestrator>,
    cluster: String,
    service: String,
    interval: Duration,
    timeout: Duration,
    tx: mpsc::Sender<WatchResult>,
}

impl Worker {
    async fn run(self) {
        // the deadline is absolute, fixed at worker start
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(result) = self.sample().await {
                let _ = self.tx.send(result).await;
                return;
            }

            tokio::select! {
                biased;
                _ = time::sleep_until(deadline) => {
                    warn!(cluster = %self.cluster, service = %self.service,
                        "timed out waiting for convergence");
                    let _ = self.tx.send(self.result(WatchState::TimedOut, None)).await;
                    return;
                }
                _ = time::sleep(self.interval) => {}
            }
        }
    }

    /// One sample. Returns the terminal result, or `None` to keep
    /// polling.
    async fn sample(&self) -> Option<WatchResult> {
        let states = match self
            .orchestrator
            .describe_services(&self.cluster, std::slice::from_ref(&self.service))
            .await
        {
            Ok(states) => states,
            Err(err) => {
                return Some(self.result(WatchState::Errored, Some(err.to_string())));
            }
        };
        let Some(state) = states.into_iter().find(|s| s.service == self.service) else {
            return Some(self.result(
                WatchState::Errored,
                Some(format!(
                    "service {} not found in cluster {}",
                    self.service, self.cluster
                )),
            ));
        };

        let instances = match self
            .orchestrator
            .list_instances(&self.cluster, &self.service)
            .await
        {
            Ok(instances) => instances,
            Err(err) => {
                return Some(self.result(WatchState::Errored, Some(err.to_string())));
            }
        };

        match evaluate(&state, &instances) {
            Sample::Converged => Some(self.result(WatchState::Converged, None)),
            Sample::DeployFailed(status) => Some(self.result(
                WatchState::DeployFailed,
                Some(format!("task status is {status}")),
            )),
            Sample::Polling => None,
        }
    }

    fn result(&self, state: WatchState, detail: Option<String>) -> WatchResult {
        WatchResult {
            cluster: self.cluster.clone(),
            service: self.service.clone(),
            state,
            detail,
        }
    }
}
