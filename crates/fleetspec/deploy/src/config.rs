//! Deploy config: which clusters and targets consume which task.

use crate::error::{DeployError, DeployResult};
use fleetspec_types::DeployTarget;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const CONFIG_STEMS: [&str; 2] = ["config.yml", "config.yaml"];

#[derive(Debug, Deserialize)]
struct ConfigFile {
    clusters: Vec<ClusterEntry>,
}

#[derive(Debug, Deserialize)]
struct ClusterEntry {
    name: String,
    #[serde(default)]
    services: Vec<ServiceEntry>,
    #[serde(default)]
    jobs: Vec<JobEntry>,
}

#[derive(Debug, Deserialize)]
struct ServiceEntry {
    name: String,
    task: String,
}

#[derive(Debug, Deserialize)]
struct JobEntry {
    name: String,
    task: String,
    schedule: String,
}

/// The deployment targets configured for each task, loaded from the
/// `config.yml` next to the task hierarchy leaf.
#[derive(Debug, Default)]
pub struct DeployConfig {
    targets_by_task: BTreeMap<String, Vec<DeployTarget>>,
}

impl DeployConfig {
    /// Load the deploy config from `dir`, trying `config.yml` then
    /// `config.yaml`.
    pub fn load(dir: &Path) -> DeployResult<Self> {
        let path = CONFIG_STEMS
            .iter()
            .map(|stem| dir.join(stem))
            .find(|p| p.is_file())
            .ok_or_else(|| DeployError::ConfigNotFound(dir.to_path_buf()))?;
        debug!(path = %path.display(), "deploy config found");

        let raw = fs::read_to_string(&path).map_err(|source| DeployError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let file: ConfigFile =
            serde_yaml::from_str(&raw).map_err(|source| DeployError::ConfigParse {
                path: path.clone(),
                source,
            })?;

        let mut targets_by_task: BTreeMap<String, Vec<DeployTarget>> = BTreeMap::new();
        for cluster in file.clusters {
            for service in cluster.services {
                targets_by_task
                    .entry(service.task)
                    .or_default()
                    .push(DeployTarget::Service {
                        cluster: cluster.name.clone(),
                        service: service.name,
                    });
            }
            for job in cluster.jobs {
                targets_by_task
                    .entry(job.task)
                    .or_default()
                    .push(DeployTarget::ScheduledJob {
                        cluster: cluster.name.clone(),
                        rule: job.name,
                        schedule: job.schedule,
                    });
            }
        }
        Ok(Self { targets_by_task })
    }

    /// All configured targets for a task.
    pub fn targets(&self, task: &str) -> Vec<DeployTarget> {
        self.targets_by_task.get(task).cloned().unwrap_or_default()
    }

    /// Service names for a task, grouped by cluster. Used for batched
    /// status queries and the watcher.
    pub fn services_by_cluster(&self, task: &str) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for target in self.targets(task) {
            if let DeployTarget::Service { cluster, service } = target {
                grouped.entry(cluster).or_default().push(service);
            }
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = concat!(
        "clusters:\n",
        "  - name: prod\n",
        "    services:\n",
        "      - {name: svcA, task: web}\n",
        "      - {name: svcB, task: web}\n",
        "    jobs:\n",
        "      - {name: nightly, task: batch, schedule: \"cron(0 3 * * ? *)\"}\n",
        "  - name: stage\n",
        "    services:\n",
        "      - {name: svcC, task: web}\n",
    );

    #[test]
    fn test_targets_grouped_by_task() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.yml"), CONFIG).unwrap();

        let config = DeployConfig::load(dir.path()).unwrap();
        assert_eq!(config.targets("web").len(), 3);
        assert_eq!(
            config.targets("batch"),
            vec![DeployTarget::ScheduledJob {
                cluster: "prod".into(),
                rule: "nightly".into(),
                schedule: "cron(0 3 * * ? *)".into(),
            }]
        );
        assert!(config.targets("unknown").is_empty());
    }

    #[test]
    fn test_services_grouped_by_cluster() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), CONFIG).unwrap();

        let config = DeployConfig::load(dir.path()).unwrap();
        let grouped = config.services_by_cluster("web");
        assert_eq!(grouped["prod"], vec!["svcA", "svcB"]);
        assert_eq!(grouped["stage"], vec!["svcC"]);
    }

    #[test]
    fn test_missing_config_names_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = DeployConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, DeployError::ConfigNotFound(_)));
        assert!(err.to_string().contains(dir.path().to_str().unwrap()));
    }
}
