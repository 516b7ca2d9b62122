//! Task resolution: the final workload specification.

use crate::container::ContainerResolver;
use crate::error::{OverlayError, OverlayResult};
use crate::loader::OverlayLoader;
use crate::variables::resolve_variables;
use fleetspec_types::TargetPath;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Directory under the project root holding task hierarchies.
pub const TASKS_DIR: &str = "tasks";

/// Directory under the project root holding container hierarchies.
pub const CONTAINERS_DIR: &str = "containers";

/// Key of the container reference sequence inside a task document.
pub const CONTAINER_DEFINITIONS_KEY: &str = "containerDefinitions";

/// Resolves tasks against an explicit project root. Task fragments
/// live under `{root}/tasks`, container fragments under
/// `{root}/containers`.
pub struct TaskResolver {
    project_root: PathBuf,
}

impl TaskResolver {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// The effective variable bindings for a target.
    pub fn resolve_variables(
        &self,
        target: &TargetPath,
        overrides: &BTreeMap<String, String>,
    ) -> OverlayResult<Value> {
        resolve_variables(&self.project_root.join(TASKS_DIR), target, overrides)
    }

    /// Resolve one task to its final workload specification: the
    /// task's own overlay, template-expanded against `bindings`, with
    /// every container reference replaced in place by the resolved
    /// container document.
    pub fn resolve_task(
        &self,
        target: &TargetPath,
        task_name: &str,
        bindings: &Value,
    ) -> OverlayResult<Value> {
        // a task name is a single hierarchy component
        TargetPath::from_name(task_name)?;

        let loader = OverlayLoader::new(self.project_root.join(TASKS_DIR), target.clone());
        let mut task = loader.load_target(task_name, Some(bindings))?;

        let Some(definitions) = task
            .as_mapping_mut()
            .ok_or_else(|| OverlayError::TaskNotMapping {
                task: task_name.to_string(),
            })?
            .get_mut(CONTAINER_DEFINITIONS_KEY)
        else {
            return Err(OverlayError::ContainerDefinitionsShape {
                task: task_name.to_string(),
            });
        };
        let Value::Sequence(elements) = definitions else {
            return Err(OverlayError::ContainerDefinitionsShape {
                task: task_name.to_string(),
            });
        };

        let mut containers = ContainerResolver::new(
            self.project_root.join(CONTAINERS_DIR),
            bindings.clone(),
        );
        for element in elements.iter_mut() {
            let Value::Mapping(reference) = &*element else {
                continue;
            };
            let Some(Value::String(name)) = reference.get("template") else {
                continue;
            };
            let resolved = containers.resolve(name, reference.get("vars"))?;
            *element = resolved;
        }
        Ok(task)
    }
}
