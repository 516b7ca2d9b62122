//! Container fragment resolution.

use crate::error::OverlayResult;
use crate::loader::OverlayLoader;
use crate::merge::merge;
use crate::variables::VARIABLES_STEM;
use fleetspec_types::TargetPath;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// File stem of container fragments.
pub const CONTAINER_STEM: &str = "container";

/// Resolves named containers under the containers root, scoped to one
/// task resolution pass.
///
/// Results are memoized per name, but only for references without
/// their own variable overrides: an override changes the effective
/// scope, so those resolutions are never shared. The resolver is
/// discarded with the pass; there is no cross-pass cache.
pub struct ContainerResolver {
    containers_root: PathBuf,
    task_bindings: Value,
    resolved: HashMap<String, Value>,
}

impl ContainerResolver {
    pub fn new(containers_root: impl Into<PathBuf>, task_bindings: Value) -> Self {
        Self {
            containers_root: containers_root.into(),
            task_bindings,
            resolved: HashMap::new(),
        }
    }

    /// Resolve one container. Scope precedence, lowest to highest:
    /// the container's own `variables` chain, the task-level bindings,
    /// then `reference_vars` from the referencing element.
    pub fn resolve(
        &mut self,
        name: &str,
        reference_vars: Option<&Value>,
    ) -> OverlayResult<Value> {
        if reference_vars.is_none() {
            if let Some(hit) = self.resolved.get(name) {
                debug!(container = name, "container already resolved in this pass");
                return Ok(hit.clone());
            }
        }

        let target = TargetPath::from_name(name)?;
        let loader = OverlayLoader::new(&self.containers_root, target);
        let container_vars = loader.load_target(VARIABLES_STEM, None)?;
        let mut scope = merge(self.task_bindings.clone(), container_vars);
        if let Some(vars) = reference_vars {
            scope = merge(vars.clone(), scope);
        }
        let container = loader.load_target(CONTAINER_STEM, Some(&scope))?;

        if reference_vars.is_none() {
            self.resolved.insert(name.to_string(), container.clone());
        }
        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_scope_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("sidecar/variables.yml"), "Port: \"80\"\nOwn: yes");
        write(
            &root.join("sidecar/container.yml.tpl"),
            "name: sidecar\nport: {{ Port }}\nown: {{ Own }}",
        );

        let task_bindings: Value = serde_yaml::from_str("Port: \"9000\"").unwrap();
        let mut resolver = ContainerResolver::new(root, task_bindings);

        // task bindings beat the container's own variables
        let container = resolver.resolve("sidecar", None).unwrap();
        assert_eq!(
            container,
            serde_yaml::from_str::<Value>("name: sidecar\nport: 9000\nown: yes").unwrap()
        );

        // reference vars beat both
        let overrides: Value = serde_yaml::from_str("Port: \"9090\"").unwrap();
        let container = resolver.resolve("sidecar", Some(&overrides)).unwrap();
        assert_eq!(
            container,
            serde_yaml::from_str::<Value>("name: sidecar\nport: 9090\nown: yes").unwrap()
        );
    }

    #[test]
    fn test_memoized_only_without_reference_vars() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("app/container.yml.tpl"), "port: {{ Port }}");

        let task_bindings: Value = serde_yaml::from_str("Port: \"1\"").unwrap();
        let mut resolver = ContainerResolver::new(root.to_path_buf(), task_bindings);
        let first = resolver.resolve("app", None).unwrap();

        // the plain resolution was cached: a changed fragment on disk
        // is not re-read within the same pass
        write(&root.join("app/container.yml.tpl"), "port: changed");
        let second = resolver.resolve("app", None).unwrap();
        assert_eq!(first, second);

        // an overridden reference bypasses the cache and re-resolves
        let overrides: Value = serde_yaml::from_str("Port: \"2\"").unwrap();
        let third = resolver.resolve("app", Some(&overrides)).unwrap();
        assert_eq!(third, serde_yaml::from_str::<Value>("port: changed").unwrap());
    }
}
