//! Variable-binding resolution.

use crate::error::OverlayResult;
use crate::loader::OverlayLoader;
use crate::merge::merge;
use fleetspec_types::TargetPath;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// File stem of variable fragments.
pub const VARIABLES_STEM: &str = "variables";

/// Resolve the variable bindings for a target: the overlay of every
/// `variables` fragment along the path, with explicit overrides merged
/// on top. Overrides always win regardless of hierarchy depth; each
/// override value becomes a string scalar.
pub fn resolve_variables(
    root: &Path,
    target: &TargetPath,
    overrides: &BTreeMap<String, String>,
) -> OverlayResult<Value> {
    let loader = OverlayLoader::new(root, target.clone());
    let vars = loader.load_target(VARIABLES_STEM, None)?;
    Ok(apply_overrides(vars, overrides))
}

fn apply_overrides(base: Value, overrides: &BTreeMap<String, String>) -> Value {
    if overrides.is_empty() {
        return base;
    }
    let mut mapping = Mapping::new();
    for (key, value) in overrides {
        mapping.insert(Value::String(key.clone()), Value::String(value.clone()));
    }
    merge(Value::Mapping(mapping), base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_overrides_win_over_any_level() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("variables.yml"), "Version: 0.0.1");
        write(&root.join("app1/variables.yml"), "Version: 0.0.2\nCpu: 256");

        let overrides = BTreeMap::from([("Version".to_string(), "9.9.9".to_string())]);
        let target = TargetPath::new("app1").unwrap();
        let vars = resolve_variables(root, &target, &overrides).unwrap();

        assert_eq!(
            vars,
            serde_yaml::from_str::<Value>("Version: \"9.9.9\"\nCpu: 256").unwrap()
        );
    }

    #[test]
    fn test_override_value_stays_a_string() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = BTreeMap::from([("Port".to_string(), "8080".to_string())]);
        let target = TargetPath::new("app1").unwrap();
        let vars = resolve_variables(dir.path(), &target, &overrides).unwrap();

        // a numeric-looking override must not become a number
        assert_eq!(
            vars.get("Port"),
            Some(&Value::String("8080".to_string()))
        );
    }

    #[test]
    fn test_no_files_no_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let target = TargetPath::new("app1").unwrap();
        let vars = resolve_variables(dir.path(), &target, &BTreeMap::new()).unwrap();
        assert_eq!(vars, Value::Mapping(Default::default()));
    }
}
