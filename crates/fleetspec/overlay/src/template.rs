//! Template fragment rendering.

use crate::error::{OverlayError, OverlayResult};
use minijinja::Environment;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Filename suffix marking a fragment as a template.
pub const TEMPLATE_SUFFIX: &str = ".tpl";

/// Whether a fragment path names a template.
pub fn is_template(path: &Path) -> bool {
    path.to_str()
        .map(|p| p.ends_with(TEMPLATE_SUFFIX))
        .unwrap_or(false)
}

/// Decode a variable-binding document into the flat key-value map used
/// as the render context. Decode failure is fatal for the whole load.
pub(crate) fn binding_context(bindings: &Value) -> OverlayResult<BTreeMap<String, Value>> {
    serde_yaml::from_value(bindings.clone()).map_err(OverlayError::BindingDecode)
}

/// Render one template fragment against the binding context.
pub(crate) fn render(
    path: &Path,
    source: &str,
    context: &BTreeMap<String, Value>,
) -> OverlayResult<String> {
    let env = Environment::new();
    env.render_str(source, context)
        .map_err(|source| OverlayError::Template {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_template() {
        assert!(is_template(Path::new("task1.yml.tpl")));
        assert!(!is_template(Path::new("task1.yml")));
    }

    #[test]
    fn test_render_substitutes_bindings() {
        let bindings: Value = serde_yaml::from_str("Version: 0.0.1\nPort: 8080").unwrap();
        let context = binding_context(&bindings).unwrap();

        let rendered = render(
            Path::new("task1.yml.tpl"),
            "image: app:{{ Version }}\nport: {{ Port }}",
            &context,
        )
        .unwrap();
        assert_eq!(rendered, "image: app:0.0.1\nport: 8080");
    }

    #[test]
    fn test_non_mapping_bindings_fail_to_decode() {
        let bindings: Value = serde_yaml::from_str("- just\n- a\n- list").unwrap();
        assert!(matches!(
            binding_context(&bindings),
            Err(OverlayError::BindingDecode(_))
        ));
    }

    #[test]
    fn test_render_syntax_error() {
        let context = BTreeMap::new();
        let result = render(Path::new("bad.yml.tpl"), "image: {{ unclosed", &context);
        assert!(matches!(result, Err(OverlayError::Template { .. })));
    }
}
