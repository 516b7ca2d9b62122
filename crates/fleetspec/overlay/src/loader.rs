//! Overlay target loading: search, render, fold.

use crate::error::{OverlayError, OverlayResult};
use crate::merge::{merge, parse_fragment};
use crate::search::search_fragments;
use crate::template::{binding_context, is_template, render};
use fleetspec_types::TargetPath;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::PathBuf;

/// Loads one overlay target: every fragment for a stem along the
/// target path, template-expanded where marked, folded shallow to
/// deep into a single document.
pub struct OverlayLoader {
    root: PathBuf,
    target: TargetPath,
}

impl OverlayLoader {
    pub fn new(root: impl Into<PathBuf>, target: TargetPath) -> Self {
        Self {
            root: root.into(),
            target,
        }
    }

    /// Resolve the overlay for `stem`. Passing bindings enables
    /// template mode; template fragments are rendered against them
    /// before merging. With no fragments present the result is an
    /// empty mapping.
    pub fn load_target(&self, stem: &str, bindings: Option<&Value>) -> OverlayResult<Value> {
        let files = search_fragments(&self.root, &self.target, stem, bindings.is_some());

        // one render context for every template fragment
        let context = bindings.map(binding_context).transpose()?;
        let mut acc: Option<Value> = None;
        for path in files {
            let raw = fs::read_to_string(&path).map_err(|source| OverlayError::Read {
                path: path.clone(),
                source,
            })?;
            let text = match (&context, is_template(&path)) {
                (Some(context), true) => render(&path, &raw, context)?,
                _ => raw,
            };
            let fragment = parse_fragment(&text).map_err(|source| OverlayError::Parse {
                path: path.clone(),
                source,
            })?;
            acc = Some(match acc {
                Some(base) => merge(fragment, base),
                None => fragment,
            });
        }
        Ok(acc.unwrap_or_else(|| Value::Mapping(Mapping::new())))
    }
}
