//! Fragment search along a target hierarchy.

use crate::template::TEMPLATE_SUFFIX;
use fleetspec_types::TargetPath;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Candidate file names for one stem, in preference order. Template
/// variants are checked before plain variants at the same level.
fn candidate_names(stem: &str, template_mode: bool) -> Vec<String> {
    let mut names = Vec::with_capacity(4);
    if template_mode {
        names.push(format!("{stem}.yml{TEMPLATE_SUFFIX}"));
        names.push(format!("{stem}.yaml{TEMPLATE_SUFFIX}"));
    }
    names.push(format!("{stem}.yml"));
    names.push(format!("{stem}.yaml"));
    names
}

/// Enumerate the fragment files for `stem` along `target`, ordered
/// root to leaf so that deeper fragments override shallower ones.
///
/// The hierarchy root itself is the shallowest level. Absence of a
/// file at a level is not an error.
pub(crate) fn search_fragments(
    root: &Path,
    target: &TargetPath,
    stem: &str,
    template_mode: bool,
) -> Vec<PathBuf> {
    let names = candidate_names(stem, template_mode);

    let mut dir = root.to_path_buf();
    let mut levels = vec![dir.clone()];
    for component in target.components() {
        dir.push(component);
        levels.push(dir.clone());
    }

    let mut files = Vec::new();
    for level in levels {
        for name in &names {
            let candidate = level.join(name);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "fragment found");
                files.push(candidate);
            }
        }
    }
    files
}
