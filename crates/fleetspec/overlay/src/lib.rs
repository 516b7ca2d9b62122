//! Hierarchical overlay resolution for workload specifications.
//!
//! A workload specification is assembled from YAML fragments laid out
//! in a directory hierarchy. Fragments closer to the leaf of a target
//! path override fragments above them; fragments with a `.tpl` suffix
//! are rendered against the resolved variable bindings before they are
//! merged. Container references inside a task are replaced in place by
//! each container's own resolved fragment chain.
//!
//! Resolution is explicit about its root path: nothing here consults
//! ambient process state, and nothing here writes to the filesystem.

mod container;
mod error;
mod loader;
mod merge;
mod search;
mod task;
mod template;
mod variables;

pub use container::{ContainerResolver, CONTAINER_STEM};
pub use error::{OverlayError, OverlayResult};
pub use loader::OverlayLoader;
pub use merge::{merge, parse_fragment};
pub use task::{TaskResolver, CONTAINERS_DIR, CONTAINER_DEFINITIONS_KEY, TASKS_DIR};
pub use template::{is_template, TEMPLATE_SUFFIX};
pub use variables::{resolve_variables, VARIABLES_STEM};
