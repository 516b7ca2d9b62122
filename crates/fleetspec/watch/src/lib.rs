//! Asynchronous convergence watching.
//!
//! One worker per watched target, all started together. Each worker
//! repeatedly samples orchestrator state until the target converges,
//! fails, errors, or times out, then writes exactly one terminal
//! result into a shared channel. The caller drains the channel until
//! every worker has reported; results arrive first-resolved-first.

mod state;
mod watcher;

pub use state::{WatchResult, WatchState};
pub use watcher::Watcher;
