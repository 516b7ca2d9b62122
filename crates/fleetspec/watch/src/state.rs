//! Watch states and results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-target watch state. `Polling` is the initial state; the other
/// four are terminal and exactly one of them is reported per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchState {
    /// Still sampling; not yet converged.
    Polling,

    /// Running instances of the watched revision match the desired
    /// count.
    Converged,

    /// An instance of the watched revision was torn down.
    DeployFailed,

    /// An orchestrator call failed while sampling.
    Errored,

    /// The timeout deadline elapsed before any other terminal state.
    /// A normal outcome, not an error.
    TimedOut,
}

impl WatchState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, WatchState::Polling)
    }
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WatchState::Polling => "polling",
            WatchState::Converged => "converged",
            WatchState::DeployFailed => "deploy failed",
            WatchState::Errored => "errored",
            WatchState::TimedOut => "timed out",
        };
        write!(f, "{s}")
    }
}

/// One target's terminal watch result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchResult {
    pub cluster: String,
    pub service: String,
    pub state: WatchState,

    /// Offending status or error text, when the state carries one.
    pub detail: Option<String>,
}
