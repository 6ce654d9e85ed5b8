//! Run-state machine of a layout.
//!
//! ```text
//! Idle ──start──► Running ──stop()──► Stopping ──tick──► Stopped
//!                    │                                      ▲
//!                    └──── stable / done / budget / error ──┘
//! ```
//!
//! `Stopped` is terminal for a run; a new `start` begins the next one.

use std::fmt;

/// Where a layout run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// No run has started.
    #[default]
    Idle,
    /// Steps are being taken.
    Running,
    /// A stop was requested; the next tick finishes the run.
    Stopping,
    /// The run is over.
    Stopped,
}

impl RunState {
    /// Returns `true` while a run holds a simulation
    pub fn is_active(self) -> bool {
        matches!(self, RunState::Running | RunState::Stopping)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Stopping => "stopping",
            RunState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Nothing to simulate: no participating nodes or no bound viewport.
    Empty,
    /// The engine reported convergence.
    Stable,
    /// A step reported the layout finished.
    Completed,
    /// The step budget ran out.
    BudgetExhausted,
    /// `stop()` was called.
    StopRequested,
    /// The engine failed.
    Failed,
    /// `destroy()` was called.
    Destroyed,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    steps: u64,
    termination: Termination,
}

impl RunSummary {
    pub(crate) fn new(steps: u64, termination: Termination) -> Self {
        Self { steps, termination }
    }

    /// Number of simulation steps taken
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Why the run ended
    pub fn termination(&self) -> Termination {
        self.termination
    }
}
