//! Task status state machine (the four-state model).

use serde::{Deserialize, Serialize};

/// Status of a task.
///
/// State transitions:
/// - Open -> Claimed -> Review -> Done (manual-approval path)
/// - Open | Claimed -> Open (auto-complete rollover, skips Review entirely)
/// - Claimed -> Open (unclaim), Review -> Open (reject)
///
/// `Open` and `Claimed` are re-entrant; `Done` is terminal for non-recurring
/// tasks only — a recurring task never rests there, it reopens with an
/// advanced due date instead.
///
/// Design note: Using an enum ensures exhaustive matching and prevents
/// invalid states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Nobody is working on it.
    Open,

    /// A member has taken personal responsibility for it.
    Claimed,

    /// Awaiting parental approval after a completion request.
    Review,

    /// Completed and approved (or auto-completed, for non-recurring tasks).
    Done,
}

impl TaskStatus {
    /// Is this the terminal state?
    pub fn is_terminal(self) -> bool {
        self == TaskStatus::Done
    }

    /// Does this status count toward "outstanding work" projections?
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }
}
