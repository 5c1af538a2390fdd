//! Per-agent movement state.

use pb_core::{Position, Tick};

/// Whether an agent is free to accept a move.
///
/// Exactly one value per agent.  `Idle → Moving` happens on commit;
/// `Moving → Idle` when the navigation agent finishes (or is halted).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementState {
    #[default]
    Idle,
    Moving(ActiveMove),
}

impl MovementState {
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, MovementState::Idle)
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        !self.is_idle()
    }

    /// The move in progress, if any.
    pub fn active(&self) -> Option<&ActiveMove> {
        match self {
            MovementState::Moving(m) => Some(m),
            MovementState::Idle => None,
        }
    }
}

/// A committed move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveMove {
    /// End of the truncated path the agent was sent to.
    pub destination: Position,
    /// Tick of the commit.
    pub started: Tick,
    pub phase: MovePhase,
}

/// Progress of a committed move as seen through the navigation agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePhase {
    /// Destination issued; the navigation agent has not started traversal.
    AwaitingStart,
    /// Traversal under way.
    Traversing,
}

/// Why a move ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The navigation agent has no pending and no remaining path.
    Arrived,
    /// The navigation agent still holds a path but its traversal was halted.
    Halted,
}

/// Emitted once when a move ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEnd {
    pub destination: Position,
    pub started:     Tick,
    pub reason:      StopReason,
}
