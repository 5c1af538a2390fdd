//! The idle/moving state machine.

use pb_core::{Position, Tick};
use pb_nav::NavAgent;

use crate::{ActiveMove, MotionError, MotionResult, MoveEnd, MovePhase, MovementState, StopReason};

/// Gates new moves and detects when the current one has finished.
///
/// Completion is detected by polling: the host calls
/// [`advance`](Self::advance) once per tick, and the machine inspects the
/// navigation agent's status flags.  There is no cancellation; a move ends
/// only when the navigation agent reports it done or halted.
#[derive(Debug, Clone, Default)]
pub struct MovementStateMachine {
    state: MovementState,
}

impl MovementStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> &MovementState {
        &self.state
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// `Idle → Moving`.  Fails without changing anything if a move is
    /// already in progress.
    pub fn begin(&mut self, destination: Position, now: Tick) -> MotionResult<()> {
        if let MovementState::Moving(m) = &self.state {
            return Err(MotionError::AlreadyMoving(m.destination));
        }
        self.state = MovementState::Moving(ActiveMove {
            destination,
            started: now,
            phase: MovePhase::AwaitingStart,
        });
        Ok(())
    }

    /// Poll the navigation agent; returns the finished move on `Moving → Idle`.
    ///
    /// While awaiting start the machine waits for the agent's halt flag to
    /// drop (engines typically take a tick to pick up a new destination),
    /// then evaluates completion in the same poll.
    pub fn advance<A: NavAgent + ?Sized>(&mut self, agent: &A) -> Option<MoveEnd> {
        let MovementState::Moving(active) = &mut self.state else {
            return None;
        };

        if active.phase == MovePhase::AwaitingStart {
            if agent.is_traversal_halted() {
                return None;
            }
            active.phase = MovePhase::Traversing;
        }

        let reason = if agent.is_path_pending() || agent.has_path() {
            if !agent.is_traversal_halted() {
                return None;
            }
            StopReason::Halted
        } else {
            StopReason::Arrived
        };

        let end = MoveEnd {
            destination: active.destination,
            started:     active.started,
            reason,
        };
        self.state = MovementState::Idle;
        Some(end)
    }
}
