//! `pb-motion`: point-and-click movement under an energy budget.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`state`]   | `MovementState`, `ActiveMove`, `MovePhase`, `MoveEnd`             |
//! | [`machine`] | `MovementStateMachine`: idle/moving gate and completion polling  |
//! | [`planner`] | `MovementPlanner`: hover previews, commits, per-tick advance     |
//! | [`preview`] | `PreviewPresenter` trait, `GhostPreview`, `NoopPresenter`         |
//! | [`error`]   | `MotionError`, `MotionResult<T>`                                  |
//!
//! # Movement model
//!
//! 1. While the agent is idle, each hover over a target asks the navigator
//!    for a path and budgets it against the current energy.  The truncated
//!    path goes to the preview presenter and its residual becomes the
//!    predicted energy.
//! 2. A click commits: the residual becomes the new energy level, the state
//!    machine enters `Moving`, and the navigation agent is sent to the end of
//!    the truncated path.
//! 3. Every tick `MovementPlanner::advance` applies pending energy resets and
//!    polls the navigation agent.  Once traversal has started and the agent
//!    holds neither a pending nor an active path, the move ends, the preview
//!    is cleared and the planner accepts commands again.
//!
//! Commands issued while moving or below the act threshold are ignored
//! rather than queued.

pub mod error;
pub mod machine;
pub mod planner;
pub mod preview;
pub mod state;


pub use error::{MotionError, MotionResult};
pub use machine::MovementStateMachine;
pub use planner::{AdvanceReport, CommitOutcome, MovementPlanner, RejectReason};
pub use preview::{GhostPreview, NoopPresenter, PreviewPresenter};
pub use state::{ActiveMove, MoveEnd, MovePhase, MovementState, StopReason};
