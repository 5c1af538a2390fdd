//! Navigation-subsystem error type.

use thiserror::Error;

use pb_core::{NodeId, Position};

/// Errors produced by `pb-nav`.
///
/// None of these reach the movement planner: [`NavQuery`](crate::NavQuery)
/// reports failure as an empty path.  They surface from construction and
/// from the lower-level routing helpers.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("no path from {from} to {to}")]
    NoPath { from: Position, to: Position },

    #[error("{0} is not in the graph")]
    NodeNotFound(NodeId),

    #[error("no graph node within snapping range of {0}")]
    Unsnappable(Position),

    #[error("agent speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),

    #[error("position {0} is not finite")]
    NonFinite(Position),
}

pub type NavResult<T> = Result<T, NavError>;
