use thiserror::Error;

use pb_core::Position;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("a move towards {0} is already in progress")]
    AlreadyMoving(Position),
}

pub type MotionResult<T> = Result<T, MotionError>;
