//! Errors raised by `pb-core`.

use thiserror::Error;

use crate::AgentId;

#[derive(Debug, Error)]
pub enum PbError {
    /// An ID that does not name a spawned pilot.
    #[error("{0} is not a spawned pilot")]
    UnknownAgent(AgentId),

    /// A `WorldConfig` field is out of range.
    #[error("invalid world config: {0}")]
    Config(String),
}

pub type PbResult<T> = Result<T, PbError>;
