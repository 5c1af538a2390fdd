use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnergyError {
    #[error("maximum energy must be positive and finite, got {0}")]
    InvalidMax(f32),

    #[error("act threshold must lie in [0, max], got {threshold} with max {max}")]
    InvalidThreshold { threshold: f32, max: f32 },
}

pub type EnergyResult<T> = Result<T, EnergyError>;
