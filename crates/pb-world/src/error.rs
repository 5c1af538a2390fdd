use pb_core::PbError;
use pb_energy::EnergyError;
use pb_nav::NavError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world configuration error: {0}")]
    Core(#[from] PbError),

    #[error("energy configuration error: {0}")]
    Energy(#[from] EnergyError),

    #[error("navigation error: {0}")]
    Nav(#[from] NavError),

    #[error("script parse error: {0}")]
    Script(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

pub type WorldResult<T> = Result<T, WorldError>;
