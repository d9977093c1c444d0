use fleet_core::FleetError;
use fleet_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] FleetError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to spawn the tick thread: {0}")]
    Spawn(#[source] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
