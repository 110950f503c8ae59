use thiserror::Error;

use ca_core::AgentId;
use ca_memory::MemoryError;
use ca_oracle::OracleError;
use ca_spatial::SpatialError;

/// Failure of an environment or transport call.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("environment unavailable: {0}")]
    Unavailable(String),

    #[error("no such agent: {0}")]
    UnknownAgent(AgentId),
}

pub type PortResult<T> = Result<T, PortError>;

/// Errors raised inside a behavior unit.  Never escapes `forward`.
#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("status {0:?} is missing or malformed")]
    MissingStatus(&'static str),

    #[error("nothing to choose from: {0}")]
    NoCandidates(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
