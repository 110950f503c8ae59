use ca_core::{AgentId, CoreError};
use ca_memory::MemoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("agent {0} is defined twice")]
    DuplicateAgent(AgentId),

    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("agent task failed: {0}")]
    Task(String),
}

pub type SimResult<T> = Result<T, SimError>;
