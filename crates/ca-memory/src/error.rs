use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("memory store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid agent profile: {0}")]
    InvalidProfile(String),
}

pub type MemoryResult<T> = Result<T, MemoryError>;
