use std::time::Duration;

use thiserror::Error;

/// Failure of the oracle call itself.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("oracle timed out after {0:?}")]
    Timeout(Duration),

    #[error("prompt template has no value for {{{0}}}")]
    MissingVariable(String),
}

pub type OracleResult<T> = Result<T, OracleError>;

/// Why a single classification attempt produced no usable label.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("response is not a JSON object: {0}")]
    Malformed(String),

    #[error("response has no {0:?} field")]
    MissingField(String),

    #[error("label {label:?} is not one of {allowed:?}")]
    InvalidLabel { label: String, allowed: Vec<String> },

    #[error("value {value} outside [{min}, {max}]")]
    OutOfRange { value: i64, min: i64, max: i64 },
}
