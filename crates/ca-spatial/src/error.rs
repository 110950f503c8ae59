//! Spatial-subsystem error type.

use thiserror::Error;

use ca_core::PlaceId;

/// Errors produced by `ca-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("place {0} not found on map")]
    PlaceNotFound(PlaceId),

    #[error("place {0} added twice")]
    DuplicatePlace(PlaceId),

    #[error("map service unavailable: {0}")]
    Unavailable(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
