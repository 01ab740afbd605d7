//! Typed errors that reach the user interface.
//!
//! HTTP clients work with `anyhow` internally and are mapped into these
//! variants at the operation boundary, where every failure becomes a
//! displayable message.

use thiserror::Error;

/// Failure modes of a device position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
}

/// Validation failures for raw coordinate input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("Please enter valid coordinates")]
    NotANumber,
    #[error("Latitude must be between -90 and 90")]
    LatitudeOutOfRange,
    #[error("Longitude must be between -180 and 180")]
    LongitudeOutOfRange,
}

/// Typed Application Errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Coordinates(#[from] CoordinateError),
    #[error("No locations found")]
    NoResults,
    #[error("Coordinates point to an invalid location")]
    InvalidPlace,
    #[error(transparent)]
    Location(#[from] LocationError),
}

impl AppError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        // `{:#}` keeps the anyhow context chain on one line
        AppError::Network(format!("{:#}", err))
    }
}
