// src/error.rs
//! Library error type and `Result` alias.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// No definition with this name is held by the calculator
    #[error("Index with name {0} not found")]
    IndexNotFound(String),

    /// The name does not belong to the index catalog
    #[error("Unknown index: {0}")]
    UnknownIndex(String),

    #[error("Band {0} is not present in the band mapping")]
    BandNotMapped(String),

    #[error("Band {band} out of range (raster has {count} bands)")]
    BandOutOfRange { band: usize, count: usize },

    #[error("Shape mismatch: expected {expected:?}, got {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{index} requires {expected} input bands, got {found}")]
    InputCount {
        index: &'static str,
        expected: usize,
        found: usize,
    },
}
