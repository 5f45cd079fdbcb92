//! Error type shared by path construction, engine construction and config loading.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("waypoint index {index} out of range for a path of {count} waypoints")]
    OutOfRange { index: usize, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shorthand result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
