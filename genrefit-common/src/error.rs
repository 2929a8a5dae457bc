//! Common error types for genrefit

use thiserror::Error;

/// Common result type for genrefit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across genrefit crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Genre catalog unavailable or malformed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Caller passed zero tracks or zero genres to an operation requiring at least one
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
