//! Error types for gear-core

use thiserror::Error;

/// gear-core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Requested parameter key is not present
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
