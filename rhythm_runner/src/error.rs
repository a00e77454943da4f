//! Error types for the Rhythm Runner core
//!
//! Recoverable failures only: malformed geometry, unknown assets, bad
//! configuration and invalid arguments. Tree corruption is a logic bug and
//! is never reported through this type.

use std::fmt;

/// Result type for Rhythm Runner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Rhythm Runner errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Vertex data that cannot describe a shape (empty, ragged, non-finite)
    InvalidGeometry(String),

    /// Unknown or duplicate asset in the shape registry
    InvalidResource(String),

    /// Configuration that cannot be parsed or is out of range
    InvalidConfig(String),

    /// Argument rejected by an operation (e.g. empty object set)
    InvalidInput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
