//! Error types shared across the rate feed crates.

use thiserror::Error;

/// Errors raised while building common value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Instrument key was empty after trimming.
    #[error("Instrument code cannot be empty")]
    EmptyInstrument,
}

/// Result type for common operations.
pub type Result<T> = std::result::Result<T, CommonError>;
