//! Encoder error types.

use thiserror::Error;

/// Errors that can occur while building a TBD4 line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Stored timestamp value is too short to hold date and time.
    #[error("Malformed timestamp value {value:?}: expected at least 14 characters, got {len}")]
    MalformedTimestamp { value: String, len: usize },

    /// A source value does not fit its fixed-width field.
    #[error("Field {field} overflows: {len} characters exceed width {width}")]
    FieldOverflow {
        field: &'static str,
        width: usize,
        len: usize,
    },

    /// Assembled line has the wrong length. Indicates a layout bug.
    #[error("Record length mismatch: expected {expected} characters, produced {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl EncodeError {
    /// Whether the failure comes from the stored row rather than the encoder.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            EncodeError::MalformedTimestamp { .. } | EncodeError::FieldOverflow { .. }
        )
    }

    /// Short machine-readable label, used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            EncodeError::MalformedTimestamp { .. } => "malformed_timestamp",
            EncodeError::FieldOverflow { .. } => "field_overflow",
            EncodeError::LengthMismatch { .. } => "length_mismatch",
        }
    }
}

/// Result type for encoder operations.
pub type EncodeResult<T> = Result<T, EncodeError>;
