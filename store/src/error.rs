//! Record store error types.

use thiserror::Error;

/// Errors that can occur while reading rate records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query or connection failure reported by the driver.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configured table name is not a plain identifier.
    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),

    /// Backend cannot be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the failure was waiting on a pooled connection.
    pub fn is_pool_timeout(&self) -> bool {
        matches!(self, StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
