//! API error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ratefeed_store::StoreError;
use ratefeed_tbd4::EncodeError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable reason.
    #[schema(example = "Instrument USDCOPTRM not found.")]
    pub detail: String,
}

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// No `X-API-Key` header on a protected route.
    #[error("API key required. Send the X-API-Key header.")]
    MissingApiKey,

    /// `X-API-Key` did not match the configured key.
    #[error("Invalid API key.")]
    InvalidApiKey,

    /// Store could not answer.
    #[error("Database query failed: {0}")]
    Store(#[from] StoreError),

    /// Stored row could not be turned into a TBD4 line.
    #[error("{}", encode_detail(.0))]
    Encode(#[from] EncodeError),
}

fn encode_detail(e: &EncodeError) -> String {
    if e.is_data_error() {
        format!("Stored record cannot be exported in TBD4 format: {e}")
    } else {
        format!("TBD4 encoder produced an invalid line: {e}")
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingApiKey | ApiError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) | ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::MissingApiKey => "missing_api_key",
            ApiError::InvalidApiKey => "invalid_api_key",
            ApiError::Store(e) if e.is_pool_timeout() => "pool_timeout",
            ApiError::Store(_) => "database",
            ApiError::Encode(e) => e.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        match &self {
            ApiError::Encode(e) if !e.is_data_error() => {
                error!(kind = self.kind(), error = %e, "TBD4 layout invariant violated");
            }
            ApiError::Store(_) | ApiError::Encode(_) => {
                error!(kind = self.kind(), error = %detail, "Request failed");
            }
            _ => {
                warn!(kind = self.kind(), status = status.as_u16(), "Request rejected");
            }
        }

        (status, axum::Json(ErrorBody { detail })).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
