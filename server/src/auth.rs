//! API key gate for the `/api` routes.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::state::AppState;

/// Header SAP sends the key in.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Axum middleware: require `X-API-Key: <key>` when a key is configured.
///
/// With no key configured the middleware lets everything through.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let expected = &state.config.api_key;
    if expected.is_empty() {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if constant_time_eq(key.as_bytes(), expected.expose().as_bytes()) => {
            next.run(request).await
        }
        Some(_) => {
            state.metrics.auth_rejected();
            ApiError::InvalidApiKey.into_response()
        }
        None => {
            state.metrics.auth_rejected();
            ApiError::MissingApiKey.into_response()
        }
    }
}

/// Compare two byte strings without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
