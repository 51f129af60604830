use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `healthy` while the process answers.
    #[schema(value_type = String, example = "healthy")]
    pub status: &'static str,
    /// `connected` or `disconnected`.
    #[schema(value_type = String, example = "connected")]
    pub database: &'static str,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "title": state.config.app_title,
        "version": state.config.app_version,
        "node_id": state.node_id,
        "description": "Read-only REST API over the MonedaValor exchange-rate table, consumed by SAP.",
        "docs": "/docs",
        "redoc": "/redoc",
        "openapi": "/openapi.json",
        "health": "/health",
        "endpoints": {
            "list": "/api/moneda-valor",
            "by_instrument": "/api/moneda-valor/{instrumento}",
            "sap_tbd4": "/api/moneda-valor/formato-sap",
        },
    }))
}

/// The service itself is always reported healthy; `database` tells whether
/// the store answered.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service and database status", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            "disconnected"
        }
    };

    Json(HealthResponse {
        status: "healthy",
        database,
    })
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.to_prometheus(),
    )
}
