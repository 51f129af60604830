use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use ratefeed_common::{CurrencyRateRecord, InstrumentCode};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Exact instrument code to filter on. Blank means no filter.
    ssinstrumnt: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RateListResponse {
    pub count: usize,
    pub data: Vec<CurrencyRateRecord>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/moneda-valor", get(list_rates))
        .route("/api/moneda-valor/formato-sap", get(sap_export))
        .route("/api/moneda-valor/{instrumento}", get(get_rate))
}

#[utoipa::path(
    get,
    path = "/api/moneda-valor",
    tag = "moneda-valor",
    params(ListQuery),
    responses(
        (status = 200, description = "Rate records", body = RateListResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorBody),
        (status = 500, description = "Database query failed", body = ErrorBody),
    ),
    security((), ("api_key" = []))
)]
pub async fn list_rates(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListQuery>,
) -> ApiResult<Json<RateListResponse>> {
    // A blank filter means no filter.
    let instrument = q
        .ssinstrumnt
        .as_deref()
        .and_then(|raw| InstrumentCode::parse(raw).ok());

    let data = state
        .store
        .list(instrument.as_ref())
        .await
        .inspect_err(|_| state.metrics.store_error())?;

    state.metrics.records_served(data.len());
    Ok(Json(RateListResponse {
        count: data.len(),
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/moneda-valor/{instrumento}",
    tag = "moneda-valor",
    params(("instrumento" = String, Path, description = "Instrument code, surrounding spaces ignored")),
    responses(
        (status = 200, description = "Rate record", body = CurrencyRateRecord),
        (status = 401, description = "Missing or invalid API key", body = ErrorBody),
        (status = 404, description = "Unknown instrument", body = ErrorBody),
        (status = 500, description = "Database query failed", body = ErrorBody),
    ),
    security((), ("api_key" = []))
)]
pub async fn get_rate(
    State(state): State<Arc<AppState>>,
    Path(instrumento): Path<String>,
) -> ApiResult<Json<CurrencyRateRecord>> {
    let not_found = || {
        state.metrics.not_found();
        ApiError::NotFound(format!("Instrument {} not found.", instrumento.trim()))
    };

    let code = InstrumentCode::parse(&instrumento).map_err(|_| not_found())?;
    let record = state
        .store
        .find(&code)
        .await
        .inspect_err(|_| state.metrics.store_error())?
        .ok_or_else(not_found)?;

    state.metrics.records_served(1);
    Ok(Json(record))
}

/// Most recent record as one TBD4 fixed-width line, `text/plain`.
#[utoipa::path(
    get,
    path = "/api/moneda-valor/formato-sap",
    tag = "moneda-valor",
    responses(
        (
            status = 200,
            description = "237-character TBD4 line, no trailing newline",
            body = String,
            content_type = "text/plain"
        ),
        (status = 401, description = "Missing or invalid API key", body = ErrorBody),
        (status = 404, description = "Table is empty", body = ErrorBody),
        (status = 500, description = "Stored record cannot be exported", body = ErrorBody),
    ),
    security((), ("api_key" = []))
)]
pub async fn sap_export(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let record = state
        .store
        .latest()
        .await
        .inspect_err(|_| state.metrics.store_error())?
        .ok_or_else(|| {
            state.metrics.not_found();
            ApiError::NotFound("No data found in the MonedaValor table.".to_string())
        })?;

    let line = ratefeed_tbd4::encode(&record).inspect_err(|e| state.metrics.export_failed(e))?;
    state.metrics.export_success();

    info!(
        instrument = %record.instrument_code,
        observed_at = ?record.observed_at(),
        "TBD4 line exported"
    );

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], line))
}
