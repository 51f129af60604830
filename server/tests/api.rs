use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use ratefeed_common::CurrencyRateRecord;
use ratefeed_server::config::Secret;
use ratefeed_server::{app_router, AppState, ServerConfig};
use ratefeed_store::MemoryRecordStore;
use tower::ServiceExt;

const REFERENCE_LINE_PREFIX: &str = "USDCOPTRM           MIF            MID            ";

fn usd() -> CurrencyRateRecord {
    CurrencyRateRecord::new(
        "USDCOPTRM",
        "MIF",
        "MID",
        "20260223140000+4235.500000",
        "COP",
    )
}

fn eur() -> CurrencyRateRecord {
    CurrencyRateRecord::new(
        "EURCOPTRM",
        "MIF",
        "MID",
        "20260222090000+4610.120000",
        "COP",
    )
}

fn build(store: Arc<MemoryRecordStore>, config: ServerConfig) -> (Router, Arc<AppState>) {
    let state = AppState::new(config, "ratefeed-test".to_string(), store);
    (app_router(state.clone()), state)
}

fn app_with(records: Vec<CurrencyRateRecord>) -> Router {
    let store = Arc::new(MemoryRecordStore::with_records(records));
    build(store, ServerConfig::default()).0
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String, Option<String>) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String, Option<String>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap(), content_type)
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn sap_export_returns_latest_record_as_fixed_width_line() {
    let app = app_with(vec![eur(), usd()]);

    let (status, body, content_type) = get(&app, "/api/moneda-valor/formato-sap").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(body.len(), 237);
    assert!(body.starts_with(REFERENCE_LINE_PREFIX));
    assert_eq!(&body[157..171], "20260223140000");
    assert_eq!(&body[171..191], "        +4235.500000");
    assert_eq!(&body[191..196], "COP  ");
    assert!(!body.ends_with('\n'));
}

#[tokio::test]
async fn sap_export_on_empty_table_is_not_found() {
    let app = app_with(Vec::new());

    let (status, body, _) = get(&app, "/api/moneda-valor/formato-sap").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["detail"], "No data found in the MonedaValor table.");
}

#[tokio::test]
async fn sap_export_with_malformed_timestamp_is_server_error() {
    let mut record = usd();
    record.timestamp_value = "2026022314000".to_string();
    let store = Arc::new(MemoryRecordStore::with_records(vec![record]));
    let (app, state) = build(store, ServerConfig::default());

    let (status, body, _) = get(&app, "/api/moneda-valor/formato-sap").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json(&body)["detail"].as_str().unwrap().to_string();
    assert!(detail.contains("Malformed timestamp"), "{detail}");
    assert_eq!(state.metrics.snapshot().exports_malformed_timestamp, 1);
}

#[tokio::test]
async fn sap_export_with_overflowing_field_is_server_error() {
    let mut record = usd();
    record.instrument_code = "USDCOPTRM-OVERFLOWING".to_string();
    let store = Arc::new(MemoryRecordStore::with_records(vec![record]));
    let (app, state) = build(store, ServerConfig::default());

    let (status, body, _) = get(&app, "/api/moneda-valor/formato-sap").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json(&body)["detail"].as_str().unwrap().contains("RINID1"));
    assert_eq!(state.metrics.snapshot().exports_field_overflow, 1);
    assert_eq!(state.metrics.snapshot().exports_success, 0);
}

#[tokio::test]
async fn list_returns_all_records_with_count() {
    let app = app_with(vec![usd(), eur()]);

    let (status, body, _) = get(&app, "/api/moneda-valor").await;

    assert_eq!(status, StatusCode::OK);
    let value = json(&body);
    assert_eq!(value["count"], 2);
    assert_eq!(value["data"][0]["ssinstrumnt"], "USDCOPTRM");
    assert_eq!(value["data"][0]["mifeedname"], "MIF");
    assert_eq!(value["data"][0]["ratetype"], "MID");
    assert_eq!(value["data"][0]["timestamp_valor"], "20260223140000+4235.500000");
    assert_eq!(value["data"][0]["currency"], "COP");
}

#[tokio::test]
async fn list_filters_by_instrument() {
    let app = app_with(vec![usd(), eur()]);

    let (status, body, _) = get(&app, "/api/moneda-valor?ssinstrumnt=EURCOPTRM").await;
    assert_eq!(status, StatusCode::OK);
    let value = json(&body);
    assert_eq!(value["count"], 1);
    assert_eq!(value["data"][0]["ssinstrumnt"], "EURCOPTRM");

    let (_, body, _) = get(&app, "/api/moneda-valor?ssinstrumnt=JPYCOP").await;
    assert_eq!(json(&body)["count"], 0);

    let (_, body, _) = get(&app, "/api/moneda-valor?ssinstrumnt=").await;
    assert_eq!(json(&body)["count"], 2);
}

#[tokio::test]
async fn lookup_by_instrument() {
    let app = app_with(vec![usd(), eur()]);

    let (status, body, _) = get(&app, "/api/moneda-valor/USDCOPTRM").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["timestamp_valor"], "20260223140000+4235.500000");

    let (status, _, _) = get(&app, "/api/moneda-valor/USDCOPTRM%20%20").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn lookup_of_unknown_instrument_is_not_found() {
    let app = app_with(vec![usd()]);

    let (status, body, _) = get(&app, "/api/moneda-valor/JPYCOP").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["detail"], "Instrument JPYCOP not found.");
}

#[tokio::test]
async fn store_failure_is_server_error() {
    let store = Arc::new(MemoryRecordStore::with_records(vec![usd()]));
    store.set_available(false);
    let (app, state) = build(store, ServerConfig::default());

    let (status, body, _) = get(&app, "/api/moneda-valor").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json(&body)["detail"]
        .as_str()
        .unwrap()
        .starts_with("Database query failed"));
    assert_eq!(state.metrics.snapshot().store_errors, 1);
}

#[tokio::test]
async fn health_reports_database_reachability() {
    let store = Arc::new(MemoryRecordStore::new());
    let (app, _) = build(store.clone(), ServerConfig::default());

    let (status, body, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!({"status": "healthy", "database": "connected"}));

    store.set_available(false);
    let (status, body, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["database"], "disconnected");
}

#[tokio::test]
async fn only_get_is_routed() {
    let app = app_with(vec![usd()]);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/moneda-valor")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn api_key_is_enforced_when_configured() {
    let config = ServerConfig {
        api_key: Secret::new("sap-secret"),
        ..ServerConfig::default()
    };
    let store = Arc::new(MemoryRecordStore::with_records(vec![usd()]));
    let (app, state) = build(store, config);

    let (status, body, _) = get(&app, "/api/moneda-valor").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json(&body)["detail"].as_str().unwrap().contains("X-API-Key"));

    let wrong = Request::builder()
        .uri("/api/moneda-valor")
        .header("X-API-Key", "guess")
        .body(Body::empty())
        .unwrap();
    let (status, body, _) = send(&app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json(&body)["detail"], "Invalid API key.");

    let right = Request::builder()
        .uri("/api/moneda-valor/formato-sap")
        .header("X-API-Key", "sap-secret")
        .body(Body::empty())
        .unwrap();
    let (status, body, _) = send(&app, right).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.len(), 237);

    let (status, _, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(state.metrics.snapshot().auth_rejected, 2);
}

#[tokio::test]
async fn root_describes_the_service() {
    let app = app_with(Vec::new());

    let (status, body, _) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    let value = json(&body);
    assert_eq!(value["title"], "MonedaValor API");
    assert_eq!(value["version"], "1.0.0");
    assert_eq!(value["node_id"], "ratefeed-test");
    assert_eq!(value["endpoints"]["sap_tbd4"], "/api/moneda-valor/formato-sap");
}

#[tokio::test]
async fn metrics_endpoint_counts_requests() {
    let app = app_with(vec![usd()]);

    get(&app, "/api/moneda-valor/formato-sap").await;
    let (status, body, content_type) = get(&app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert!(body.contains("ratefeed_requests_total 2"));
    assert!(body.contains("ratefeed_exports_total{outcome=\"success\"} 1"));
}

#[tokio::test]
async fn metrics_endpoint_can_be_disabled() {
    let config = ServerConfig {
        metrics_enabled: false,
        ..ServerConfig::default()
    };
    let (app, _) = build(Arc::new(MemoryRecordStore::new()), config);

    let (status, _, _) = get(&app, "/metrics").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn interactive_docs_are_served() {
    let app = app_with(Vec::new());

    let (status, body, content_type) = get(&app, "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().contains("json"));
    let doc = json(&body);
    assert_eq!(doc["info"]["title"], "MonedaValor API");
    assert!(doc["paths"]["/api/moneda-valor/formato-sap"]["get"].is_object());
    assert!(doc["paths"]["/api/moneda-valor/{instrumento}"]["get"].is_object());
    assert_eq!(
        doc["components"]["schemas"]["CurrencyRateRecord"]["properties"]["ssinstrumnt"]["type"],
        "string"
    );

    let (status, body, _) = get(&app, "/docs/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("swagger"), "{body}");

    let (status, _, _) = get(&app, "/docs").await;
    assert!(status.is_success() || status.is_redirection(), "{status}");

    let (status, body, _) = get(&app, "/redoc").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("redoc"), "{body}");

    let (_, body, _) = get(&app, "/").await;
    let value = json(&body);
    assert_eq!(value["docs"], "/docs");
    assert_eq!(value["redoc"], "/redoc");
}

#[tokio::test]
async fn docs_stay_open_when_api_key_is_configured() {
    let config = ServerConfig {
        api_key: Secret::new("sap-secret"),
        ..ServerConfig::default()
    };
    let (app, _) = build(Arc::new(MemoryRecordStore::new()), config);

    let (status, _, _) = get(&app, "/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
}
