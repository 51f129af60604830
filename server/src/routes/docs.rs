//! OpenAPI document and the interactive docs pages.

use std::sync::Arc;

use axum::Router;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::API_KEY_HEADER;
use crate::config::ServerConfig;
use crate::state::AppState;

/// Where the raw OpenAPI JSON is served.
pub const OPENAPI_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::rates::list_rates,
        crate::routes::rates::sap_export,
        crate::routes::rates::get_rate,
        crate::routes::system::health,
    ),
    components(schemas(
        ratefeed_common::CurrencyRateRecord,
        crate::routes::rates::RateListResponse,
        crate::routes::system::HealthResponse,
        crate::error::ErrorBody,
    )),
    modifiers(&ApiKeyScheme),
    tags(
        (name = "moneda-valor", description = "Exchange rates and the SAP TBD4 export"),
        (name = "system", description = "Service status"),
    )
)]
pub struct ApiDoc;

struct ApiKeyScheme;

impl Modify for ApiKeyScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
        );
    }
}

/// The OpenAPI document, titled and versioned from config.
pub fn openapi(config: &ServerConfig) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = config.app_title.clone();
    doc.info.version = config.app_version.clone();
    doc.info.description = Some(
        "Read-only access to the MonedaValor exchange-rate table, including the \
         fixed-width TBD4 line SAP ingests."
            .to_string(),
    );
    doc
}

/// Swagger UI at `/docs`, Redoc at `/redoc` and the JSON document.
pub fn routes(config: &ServerConfig) -> Router<Arc<AppState>> {
    let doc = openapi(config);
    Router::new()
        .merge(SwaggerUi::new("/docs").url(OPENAPI_PATH, doc.clone()))
        .merge(Redoc::with_url("/redoc", doc))
}
