pub mod docs;
pub mod rates;
pub mod system;

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_api_key;
use crate::state::AppState;

/// Assemble the full application router.
///
/// `/api` routes sit behind the API key gate; `/`, `/health`, `/metrics` and
/// the docs pages never do.
pub fn app_router(state: Arc<AppState>) -> Router {
    let api = rates::routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_api_key,
    ));

    let mut router = Router::new()
        .merge(system::routes())
        .merge(docs::routes(&state.config))
        .merge(api);
    if state.config.metrics_enabled {
        router = router.route("/metrics", get(system::metrics));
    }

    router
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

async fn count_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    state.metrics.request_received();
    next.run(request).await
}
