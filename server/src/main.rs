//! MonedaValor Rate Feed Binary
//!
//! Serves the exchange-rate table to SAP over HTTP.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use ratefeed_server::telemetry::init_tracing;
use ratefeed_server::{app_router, AppState, ServerConfig};
use ratefeed_store::{PgRecordStore, TableName};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment.
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    init_tracing(&config);

    info!("Starting MonedaValor rate feed");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let node_id = config
        .node_id
        .clone()
        .unwrap_or_else(|| format!("ratefeed-{}", uuid::Uuid::new_v4()));
    info!(node_id = %node_id, auth_enabled = config.auth_enabled(), "Node ID assigned");

    let table = TableName::parse(&config.database.table)?;
    let options = config.database.connect_options()?;
    let store = Arc::new(PgRecordStore::connect_lazy(
        options,
        &config.database.pool,
        &table,
    ));

    let bind_address = config.bind_address();
    let state = AppState::new(config, node_id.clone(), store.clone());
    let app = app_router(state);

    let listener = TcpListener::bind(&bind_address).await?;
    info!(node_id = %node_id, listen = %bind_address, "Rate feed listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Rate feed shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
