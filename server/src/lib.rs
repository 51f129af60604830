//! MonedaValor Rate Feed Server
//!
//! Read-only REST API over the currency-rate table. Besides JSON listing and
//! lookup it serves the most recent rate as a TBD4 fixed-width line for SAP.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use routes::app_router;
pub use state::AppState;
