//! Shared application state.

use std::sync::Arc;

use ratefeed_store::SharedRecordStore;

use crate::config::ServerConfig;
use crate::metrics::{FeedMetrics, SharedMetrics};

/// State passed to every handler via `axum::extract::State`.
pub struct AppState {
    /// Immutable configuration loaded at startup.
    pub config: ServerConfig,
    /// Node ID of this instance.
    pub node_id: String,
    /// Source of rate records.
    pub store: SharedRecordStore,
    /// Counters.
    pub metrics: SharedMetrics,
}

impl AppState {
    /// Create the shared state.
    pub fn new(config: ServerConfig, node_id: String, store: SharedRecordStore) -> Arc<Self> {
        Arc::new(Self {
            config,
            node_id,
            store,
            metrics: Arc::new(FeedMetrics::new()),
        })
    }
}
