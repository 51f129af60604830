//! Request and export counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ratefeed_tbd4::EncodeError;

/// Feed metrics.
pub struct FeedMetrics {
    /// Total HTTP requests received.
    pub requests_total: AtomicU64,
    /// Records returned by the JSON endpoints.
    pub records_served: AtomicU64,
    /// TBD4 lines produced.
    pub exports_success: AtomicU64,
    /// TBD4 exports failed on a short timestamp.
    pub exports_malformed_timestamp: AtomicU64,
    /// TBD4 exports failed on an over-long field.
    pub exports_field_overflow: AtomicU64,
    /// TBD4 exports failed on the line-length guard.
    pub exports_length_mismatch: AtomicU64,
    /// Lookups that found nothing.
    pub not_found: AtomicU64,
    /// Store failures.
    pub store_errors: AtomicU64,
    /// Requests rejected by the API key gate.
    pub auth_rejected: AtomicU64,
}

impl FeedMetrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            records_served: AtomicU64::new(0),
            exports_success: AtomicU64::new(0),
            exports_malformed_timestamp: AtomicU64::new(0),
            exports_field_overflow: AtomicU64::new(0),
            exports_length_mismatch: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            store_errors: AtomicU64::new(0),
            auth_rejected: AtomicU64::new(0),
        }
    }

    pub fn request_received(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn records_served(&self, count: usize) {
        self.records_served.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn export_success(&self) {
        self.exports_success.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed export under its error kind.
    pub fn export_failed(&self, error: &EncodeError) {
        let counter = match error {
            EncodeError::MalformedTimestamp { .. } => &self.exports_malformed_timestamp,
            EncodeError::FieldOverflow { .. } => &self.exports_field_overflow,
            EncodeError::LengthMismatch { .. } => &self.exports_length_mismatch,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn store_error(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn auth_rejected(&self) {
        self.auth_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            records_served: self.records_served.load(Ordering::Relaxed),
            exports_success: self.exports_success.load(Ordering::Relaxed),
            exports_malformed_timestamp: self.exports_malformed_timestamp.load(Ordering::Relaxed),
            exports_field_overflow: self.exports_field_overflow.load(Ordering::Relaxed),
            exports_length_mismatch: self.exports_length_mismatch.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
            auth_rejected: self.auth_rejected.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"# HELP ratefeed_requests_total Total HTTP requests received
# TYPE ratefeed_requests_total counter
ratefeed_requests_total {}

# HELP ratefeed_records_served_total Rate records returned as JSON
# TYPE ratefeed_records_served_total counter
ratefeed_records_served_total {}

# HELP ratefeed_exports_total TBD4 export attempts by outcome
# TYPE ratefeed_exports_total counter
ratefeed_exports_total{{outcome="success"}} {}
ratefeed_exports_total{{outcome="malformed_timestamp"}} {}
ratefeed_exports_total{{outcome="field_overflow"}} {}
ratefeed_exports_total{{outcome="length_mismatch"}} {}

# HELP ratefeed_not_found_total Lookups that matched no record
# TYPE ratefeed_not_found_total counter
ratefeed_not_found_total {}

# HELP ratefeed_store_errors_total Record store failures
# TYPE ratefeed_store_errors_total counter
ratefeed_store_errors_total {}

# HELP ratefeed_auth_rejected_total Requests rejected by the API key check
# TYPE ratefeed_auth_rejected_total counter
ratefeed_auth_rejected_total {}
"#,
            snapshot.requests_total,
            snapshot.records_served,
            snapshot.exports_success,
            snapshot.exports_malformed_timestamp,
            snapshot.exports_field_overflow,
            snapshot.exports_length_mismatch,
            snapshot.not_found,
            snapshot.store_errors,
            snapshot.auth_rejected,
        )
    }
}

impl Default for FeedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub records_served: u64,
    pub exports_success: u64,
    pub exports_malformed_timestamp: u64,
    pub exports_field_overflow: u64,
    pub exports_length_mismatch: u64,
    pub not_found: u64,
    pub store_errors: u64,
    pub auth_rejected: u64,
}

/// Shared metrics instance.
pub type SharedMetrics = Arc<FeedMetrics>;
