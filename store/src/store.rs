//! Record store trait.

use std::sync::Arc;

use async_trait::async_trait;
use ratefeed_common::{CurrencyRateRecord, InstrumentCode};

use crate::error::StoreResult;

/// Read-only source of currency-rate records.
///
/// Returned records are always trimmed (see [`CurrencyRateRecord::trimmed`]).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records, optionally restricted to one instrument.
    async fn list(
        &self,
        instrument: Option<&InstrumentCode>,
    ) -> StoreResult<Vec<CurrencyRateRecord>>;

    /// The record with the greatest timestamp value, if any.
    async fn latest(&self) -> StoreResult<Option<CurrencyRateRecord>>;

    /// The record whose instrument code matches exactly.
    async fn find(&self, instrument: &InstrumentCode) -> StoreResult<Option<CurrencyRateRecord>>;

    /// Check that the backend answers a trivial query.
    async fn ping(&self) -> StoreResult<()>;
}

/// Shared record store handle.
pub type SharedRecordStore = Arc<dyn RecordStore>;
