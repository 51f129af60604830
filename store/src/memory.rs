//! In-memory record store for tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use ratefeed_common::{CurrencyRateRecord, InstrumentCode};

use crate::error::{StoreError, StoreResult};
use crate::store::RecordStore;

/// Record store backed by a vector, with a switch to simulate an outage.
pub struct MemoryRecordStore {
    records: RwLock<Vec<CurrencyRateRecord>>,
    available: AtomicBool,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a store holding the given records.
    pub fn with_records(records: Vec<CurrencyRateRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(CurrencyRateRecord::trimmed).collect()),
            available: AtomicBool::new(true),
        }
    }

    /// Add a record.
    pub fn insert(&self, record: CurrencyRateRecord) {
        self.records.write().push(record.trimmed());
    }

    /// Make every call fail with [`StoreError::Unavailable`] until re-enabled.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store disabled".to_string()))
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(
        &self,
        instrument: Option<&InstrumentCode>,
    ) -> StoreResult<Vec<CurrencyRateRecord>> {
        self.check_available()?;
        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|r| instrument.map_or(true, |code| r.instrument_code == code.as_str()))
            .cloned()
            .collect())
    }

    async fn latest(&self) -> StoreResult<Option<CurrencyRateRecord>> {
        self.check_available()?;
        let records = self.records.read();
        Ok(records
            .iter()
            .max_by(|a, b| a.timestamp_value.cmp(&b.timestamp_value))
            .cloned())
    }

    async fn find(&self, instrument: &InstrumentCode) -> StoreResult<Option<CurrencyRateRecord>> {
        self.check_available()?;
        let records = self.records.read();
        Ok(records
            .iter()
            .find(|r| r.instrument_code == instrument.as_str())
            .cloned())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }
}
