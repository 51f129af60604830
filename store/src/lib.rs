//! MonedaValor Record Store
//!
//! Read-only access to the currency-rate table. The [`RecordStore`] trait is
//! what the HTTP layer depends on; [`PgRecordStore`] backs it with a bounded
//! `sqlx` connection pool.

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;
pub mod store;
pub mod table;

pub use error::{StoreError, StoreResult};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryRecordStore;
pub use postgres::{PgRecordStore, PoolSettings};
pub use store::{RecordStore, SharedRecordStore};
pub use table::TableName;
