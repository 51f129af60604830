//! Postgres-backed record store.

use std::time::Duration;

use async_trait::async_trait;
use ratefeed_common::{CurrencyRateRecord, InstrumentCode};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{debug, info, instrument};

use crate::error::StoreResult;
use crate::store::RecordStore;
use crate::table::TableName;

/// Connection pool limits.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// Connections kept open while idle.
    pub min_connections: u32,
    /// How long a request waits for a free connection.
    pub acquire_timeout: Duration,
    /// Idle connections are closed after this long.
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

/// Column list shared by every query, in [`RateRow`] order.
const COLUMNS: &str = "ssinstrumnt, mifeedname, ratetype, timestamp_valor, currency";

#[derive(Debug, sqlx::FromRow)]
struct RateRow {
    ssinstrumnt: String,
    mifeedname: String,
    ratetype: String,
    timestamp_valor: String,
    currency: String,
}

impl From<RateRow> for CurrencyRateRecord {
    fn from(row: RateRow) -> Self {
        CurrencyRateRecord::new(
            row.ssinstrumnt,
            row.mifeedname,
            row.ratetype,
            row.timestamp_valor,
            row.currency,
        )
    }
}

/// Record store reading from a Postgres table through a bounded pool.
///
/// Connections are checked with a ping before each checkout and returned to
/// the pool when the query future completes or is dropped.
pub struct PgRecordStore {
    pool: PgPool,
    select_all: String,
    select_by_instrument: String,
    select_latest: String,
}

impl PgRecordStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool, table: &TableName) -> Self {
        Self {
            pool,
            select_all: format!("SELECT {COLUMNS} FROM {table}"),
            select_by_instrument: format!("SELECT {COLUMNS} FROM {table} WHERE ssinstrumnt = $1"),
            select_latest: format!(
                "SELECT {COLUMNS} FROM {table} ORDER BY timestamp_valor DESC LIMIT 1"
            ),
        }
    }

    /// Build a lazily connecting pool. No connection is opened until the
    /// first query, so the service can start while the database is down.
    pub fn connect_lazy(
        options: PgConnectOptions,
        settings: &PoolSettings,
        table: &TableName,
    ) -> Self {
        info!(
            table = %table,
            max_connections = settings.max_connections,
            acquire_timeout_ms = settings.acquire_timeout.as_millis() as u64,
            "Creating database pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .idle_timeout(Some(settings.idle_timeout))
            .test_before_acquire(true)
            .connect_lazy_with(options);

        Self::new(pool, table)
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    #[instrument(skip(self))]
    async fn list(
        &self,
        instrument: Option<&InstrumentCode>,
    ) -> StoreResult<Vec<CurrencyRateRecord>> {
        let rows: Vec<RateRow> = match instrument {
            Some(code) => {
                sqlx::query_as(&self.select_by_instrument)
                    .bind(code.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => sqlx::query_as(&self.select_all).fetch_all(&self.pool).await?,
        };

        debug!(rows = rows.len(), "Listed rate records");
        Ok(rows.into_iter().map(CurrencyRateRecord::from).collect())
    }

    #[instrument(skip(self))]
    async fn latest(&self) -> StoreResult<Option<CurrencyRateRecord>> {
        let row: Option<RateRow> = sqlx::query_as(&self.select_latest)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(CurrencyRateRecord::from))
    }

    #[instrument(skip(self))]
    async fn find(&self, instrument: &InstrumentCode) -> StoreResult<Option<CurrencyRateRecord>> {
        let row: Option<RateRow> = sqlx::query_as(&self.select_by_instrument)
            .bind(instrument.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(CurrencyRateRecord::from))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
