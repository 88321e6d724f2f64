//! Append-only snapshot history store
//!
//! One SQLite table holds a sparse time series: a row is appended per
//! (symbol, currency) only when a tracked field actually changed since the
//! last persisted row - never one row per poll, never an update in place.

use crate::{
    constants::CHANGE_TOLERANCE,
    currency::CurrencyList,
    error::StoreError,
    types::{Asset, CurrencyMetrics},
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;
use std::path::Path;

/// One persisted snapshot row
#[derive(Debug, Clone, FromRow)]
pub struct SnapshotRow {
    pub id: i64,
    pub rank: Option<i64>,
    pub symbol: String,
    pub name: String,
    pub price: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
    pub volume_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
}

/// SQLite-backed store for change-detected snapshots
pub struct SnapshotStore {
    pool: SqlitePool,
}

impl SnapshotStore {
    /// Opens (creating if missing) the database at `path` and ensures the
    /// schema exists
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Opens an in-memory database, used by tests
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        // a single connection keeps every query on the same memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Idempotent schema creation; no migrations exist
    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                "rank" INTEGER,
                symbol TEXT NOT NULL,
                name TEXT NOT NULL,
                price REAL,
                percent_change_24h REAL,
                percent_change_7d REAL,
                volume_24h REAL,
                circulating_supply REAL,
                currency TEXT NOT NULL,
                timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Most recent persisted row for a (symbol, currency) pair
    pub async fn latest(
        &self,
        symbol: &str,
        currency: &str,
    ) -> Result<Option<SnapshotRow>, StoreError> {
        let row = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT id, "rank", symbol, name, price, percent_change_24h,
                   percent_change_7d, volume_24h, circulating_supply,
                   currency, timestamp
            FROM snapshots
            WHERE symbol = ? AND currency = ?
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(symbol)
        .bind(currency)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Persists changed snapshots for every asset and requested currency
    ///
    /// Currencies absent from an asset's metrics (a fetch failed this cycle)
    /// are skipped. Returns the number of rows inserted.
    pub async fn persist(
        &self,
        assets: &HashMap<String, Asset>,
        currencies: &CurrencyList,
    ) -> Result<u64, StoreError> {
        let mut inserted = 0;

        for asset in assets.values() {
            for currency in currencies.iter() {
                let Some(metrics) = asset.metrics.get(currency) else {
                    tracing::debug!(
                        symbol = %asset.symbol,
                        currency = %currency,
                        "no metrics this cycle, skipping persist"
                    );
                    continue;
                };

                let changed = match self.latest(&asset.symbol, currency).await? {
                    None => true,
                    Some(prev) => snapshot_differs(&prev, asset, metrics),
                };

                if changed {
                    self.insert(asset, metrics, currency).await?;
                    inserted += 1;
                }
            }
        }

        if inserted > 0 {
            tracing::info!(rows = inserted, "persisted changed snapshots");
        }
        Ok(inserted)
    }

    async fn insert(
        &self,
        asset: &Asset,
        metrics: &CurrencyMetrics,
        currency: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO snapshots
                ("rank", symbol, name, price, percent_change_24h,
                 percent_change_7d, volume_24h, circulating_supply,
                 currency, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(asset.rank)
        .bind(&asset.symbol)
        .bind(&asset.name)
        .bind(metrics.price)
        .bind(metrics.percent_change_24h)
        .bind(metrics.percent_change_7d)
        .bind(metrics.volume_24h)
        .bind(asset.circulating_supply())
        .bind(currency)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Total persisted row count
    pub async fn row_count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM snapshots")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Whether the fresh snapshot differs from the last persisted row
///
/// Numeric metric fields compare with an absolute tolerance; rank, name and
/// circulating supply compare exactly.
fn snapshot_differs(prev: &SnapshotRow, asset: &Asset, metrics: &CurrencyMetrics) -> bool {
    prev.rank != asset.rank
        || prev.name != asset.name
        || tolerant_differs(prev.price, metrics.price)
        || tolerant_differs(prev.percent_change_24h, metrics.percent_change_24h)
        || tolerant_differs(prev.percent_change_7d, metrics.percent_change_7d)
        || tolerant_differs(prev.volume_24h, metrics.volume_24h)
        || prev.circulating_supply != asset.circulating_supply()
}

fn tolerant_differs(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() > CHANGE_TOLERANCE,
        (None, None) => false,
        _ => true,
    }
}
