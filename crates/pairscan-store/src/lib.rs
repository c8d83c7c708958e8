//! # pairscan-store
//!
//! DuckDB-backed candle storage for pairscan.
//!
//! One table holds every pair's candles:
//!
//! | Column | Type |
//! |--------|------|
//! | `pair` | VARCHAR, 6-letter pair code |
//! | `ts` | TIMESTAMP |
//! | `open`/`high`/`low`/`close` | DOUBLE |
//! | `volume` | BIGINT |
//!
//! keyed on `(pair, ts)`. All user-provided values travel through
//! parameterized queries. [`CandleStore`] implements the core
//! [`SeriesStore`] contract by dispatching the blocking DuckDB calls through
//! `tokio::task::spawn_blocking`.

pub mod pool;

use std::env;
use std::fs;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use duckdb::{Connection, ToSql};
use time::Date;
use tokio::task;

use pairscan_core::{Candle, PairCode, SeriesStore, StoreError, UtcTime};

pub use pool::{ConnectionPool, PooledConnection};

/// Configuration for the candle store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for pairscan data.
    pub home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Idle connections to keep pooled.
    pub max_idle_connections: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let home = resolve_pairscan_home();
        let db_path = home.join("candles.duckdb");
        Self {
            home,
            db_path,
            max_idle_connections: 4,
        }
    }
}

/// Candle storage over a pooled `DuckDB` database.
#[derive(Clone)]
pub struct CandleStore {
    pool: ConnectionPool,
}

impl CandleStore {
    /// Open a store with default configuration (`PAIRSCAN_HOME`).
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(StoreConfig::default())
    }

    /// Open a store, creating the database file and schema as needed.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|error| StoreError::unavailable(error.to_string()))?;
        }

        let pool = ConnectionPool::new(config.db_path, config.max_idle_connections);
        let store = Self { pool };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<(), StoreError> {
        let connection = self.acquire()?;
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS candles (
                    pair VARCHAR NOT NULL,
                    ts TIMESTAMP NOT NULL,
                    open DOUBLE NOT NULL,
                    high DOUBLE NOT NULL,
                    low DOUBLE NOT NULL,
                    close DOUBLE NOT NULL,
                    volume BIGINT NOT NULL,
                    PRIMARY KEY (pair, ts)
                )",
            )
            .map_err(from_duckdb)?;
        Ok(())
    }

    fn acquire(&self) -> Result<PooledConnection, StoreError> {
        self.pool.acquire().map_err(from_duckdb)
    }

    /// Every pair with at least one recorded candle, sorted by code.
    pub fn list_pairs(&self) -> Result<Vec<PairCode>, StoreError> {
        let connection = self.acquire()?;
        let mut statement = connection
            .prepare("SELECT DISTINCT pair FROM candles ORDER BY pair")
            .map_err(from_duckdb)?;
        let mut rows = statement.query([]).map_err(from_duckdb)?;

        let mut pairs = Vec::new();
        while let Some(row) = rows.next().map_err(from_duckdb)? {
            let code: String = row.get(0).map_err(from_duckdb)?;
            let pair = PairCode::parse(&code).map_err(|error| {
                StoreError::internal(format!("corrupt pair code '{code}': {error}"))
            })?;
            pairs.push(pair);
        }
        Ok(pairs)
    }

    /// One day of candles for a pair, timestamp ascending.
    ///
    /// With `day: None` the most recent day that has data for this pair is
    /// used; an unknown pair is a `NotFound` error. An explicit day with no
    /// rows yields an empty vector.
    pub fn candles_for_day(
        &self,
        pair: &PairCode,
        day: Option<Date>,
    ) -> Result<Vec<Candle>, StoreError> {
        let connection = self.acquire()?;
        let day = match day {
            Some(day) => day.to_string(),
            None => most_recent_day(&connection, pair)?,
        };

        let mut statement = connection
            .prepare(
                "SELECT strftime(ts, '%Y-%m-%dT%H:%M:%SZ'), open, high, low, close, volume \
                 FROM candles \
                 WHERE pair = ? AND CAST(ts AS DATE) = CAST(? AS DATE) \
                 ORDER BY ts",
            )
            .map_err(from_duckdb)?;

        let code = pair.as_str().to_owned();
        let params: [&dyn ToSql; 2] = [&code, &day];
        let mut rows = statement.query(params.as_slice()).map_err(from_duckdb)?;

        let mut candles = Vec::new();
        while let Some(row) = rows.next().map_err(from_duckdb)? {
            let ts_raw: String = row.get(0).map_err(from_duckdb)?;
            let open: f64 = row.get(1).map_err(from_duckdb)?;
            let high: f64 = row.get(2).map_err(from_duckdb)?;
            let low: f64 = row.get(3).map_err(from_duckdb)?;
            let close: f64 = row.get(4).map_err(from_duckdb)?;
            let volume: i64 = row.get(5).map_err(from_duckdb)?;

            let ts = UtcTime::parse(&ts_raw).map_err(|error| {
                StoreError::internal(format!("corrupt timestamp '{ts_raw}': {error}"))
            })?;
            let candle = Candle::new(ts, open, high, low, close, volume.max(0) as u64)
                .map_err(|error| {
                    StoreError::internal(format!("corrupt candle for '{pair}' at {ts_raw}: {error}"))
                })?;
            candles.push(candle);
        }
        Ok(candles)
    }

    /// Upsert candles for a pair in one transaction. Returns the row count.
    pub fn ingest_candles(
        &self,
        pair: &PairCode,
        candles: &[Candle],
    ) -> Result<usize, StoreError> {
        if candles.is_empty() {
            return Ok(0);
        }

        let connection = self.acquire()?;
        connection
            .execute_batch("BEGIN TRANSACTION")
            .map_err(from_duckdb)?;
        let result = (|| -> Result<usize, StoreError> {
            let code = pair.as_str().to_owned();
            for candle in candles {
                let ts = candle.ts.format_rfc3339();
                let volume = i64::try_from(candle.volume).map_err(|_| {
                    StoreError::invalid_request(format!(
                        "volume {} exceeds the supported range",
                        candle.volume
                    ))
                })?;
                let params: [&dyn ToSql; 7] = [
                    &code,
                    &ts,
                    &candle.open,
                    &candle.high,
                    &candle.low,
                    &candle.close,
                    &volume,
                ];
                connection
                    .execute(
                        "INSERT OR REPLACE INTO candles \
                         (pair, ts, open, high, low, close, volume) \
                         VALUES (?, TRY_CAST(? AS TIMESTAMP), ?, ?, ?, ?, ?)",
                        params.as_slice(),
                    )
                    .map_err(from_duckdb)?;
            }
            Ok(candles.len())
        })();

        finalize_transaction(&connection, result)
    }
}

impl SeriesStore for CandleStore {
    fn list_pairs<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PairCode>, StoreError>> + Send + 'a>> {
        let store = self.clone();
        Box::pin(async move {
            task::spawn_blocking(move || store.list_pairs())
                .await
                .map_err(worker_failed)?
        })
    }

    fn fetch_candles<'a>(
        &'a self,
        pair: PairCode,
        day: Option<Date>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Candle>, StoreError>> + Send + 'a>> {
        let store = self.clone();
        Box::pin(async move {
            task::spawn_blocking(move || store.candles_for_day(&pair, day))
                .await
                .map_err(worker_failed)?
        })
    }
}

/// The most recent calendar day with data for a pair, as `YYYY-MM-DD`.
fn most_recent_day(connection: &Connection, pair: &PairCode) -> Result<String, StoreError> {
    let code = pair.as_str().to_owned();
    let params: [&dyn ToSql; 1] = [&code];
    let day: Option<String> = connection
        .query_row(
            "SELECT CAST(CAST(MAX(ts) AS DATE) AS VARCHAR) FROM candles WHERE pair = ?",
            params.as_slice(),
            |row| row.get(0),
        )
        .map_err(from_duckdb)?;

    day.ok_or_else(|| StoreError::not_found(pair))
}

/// Commit on success, roll back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT").map_err(from_duckdb)?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

fn from_duckdb(error: duckdb::Error) -> StoreError {
    StoreError::unavailable(error.to_string())
}

fn worker_failed(error: task::JoinError) -> StoreError {
    StoreError::internal(format!("store worker failed: {error}"))
}

/// Resolve the pairscan home directory from the environment or default.
fn resolve_pairscan_home() -> PathBuf {
    if let Some(path) = env::var_os("PAIRSCAN_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".pairscan");
    }

    PathBuf::from(".pairscan")
}
