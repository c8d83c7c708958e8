//! Series store contract.
//!
//! The pattern matcher never talks to a database directly; it consumes a
//! [`SeriesStore`] capability with exactly two operations: enumerate the known
//! pairs, and fetch one day of candles for a pair. Implementations must be
//! `Send + Sync` so the matcher can score candidates concurrently.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use time::Date;

use crate::{Candle, PairCode};

/// Store-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The backing store cannot be reached or cannot serve the request.
    Unavailable,
    /// The requested pair has no recorded candles.
    NotFound,
    /// The request itself was malformed.
    InvalidRequest,
    Internal,
}

/// Structured store error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    kind: StoreErrorKind,
    message: String,
    retryable: bool,
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn not_found(pair: &PairCode) -> Self {
        Self {
            kind: StoreErrorKind::NotFound,
            message: format!("no candles recorded for pair '{pair}'"),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            StoreErrorKind::Unavailable => "store.unavailable",
            StoreErrorKind::NotFound => "store.not_found",
            StoreErrorKind::InvalidRequest => "store.invalid_request",
            StoreErrorKind::Internal => "store.internal",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for StoreError {}

type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Candle store contract consumed by the pattern matcher.
///
/// `fetch_candles` with `day: None` returns the most recent day with data for
/// that pair; failures there are treated as per-candidate skips by the
/// matcher, while a `list_pairs` failure aborts the whole search.
pub trait SeriesStore: Send + Sync {
    /// Enumerate every pair the store has candles for.
    fn list_pairs<'a>(&'a self) -> StoreFuture<'a, Vec<PairCode>>;

    /// Fetch one day of candles for a pair, in timestamp-ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with kind `NotFound` for unknown pairs and
    /// `Unavailable` when the backing store cannot be reached.
    fn fetch_candles<'a>(&'a self, pair: PairCode, day: Option<Date>) -> StoreFuture<'a, Vec<Candle>>;
}
