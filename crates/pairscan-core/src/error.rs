use thiserror::Error;

/// Validation and contract errors exposed by `pairscan-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("pair code cannot be empty")]
    EmptyPair,
    #[error("pair code must be two 3-letter currency legs: '{value}'")]
    InvalidPair { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("day must be YYYY-MM-DD: '{value}'")]
    InvalidDay { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("candle high must be >= low")]
    InvalidCandleRange,
    #[error("candle open/close must be within high/low range")]
    InvalidCandleBounds,
}
