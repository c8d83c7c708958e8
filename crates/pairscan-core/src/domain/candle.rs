use serde::{Deserialize, Serialize};

use crate::{PairCode, UtcTime, ValidationError};

/// OHLCV candle for one time bucket. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub ts: UtcTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    pub fn new(
        ts: UtcTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidCandleRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidCandleBounds);
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// One pair's candle sequence, sorted by timestamp ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    pub pair: PairCode,
    pub candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(pair: PairCode, candles: Vec<Candle>) -> Self {
        Self { pair, candles }
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> UtcTime {
        UtcTime::parse("2021-01-03T22:39:00Z").expect("timestamp")
    }

    #[test]
    fn builds_valid_candle() {
        let candle = Candle::new(ts(), 1.10, 1.12, 1.09, 1.11, 250).expect("candle");
        assert_eq!(candle.close, 1.11);
    }

    #[test]
    fn rejects_high_below_low() {
        let err = Candle::new(ts(), 1.10, 1.08, 1.09, 1.10, 0).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidCandleRange));
    }

    #[test]
    fn rejects_close_outside_range() {
        let err = Candle::new(ts(), 1.10, 1.12, 1.09, 1.15, 0).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidCandleBounds));
    }

    #[test]
    fn rejects_non_finite_price() {
        let err = Candle::new(ts(), f64::NAN, 1.12, 1.09, 1.10, 0).expect_err("must fail");
        assert!(matches!(err, ValidationError::NonFiniteValue { .. }));
    }
}
