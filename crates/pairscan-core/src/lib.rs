//! # pairscan-core
//!
//! Domain types and the pattern-similarity search for pairscan.
//!
//! The crate has three parts:
//!
//! - **Domain models**: validated [`PairCode`], [`UtcTime`], [`Candle`], and
//!   [`CandleSeries`].
//! - **Store contract**: the [`SeriesStore`] trait the matcher consumes —
//!   enumerate pairs, fetch one day of candles per pair. Concrete stores live
//!   elsewhere (`pairscan-store`); tests inject in-memory fakes.
//! - **Pattern matcher**: [`PatternMatcher`] normalizes the trailing window of
//!   a source series and ranks every other pair by Pearson correlation of its
//!   own normalized trailing window.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pairscan_core::{MatchQuery, PairCode, PatternMatcher};
//!
//! async fn run(
//!     store: Arc<dyn pairscan_core::SeriesStore>,
//! ) -> Result<(), Box<dyn std::error::Error>> {
//!     let matcher = PatternMatcher::new(store);
//!     let query = MatchQuery::new(PairCode::parse("EURUSD")?, candles)?;
//!     for matched in matcher.find_similar_patterns(&query).await? {
//!         println!("{}: {:.4}", matched.pair, matched.similarity);
//!     }
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod error;
pub mod pattern;
pub mod series_store;

pub use domain::{parse_day, Candle, CandleSeries, PairCode, UtcTime};
pub use error::ValidationError;
pub use pattern::{
    normalize, pearson, trailing_window, MatchError, MatchQuery, PatternMatch, PatternMatcher,
    DEFAULT_NUM_CANDLES, DEFAULT_TOP_N,
};
pub use series_store::{SeriesStore, StoreError, StoreErrorKind};
