//! The orchestrating pattern-match algorithm.
//!
//! Given a source pair and its candles, extract the trailing window, normalize
//! it, score it against the trailing window of every other pair the store
//! knows, and return the top-N matches sorted by similarity. Candidates are
//! fetched and scored concurrently under a bounded permit count; any failure
//! while fetching or processing a single candidate skips that candidate and
//! never aborts the search.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::pattern::{normalize, pearson, trailing_window};
use crate::{Candle, PairCode, SeriesStore, StoreError};

pub const DEFAULT_NUM_CANDLES: usize = 20;
pub const DEFAULT_TOP_N: usize = 5;
const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Errors surfaced to the caller of [`PatternMatcher::find_similar_patterns`].
///
/// Everything else (unknown candidate, short history, store hiccup on one
/// pair) degrades to fewer results.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid match query: {reason}")]
    InvalidQuery { reason: String },

    /// Pair enumeration failed; the search cannot proceed at all.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MatchError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }
}

/// Validated pattern-match request.
///
/// Construction rejects empty source data and zero window/result counts, so
/// the algorithm itself never sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pair: PairCode,
    candles: Vec<Candle>,
    num_candles: usize,
    top_n: usize,
}

impl MatchQuery {
    pub fn new(pair: PairCode, candles: Vec<Candle>) -> Result<Self, MatchError> {
        if candles.is_empty() {
            return Err(MatchError::invalid("source candles must not be empty"));
        }
        Ok(Self {
            pair,
            candles,
            num_candles: DEFAULT_NUM_CANDLES,
            top_n: DEFAULT_TOP_N,
        })
    }

    pub fn with_num_candles(mut self, num_candles: usize) -> Result<Self, MatchError> {
        if num_candles == 0 {
            return Err(MatchError::invalid("num_candles must be greater than zero"));
        }
        self.num_candles = num_candles;
        Ok(self)
    }

    pub fn with_top_n(mut self, top_n: usize) -> Result<Self, MatchError> {
        if top_n == 0 {
            return Err(MatchError::invalid("top_n must be greater than zero"));
        }
        self.top_n = top_n;
        Ok(self)
    }

    pub fn pair(&self) -> &PairCode {
        &self.pair
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub const fn num_candles(&self) -> usize {
        self.num_candles
    }

    pub const fn top_n(&self) -> usize {
        self.top_n
    }
}

/// One ranked match: the candidate pair, its similarity to the source
/// pattern, and the raw (non-normalized) window candles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pair: PairCode,
    pub similarity: f64,
    pub candles: Vec<Candle>,
}

/// Scores a source pattern against every other pair in a [`SeriesStore`].
#[derive(Clone)]
pub struct PatternMatcher {
    store: Arc<dyn SeriesStore>,
    max_in_flight: usize,
}

impl PatternMatcher {
    pub fn new(store: Arc<dyn SeriesStore>) -> Self {
        Self {
            store,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Bound the number of candidate fetches in flight at once.
    #[must_use]
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Find the pairs whose trailing price shape best matches the query's.
    ///
    /// Returns at most `top_n` matches sorted by similarity descending; ties
    /// keep the order the store enumerated the candidates in. Candidates with
    /// fewer candles than the source window are excluded, as is the source
    /// pair itself.
    ///
    /// # Errors
    ///
    /// Fails only when pair enumeration fails; per-candidate fetch errors are
    /// skips.
    pub async fn find_similar_patterns(
        &self,
        query: &MatchQuery,
    ) -> Result<Vec<PatternMatch>, MatchError> {
        let window = trailing_window(query.candles(), query.num_candles());
        if window.is_empty() {
            return Ok(Vec::new());
        }

        let closes: Vec<f64> = window.iter().map(|candle| candle.close).collect();
        let window_len = closes.len();
        let source_pattern = Arc::new(normalize(&closes));

        let pairs = self.store.list_pairs().await?;

        let limiter = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks: JoinSet<Option<(usize, PatternMatch)>> = JoinSet::new();
        for (index, pair) in pairs
            .into_iter()
            .filter(|candidate| candidate != query.pair())
            .enumerate()
        {
            let store = Arc::clone(&self.store);
            let pattern = Arc::clone(&source_pattern);
            let limiter = Arc::clone(&limiter);
            tasks.spawn(async move {
                let _permit = limiter.acquire_owned().await.ok()?;
                score_candidate(store.as_ref(), pair, &pattern, window_len)
                    .await
                    .map(|matched| (index, matched))
            });
        }

        let mut scored = Vec::new();
        while let Some(outcome) = tasks.join_next().await {
            // A panicked candidate task counts as a per-candidate failure: skip.
            if let Ok(Some(entry)) = outcome {
                scored.push(entry);
            }
        }

        scored.sort_by(|(left_index, left), (right_index, right)| {
            right
                .similarity
                .total_cmp(&left.similarity)
                .then(left_index.cmp(right_index))
        });

        Ok(scored
            .into_iter()
            .take(query.top_n())
            .map(|(_, matched)| matched)
            .collect())
    }
}

/// Fetch, window, normalize, and score one candidate. `None` means "skip":
/// fetch failed, or the candidate has less history than the source window.
async fn score_candidate(
    store: &dyn SeriesStore,
    pair: PairCode,
    source_pattern: &[f64],
    window_len: usize,
) -> Option<PatternMatch> {
    let candles = store.fetch_candles(pair.clone(), None).await.ok()?;
    if candles.len() < window_len {
        return None;
    }

    let window = trailing_window(&candles, window_len);
    let closes: Vec<f64> = window.iter().map(|candle| candle.close).collect();
    let candidate_pattern = normalize(&closes);
    let similarity = pearson(source_pattern, &candidate_pattern);

    Some(PatternMatch {
        pair,
        similarity,
        candles: window.to_vec(),
    })
}
