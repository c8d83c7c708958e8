//! # pairscan-web
//!
//! JSON HTTP API over the candle store and pattern matcher.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /api/pairs` | All known currency pairs |
//! | `GET /api/price-data/{pair}?date=YYYY-MM-DD` | One day of candles (most recent day when `date` is omitted) |
//! | `POST /api/pattern-match` | Rank other pairs by similarity to the posted pattern |
//!
//! Failures map to `400` (invalid input), `404` (unknown pair), and `500`
//! (store unavailable); everything else degrades to fewer or zero results.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::CorsLayer;

use pairscan_core::{
    parse_day, Candle, CandleSeries, MatchError, MatchQuery, PairCode, PatternMatch,
    PatternMatcher, SeriesStore, StoreError, StoreErrorKind, ValidationError,
};
use pairscan_store::CandleStore;

/// Shared handler state: the store (behind the core trait) and a matcher
/// over it.
#[derive(Clone)]
pub struct AppState {
    series: Arc<dyn SeriesStore>,
    matcher: PatternMatcher,
}

impl AppState {
    pub fn new(store: CandleStore) -> Self {
        let series: Arc<dyn SeriesStore> = Arc::new(store);
        let matcher = PatternMatcher::new(Arc::clone(&series));
        Self { series, matcher }
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/pairs", get(list_pairs))
        .route("/api/price-data/:pair", get(price_data))
        .route("/api/pattern-match", post(pattern_match))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API error with its HTTP status mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unavailable(String),
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error.kind() {
            StoreErrorKind::NotFound => Self::NotFound(error.to_string()),
            StoreErrorKind::InvalidRequest => Self::BadRequest(error.to_string()),
            _ => Self::Unavailable(error.to_string()),
        }
    }
}

impl From<MatchError> for ApiError {
    fn from(error: MatchError) -> Self {
        match error {
            MatchError::InvalidQuery { .. } => Self::BadRequest(error.to_string()),
            MatchError::Store(store) => store.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct PairsResponse {
    pairs: Vec<PairCode>,
}

#[derive(Debug, Deserialize)]
struct PriceDataParams {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PatternMatchRequest {
    ccy_pair: Option<String>,
    price_data: Option<Vec<Candle>>,
    num_candles: Option<usize>,
    top_n: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MatchesResponse {
    matches: Vec<PatternMatch>,
}

async fn list_pairs(State(state): State<AppState>) -> Result<Json<PairsResponse>, ApiError> {
    let pairs = state.series.list_pairs().await?;
    Ok(Json(PairsResponse { pairs }))
}

async fn price_data(
    State(state): State<AppState>,
    Path(pair): Path<String>,
    Query(params): Query<PriceDataParams>,
) -> Result<Json<CandleSeries>, ApiError> {
    let pair = PairCode::parse(&pair)?;
    let day = params.date.as_deref().map(parse_day).transpose()?;

    let candles = state.series.fetch_candles(pair.clone(), day).await?;
    Ok(Json(CandleSeries::new(pair, candles)))
}

async fn pattern_match(
    State(state): State<AppState>,
    Json(request): Json<PatternMatchRequest>,
) -> Result<Json<MatchesResponse>, ApiError> {
    let missing = || ApiError::BadRequest(String::from("missing ccy_pair or price_data"));

    let ccy_pair = request
        .ccy_pair
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(missing)?;
    let price_data = request
        .price_data
        .filter(|candles| !candles.is_empty())
        .ok_or_else(missing)?;

    let pair = PairCode::parse(&ccy_pair)?;
    let mut query = MatchQuery::new(pair, price_data)?;
    if let Some(num_candles) = request.num_candles {
        query = query.with_num_candles(num_candles)?;
    }
    if let Some(top_n) = request.top_n {
        query = query.with_top_n(top_n)?;
    }

    let matches = state.matcher.find_similar_patterns(&query).await?;
    Ok(Json(MatchesResponse { matches }))
}
