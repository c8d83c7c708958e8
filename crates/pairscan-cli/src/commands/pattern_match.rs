use std::sync::Arc;

use serde_json::Value;

use pairscan_core::{parse_day, MatchQuery, PairCode, PatternMatcher, SeriesStore};
use pairscan_store::CandleStore;

use crate::cli::MatchArgs;
use crate::error::CliError;

pub async fn run(store: CandleStore, args: &MatchArgs) -> Result<Value, CliError> {
    let pair = PairCode::parse(&args.pair)?;
    let day = args.date.as_deref().map(parse_day).transpose()?;

    let source = store.candles_for_day(&pair, day)?;
    let query = MatchQuery::new(pair, source)?
        .with_num_candles(args.num_candles)?
        .with_top_n(args.top_n)?;

    let series: Arc<dyn SeriesStore> = Arc::new(store);
    let matcher = PatternMatcher::new(series);
    let matches = matcher.find_similar_patterns(&query).await?;
    Ok(serde_json::to_value(matches)?)
}
