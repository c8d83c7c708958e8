use serde_json::Value;

use pairscan_core::{parse_day, CandleSeries, PairCode};
use pairscan_store::CandleStore;

use crate::cli::CandlesArgs;
use crate::error::CliError;

pub fn run(store: &CandleStore, args: &CandlesArgs) -> Result<Value, CliError> {
    let pair = PairCode::parse(&args.pair)?;
    let day = args.date.as_deref().map(parse_day).transpose()?;

    let candles = store.candles_for_day(&pair, day)?;
    Ok(serde_json::to_value(CandleSeries::new(pair, candles))?)
}
