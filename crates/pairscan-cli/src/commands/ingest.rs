use std::fs;

use serde_json::Value;

use pairscan_core::{Candle, PairCode};
use pairscan_store::CandleStore;

use crate::cli::IngestArgs;
use crate::error::CliError;

pub fn run(store: &CandleStore, args: &IngestArgs) -> Result<Value, CliError> {
    let pair = PairCode::parse(&args.pair)?;

    let raw = fs::read_to_string(&args.file)?;
    let candles: Vec<Candle> = serde_json::from_str(&raw)?;
    let ingested = store.ingest_candles(&pair, &candles)?;

    Ok(serde_json::json!({ "pair": pair, "ingested": ingested }))
}
