use serde_json::Value;

use pairscan_store::CandleStore;

use crate::error::CliError;

pub fn run(store: &CandleStore) -> Result<Value, CliError> {
    let pairs = store.list_pairs()?;
    Ok(serde_json::to_value(pairs)?)
}
