mod candles;
mod ingest;
mod pairs;
mod pattern_match;

use serde_json::Value;

use pairscan_store::CandleStore;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let store = CandleStore::open_default()?;

    match &cli.command {
        Command::Pairs => pairs::run(&store),
        Command::Candles(args) => candles::run(&store, args),
        Command::Match(args) => pattern_match::run(store, args).await,
        Command::Ingest(args) => ingest::run(&store, args),
    }
}
