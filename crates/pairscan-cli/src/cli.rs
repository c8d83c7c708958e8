use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use pairscan_core::{DEFAULT_NUM_CANDLES, DEFAULT_TOP_N};

#[derive(Debug, Parser)]
#[command(
    name = "pairscan",
    version,
    about = "Currency-pair price history and pattern-similarity search"
)]
pub struct Cli {
    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every pair the store has candles for.
    Pairs,
    /// Dump one day of candles for a pair.
    Candles(CandlesArgs),
    /// Rank other pairs by similarity to a pair's recent price shape.
    Match(MatchArgs),
    /// Load candles for a pair from a JSON file.
    Ingest(IngestArgs),
}

#[derive(Debug, Args)]
pub struct CandlesArgs {
    /// Pair code, e.g. EURUSD.
    pub pair: String,

    /// Day filter (YYYY-MM-DD); defaults to the most recent day with data.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Source pair code, e.g. EURUSD.
    pub pair: String,

    /// Day to take the source window from; defaults to the most recent day.
    #[arg(long)]
    pub date: Option<String>,

    /// Trailing window length.
    #[arg(long, default_value_t = DEFAULT_NUM_CANDLES)]
    pub num_candles: usize,

    /// Number of matches to return.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Pair code the candles belong to.
    pub pair: String,

    /// Path to a JSON array of candles.
    pub file: PathBuf,
}
