use std::env;

use pairscan_store::CandleStore;
use pairscan_web::{build_router, AppState};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = CandleStore::open_default()?;
    let state = AppState::new(store);

    let addr = env::var("PAIRSCAN_ADDR").unwrap_or_else(|_| String::from("0.0.0.0:5000"));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    println!("pairscan web listening on {addr}");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
