//! Samples the configured upstream and writes the price CSV.
//!
//! ```sh
//! cargo run --bin fetch_prices -- --count 10 --interval-secs 5
//! ```

use anyhow::Result;
use clap::Parser;
use pricecast::application::market_data::PriceSampler;
use pricecast::config::Config;
use pricecast::domain::errors::DatasetError;
use pricecast::infrastructure::ServiceFactory;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output CSV (default: DATA_DIR/PRICES_FILE)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of fetches (default: SAMPLE_COUNT)
    #[arg(long)]
    count: Option<usize>,

    /// Seconds to wait after each fetch (default: SAMPLE_INTERVAL_SECS)
    #[arg(long)]
    interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let output = args.output.unwrap_or_else(|| config.storage.prices_path());
    let count = args.count.unwrap_or(config.sampler.count);
    let interval = args
        .interval_secs
        .map(Duration::from_secs)
        .unwrap_or(config.sampler.interval);

    info!(
        "Sampling {} prices every {:?} into {:?}",
        count, interval, output
    );
    let sampler = PriceSampler::new(
        ServiceFactory::create_price_source(&config.source),
        count,
        interval,
    );

    match sampler.run(&output).await {
        Ok(n) => info!("Done: {} of {} fetches succeeded", n, count),
        Err(DatasetError::EmptyDataset) => {
            warn!("No prices collected; {:?} left untouched", output)
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
