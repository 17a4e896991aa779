//! Builds the lag-feature CSV from the price CSV.

use anyhow::{Context, Result};
use clap::Parser;
use pricecast::application::ml::build_feature_records;
use pricecast::config::Config;
use pricecast::infrastructure::persistence::csv_store;
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Price CSV to read (default: DATA_DIR/PRICES_FILE)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Feature CSV to write (default: DATA_DIR/FEATURES_FILE)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let input = args.input.unwrap_or_else(|| config.storage.prices_path());
    let output = args.output.unwrap_or_else(|| config.storage.features_path());

    let samples = csv_store::read_price_samples(&input)
        .with_context(|| format!("Failed to read prices from {:?}", input))?;
    let records = build_feature_records(&samples);
    info!(
        "{} samples -> {} feature rows",
        samples.len(),
        records.len()
    );
    if records.is_empty() {
        warn!("Fewer than 6 samples; the feature file will only hold a header");
    }

    csv_store::write_feature_records(&output, &records)
        .with_context(|| format!("Failed to write features to {:?}", output))?;
    Ok(())
}
