//! Trains all six regressors on the feature CSV and writes their artifacts.

use anyhow::{Context, Result};
use clap::Parser;
use pricecast::application::ml::{ModelArtifact, ModelTrainer};
use pricecast::config::Config;
use pricecast::domain::ml::feature_record::into_training_set;
use pricecast::infrastructure::ModelStore;
use pricecast::infrastructure::persistence::csv_store;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Feature CSV (default: DATA_DIR/FEATURES_FILE)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Artifact directory (default: MODELS_DIR)
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let input = args.input.unwrap_or_else(|| config.storage.features_path());
    let store = ModelStore::new(
        args.models_dir
            .unwrap_or_else(|| config.storage.models_dir.clone()),
    );

    let records = csv_store::read_feature_records(&input)
        .with_context(|| format!("Failed to read features from {:?}", input))?;
    let (rows, targets) = into_training_set(&records);
    info!("Loaded {} feature rows from {:?}", rows.len(), input);

    let outcome = ModelTrainer::new()
        .train(&rows, &targets)
        .context("Training failed")?;

    let training_rows = outcome.training_rows();
    let model_count = outcome.models.len();
    for model in outcome.models.into_values() {
        store.save(&ModelArtifact::new(model, training_rows))?;
    }
    store.save_report(&outcome.report)?;

    info!(
        "Training complete: {} models in {:?}",
        model_count,
        store.dir()
    );
    Ok(())
}
