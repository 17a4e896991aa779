//! Pricecast Server - HTTP prediction API
//!
//! Loads the six trained models from `MODELS_DIR` once, then serves
//! predictions on the live price fetched per request.
//!
//! # Usage
//! ```sh
//! PRICE_SOURCE=binance SERVER_PORT=8000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `FETCH_FAILURE_POLICY` - `fallback` (default) or `fail`
//! - `MODELS_DIR` - Directory of `{Name}.json` artifacts (default: models)

use anyhow::{Context, Result};
use pricecast::application::PredictionService;
use pricecast::application::ml::ModelRegistry;
use pricecast::config::Config;
use pricecast::infrastructure::{ModelStore, ServiceFactory};
use pricecast::interfaces::{AppState, create_router};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Pricecast Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Source={:?}, Policy={:?}, Models={:?}",
        config.source.kind, config.source.failure_policy, config.storage.models_dir
    );

    let store = ModelStore::new(&config.storage.models_dir);
    let registry = ModelRegistry::load(&store)
        .with_context(|| format!("Failed to load models from {:?}", store.dir()))?;
    info!("{} models ready", registry.algorithms().count());

    let service = PredictionService::new(
        ServiceFactory::create_price_fetcher(&config.source),
        Arc::new(registry),
    );
    let state = Arc::new(AppState {
        service,
        metrics_path: store.metrics_path(),
    });

    let addr = config.server.socket_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received. Exiting...");
        })
        .await?;

    Ok(())
}
