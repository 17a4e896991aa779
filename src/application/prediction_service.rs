use super::market_data::PriceFetcher;
use super::ml::ModelRegistry;
use crate::domain::errors::PredictionError;
use crate::domain::ml::{FeatureRow, PredictionResult};
use std::sync::Arc;
use tracing::debug;

/// Live price in, one prediction per loaded model out.
#[derive(Clone)]
pub struct PredictionService {
    fetcher: PriceFetcher,
    registry: Arc<ModelRegistry>,
}

impl PredictionService {
    pub fn new(fetcher: PriceFetcher, registry: Arc<ModelRegistry>) -> Self {
        Self { fetcher, registry }
    }

    /// Fetches a fresh price on every call. The single price is replicated
    /// into all five lag slots before it reaches the models.
    pub async fn predict(&self) -> Result<PredictionResult, PredictionError> {
        let quote = self.fetcher.fetch().await?;
        let row = FeatureRow::replicated(quote.price);
        let predictions = self.registry.predict_all(&row)?;
        debug!(
            "PredictionService: {} predictions for price {} from {}",
            predictions.len(),
            quote.price,
            quote.source
        );

        Ok(PredictionResult {
            predictions,
            latest_price: quote.price,
            fallback_used: quote.fallback_used,
            source: quote.source,
        })
    }
}
