use crate::domain::errors::DatasetError;
use crate::domain::market::PriceSample;
use crate::domain::ports::PriceSource;
use crate::infrastructure::persistence::csv_store;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Polls a price source at a fixed pace and records the successful fetches.
pub struct PriceSampler {
    source: Arc<dyn PriceSource>,
    count: usize,
    interval: Duration,
}

impl PriceSampler {
    pub fn new(source: Arc<dyn PriceSource>, count: usize, interval: Duration) -> Self {
        Self {
            source,
            count,
            interval,
        }
    }

    /// Performs exactly `count` fetches, one at a time, pausing `interval`
    /// after each. Failed fetches are skipped.
    pub async fn collect_samples(&self) -> Vec<PriceSample> {
        let mut samples = Vec::with_capacity(self.count);
        for attempt in 1..=self.count {
            match self.source.fetch_price().await {
                Ok(price) => {
                    info!(
                        "Sampler: [{}/{}] {} = {}",
                        attempt,
                        self.count,
                        self.source.name(),
                        price
                    );
                    samples.push(PriceSample::now(price));
                }
                Err(e) => warn!("Sampler: [{}/{}] skipped: {}", attempt, self.count, e),
            }
            tokio::time::sleep(self.interval).await;
        }
        samples
    }

    /// Collects and overwrites `path`. Nothing is written when no fetch
    /// succeeded.
    pub async fn run(&self, path: &Path) -> Result<usize, DatasetError> {
        let samples = self.collect_samples().await;
        persist(&samples, path)?;
        Ok(samples.len())
    }
}

pub fn persist(samples: &[PriceSample], path: &Path) -> Result<(), DatasetError> {
    if samples.is_empty() {
        return Err(DatasetError::EmptyDataset);
    }
    csv_store::write_price_samples(path, samples)
}
