use crate::domain::errors::PriceSourceError;
use async_trait::async_trait;

/// A single upstream quoting a spot price.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// One request to the upstream, no retry and no caching.
    async fn fetch_price(&self) -> Result<f64, PriceSourceError>;

    /// Short identifier used in logs and responses
    fn name(&self) -> &str;
}
