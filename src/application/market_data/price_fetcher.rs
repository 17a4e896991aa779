use crate::config::FailurePolicy;
use crate::domain::errors::PriceSourceError;
use crate::domain::ports::PriceSource;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// A price as handed to the prediction path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub price: f64,
    /// True when the upstream failed and `price` is the configured sentinel
    pub fallback_used: bool,
    pub source: String,
}

/// Wraps a [`PriceSource`] with the configured failure policy.
#[derive(Clone)]
pub struct PriceFetcher {
    source: Arc<dyn PriceSource>,
    policy: FailurePolicy,
    fallback_price: f64,
}

impl PriceFetcher {
    pub fn new(source: Arc<dyn PriceSource>, policy: FailurePolicy, fallback_price: f64) -> Self {
        Self {
            source,
            policy,
            fallback_price,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Never errors under [`FailurePolicy::Fallback`].
    pub async fn fetch(&self) -> Result<PriceQuote, PriceSourceError> {
        match self.source.fetch_price().await {
            Ok(price) => Ok(PriceQuote {
                price,
                fallback_used: false,
                source: self.source.name().to_string(),
            }),
            Err(e) => match self.policy {
                FailurePolicy::Fail => Err(e),
                FailurePolicy::Fallback => {
                    warn!(
                        "PriceFetcher: {} failed ({}), using fallback price {}",
                        self.source.name(),
                        e,
                        self.fallback_price
                    );
                    Ok(PriceQuote {
                        price: self.fallback_price,
                        fallback_used: true,
                        source: self.source.name().to_string(),
                    })
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::MockPriceSource;

    #[tokio::test]
    async fn test_success_passes_price_through() {
        let fetcher = PriceFetcher::new(
            Arc::new(MockPriceSource::fixed(64_000.5)),
            FailurePolicy::Fallback,
            0.0,
        );
        let quote = fetcher.fetch().await.unwrap();
        assert_eq!(quote.price, 64_000.5);
        assert!(!quote.fallback_used);
        assert_eq!(quote.source, "mock");
    }

    #[tokio::test]
    async fn test_fallback_policy_substitutes_sentinel() {
        let fetcher = PriceFetcher::new(
            Arc::new(MockPriceSource::failing()),
            FailurePolicy::Fallback,
            0.0,
        );
        let quote = fetcher.fetch().await.unwrap();
        assert_eq!(quote.price, 0.0);
        assert!(quote.fallback_used);
    }

    #[tokio::test]
    async fn test_fail_policy_propagates_error() {
        let fetcher = PriceFetcher::new(
            Arc::new(MockPriceSource::failing()),
            FailurePolicy::Fail,
            0.0,
        );
        assert!(matches!(
            fetcher.fetch().await,
            Err(PriceSourceError::UpstreamUnavailable { .. })
        ));
    }
}
