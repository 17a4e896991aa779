use crate::application::market_data::PriceFetcher;
use crate::config::{PriceSourceEnvConfig, PriceSourceKind};
use crate::domain::ports::PriceSource;
use crate::infrastructure::core::HttpClientFactory;
use crate::infrastructure::price_sources::{
    BinancePriceSource, BitfinexPriceSource, CoinCapPriceSource, CoinGeckoPriceSource,
};
use std::sync::Arc;
use tracing::info;

pub struct ServiceFactory;

impl ServiceFactory {
    /// Builds the single upstream adapter selected by configuration.
    pub fn create_price_source(config: &PriceSourceEnvConfig) -> Arc<dyn PriceSource> {
        let client = HttpClientFactory::create_client(config.timeout);
        let base_url = config.base_url.clone();
        let symbol = config.symbol.clone();

        info!(
            "Price source: {:?} at {} (symbol={}, timeout={:?})",
            config.kind, base_url, symbol, config.timeout
        );

        match config.kind {
            PriceSourceKind::Binance => Arc::new(BinancePriceSource::new(client, base_url, symbol)),
            PriceSourceKind::Bitfinex => {
                Arc::new(BitfinexPriceSource::new(client, base_url, symbol))
            }
            PriceSourceKind::CoinCap => Arc::new(CoinCapPriceSource::new(client, base_url, symbol)),
            PriceSourceKind::CoinGecko => {
                Arc::new(CoinGeckoPriceSource::new(client, base_url, symbol))
            }
        }
    }

    /// Upstream adapter wrapped in the configured failure policy.
    pub fn create_price_fetcher(config: &PriceSourceEnvConfig) -> PriceFetcher {
        PriceFetcher::new(
            Self::create_price_source(config),
            config.failure_policy,
            config.fallback_price,
        )
    }
}
