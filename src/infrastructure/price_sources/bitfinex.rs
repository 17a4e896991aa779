use super::{join_url, parse_json, parse_price_str, send_for_text};
use crate::domain::errors::PriceSourceError;
use crate::domain::ports::PriceSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const NAME: &str = "bitfinex";

#[derive(Debug, Deserialize)]
struct PubTicker {
    last_price: String,
}

/// `GET /v1/pubticker/{symbol}`
pub struct BitfinexPriceSource {
    client: Client,
    base_url: String,
    symbol: String,
}

impl BitfinexPriceSource {
    pub fn new(client: Client, base_url: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            symbol: symbol.into(),
        }
    }

    pub(crate) fn parse_price(body: &str) -> Result<f64, PriceSourceError> {
        let ticker: PubTicker = parse_json(body, NAME)?;
        parse_price_str(&ticker.last_price, "last_price", NAME)
    }
}

#[async_trait]
impl PriceSource for BitfinexPriceSource {
    async fn fetch_price(&self) -> Result<f64, PriceSourceError> {
        let url = join_url(&self.base_url, &format!("/v1/pubticker/{}", self.symbol));
        let body = send_for_text(self.client.get(&url), NAME).await?;
        Self::parse_price(&body)
    }

    fn name(&self) -> &str {
        NAME
    }
}
