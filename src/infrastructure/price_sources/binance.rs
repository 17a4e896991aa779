use super::{join_url, parse_json, parse_price_str, send_for_text};
use crate::domain::errors::PriceSourceError;
use crate::domain::ports::PriceSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const NAME: &str = "binance";

#[derive(Debug, Deserialize)]
struct PriceTicker {
    price: String,
}

/// `GET /api/v3/ticker/price?symbol=...`
pub struct BinancePriceSource {
    client: Client,
    base_url: String,
    symbol: String,
}

impl BinancePriceSource {
    pub fn new(client: Client, base_url: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            symbol: symbol.into(),
        }
    }

    pub(crate) fn parse_price(body: &str) -> Result<f64, PriceSourceError> {
        let ticker: PriceTicker = parse_json(body, NAME)?;
        parse_price_str(&ticker.price, "price", NAME)
    }
}

#[async_trait]
impl PriceSource for BinancePriceSource {
    async fn fetch_price(&self) -> Result<f64, PriceSourceError> {
        let url = join_url(&self.base_url, "/api/v3/ticker/price");
        let request = self.client.get(&url).query(&[("symbol", self.symbol.as_str())]);
        let body = send_for_text(request, NAME).await?;
        Self::parse_price(&body)
    }

    fn name(&self) -> &str {
        NAME
    }
}
