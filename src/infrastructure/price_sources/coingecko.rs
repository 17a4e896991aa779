use super::{join_url, parse_json, send_for_text, validate_price};
use crate::domain::errors::PriceSourceError;
use crate::domain::ports::PriceSource;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const NAME: &str = "coingecko";
const VS_CURRENCY: &str = "usd";

/// `GET /api/v3/simple/price?ids={id}&vs_currencies=usd`
///
/// The response is keyed by the coin id: `{"bitcoin": {"usd": 64000.0}}`.
pub struct CoinGeckoPriceSource {
    client: Client,
    base_url: String,
    coin_id: String,
}

impl CoinGeckoPriceSource {
    pub fn new(client: Client, base_url: impl Into<String>, coin_id: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            coin_id: coin_id.into(),
        }
    }

    pub(crate) fn parse_price(body: &str, coin_id: &str) -> Result<f64, PriceSourceError> {
        let value: Value = parse_json(body, NAME)?;
        let field = format!("{}.{}", coin_id, VS_CURRENCY);
        let price = value
            .get(coin_id)
            .and_then(|coin| coin.get(VS_CURRENCY))
            .and_then(Value::as_f64)
            .ok_or_else(|| PriceSourceError::malformed(NAME, format!("missing `{}`", field)))?;
        validate_price(price, &field, NAME)
    }
}

#[async_trait]
impl PriceSource for CoinGeckoPriceSource {
    async fn fetch_price(&self) -> Result<f64, PriceSourceError> {
        let url = join_url(&self.base_url, "/api/v3/simple/price");
        let request = self.client.get(&url).query(&[
            ("ids", self.coin_id.as_str()),
            ("vs_currencies", VS_CURRENCY),
        ]);
        let body = send_for_text(request, NAME).await?;
        Self::parse_price(&body, &self.coin_id)
    }

    fn name(&self) -> &str {
        NAME
    }
}
