use super::{join_url, parse_json, parse_price_str, send_for_text};
use crate::domain::errors::PriceSourceError;
use crate::domain::ports::PriceSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const NAME: &str = "coincap";

#[derive(Debug, Deserialize)]
struct AssetResponse {
    data: AssetData,
}

#[derive(Debug, Deserialize)]
struct AssetData {
    #[serde(rename = "priceUsd")]
    price_usd: Option<String>,
}

/// `GET /v2/assets/{id}`
pub struct CoinCapPriceSource {
    client: Client,
    base_url: String,
    asset_id: String,
}

impl CoinCapPriceSource {
    pub fn new(client: Client, base_url: impl Into<String>, asset_id: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            asset_id: asset_id.into(),
        }
    }

    pub(crate) fn parse_price(body: &str) -> Result<f64, PriceSourceError> {
        let asset: AssetResponse = parse_json(body, NAME)?;
        // CoinCap reports unpriced assets with a null priceUsd
        let raw = asset
            .data
            .price_usd
            .ok_or_else(|| PriceSourceError::malformed(NAME, "`data.priceUsd` is null"))?;
        parse_price_str(&raw, "data.priceUsd", NAME)
    }
}

#[async_trait]
impl PriceSource for CoinCapPriceSource {
    async fn fetch_price(&self) -> Result<f64, PriceSourceError> {
        let url = join_url(&self.base_url, &format!("/v2/assets/{}", self.asset_id));
        let body = send_for_text(self.client.get(&url), NAME).await?;
        Self::parse_price(&body)
    }

    fn name(&self) -> &str {
        NAME
    }
}
