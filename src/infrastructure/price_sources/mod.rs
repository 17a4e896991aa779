//! Upstream price adapters, one per exchange/aggregator.
//!
//! Each adapter issues a single GET and extracts one scalar price from the
//! upstream's own JSON shape. Transport failures and non-2xx statuses map to
//! `UpstreamUnavailable`; anything wrong with the body maps to
//! `UpstreamMalformed`.

pub mod binance;
pub mod bitfinex;
pub mod coincap;
pub mod coingecko;

pub use binance::BinancePriceSource;
pub use bitfinex::BitfinexPriceSource;
pub use coincap::CoinCapPriceSource;
pub use coingecko::CoinGeckoPriceSource;

use crate::domain::errors::PriceSourceError;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Sends the request and returns the body of a successful response.
pub(crate) async fn send_for_text(
    request: RequestBuilder,
    upstream: &str,
) -> Result<String, PriceSourceError> {
    let response = request
        .send()
        .await
        .map_err(|e| PriceSourceError::unavailable(upstream, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        return Err(PriceSourceError::unavailable(
            upstream,
            format!("HTTP {}: {}", status, snippet),
        ));
    }

    response
        .text()
        .await
        .map_err(|e| PriceSourceError::unavailable(upstream, e))
}

pub(crate) fn parse_json<T: DeserializeOwned>(
    body: &str,
    upstream: &str,
) -> Result<T, PriceSourceError> {
    serde_json::from_str(body).map_err(|e| PriceSourceError::malformed(upstream, e))
}

/// Most upstreams quote prices as decimal strings.
pub(crate) fn parse_price_str(
    raw: &str,
    field: &str,
    upstream: &str,
) -> Result<f64, PriceSourceError> {
    let price = raw.trim().parse::<f64>().map_err(|e| {
        PriceSourceError::malformed(upstream, format!("`{}` is not a number ({}): {}", field, raw, e))
    })?;
    validate_price(price, field, upstream)
}

pub(crate) fn validate_price(
    price: f64,
    field: &str,
    upstream: &str,
) -> Result<f64, PriceSourceError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(PriceSourceError::malformed(
            upstream,
            format!("`{}` is not a positive price: {}", field, price),
        ))
    }
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
