//! Upstream price source configuration parsing from environment variables.

use anyhow::Result;
use std::str::FromStr;
use std::time::Duration;

/// Which upstream quotes the price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSourceKind {
    Binance,
    Bitfinex,
    CoinCap,
    CoinGecko,
}

impl PriceSourceKind {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Binance => "https://api.binance.com",
            Self::Bitfinex => "https://api.bitfinex.com",
            Self::CoinCap => "https://api.coincap.io",
            Self::CoinGecko => "https://api.coingecko.com",
        }
    }

    /// BTC/USD identifier in each upstream's own vocabulary
    pub fn default_symbol(&self) -> &'static str {
        match self {
            Self::Binance => "BTCUSDT",
            Self::Bitfinex => "btcusd",
            Self::CoinCap | Self::CoinGecko => "bitcoin",
        }
    }
}

impl FromStr for PriceSourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binance" => Ok(Self::Binance),
            "bitfinex" => Ok(Self::Bitfinex),
            "coincap" => Ok(Self::CoinCap),
            "coingecko" => Ok(Self::CoinGecko),
            _ => anyhow::bail!(
                "Invalid PRICE_SOURCE: {}. Must be 'binance', 'bitfinex', 'coincap', or 'coingecko'",
                s
            ),
        }
    }
}

/// What the prediction path does when the upstream fetch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and substitute the fallback price
    Fallback,
    /// Surface the upstream error to the caller
    Fail,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "fail" => Ok(Self::Fail),
            _ => anyhow::bail!(
                "Invalid FETCH_FAILURE_POLICY: {}. Must be 'fallback' or 'fail'",
                s
            ),
        }
    }
}

/// Price source environment configuration
#[derive(Debug, Clone)]
pub struct PriceSourceEnvConfig {
    pub kind: PriceSourceKind,
    pub base_url: String,
    pub symbol: String,
    pub timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub fallback_price: f64,
}

impl Default for PriceSourceEnvConfig {
    fn default() -> Self {
        let kind = PriceSourceKind::Binance;
        Self {
            kind,
            base_url: kind.default_base_url().to_string(),
            symbol: kind.default_symbol().to_string(),
            timeout: Duration::from_secs(5),
            failure_policy: FailurePolicy::Fallback,
            fallback_price: 0.0,
        }
    }
}

impl PriceSourceEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match lookup("PRICE_SOURCE") {
            Some(v) => v.parse::<PriceSourceKind>()?,
            None => PriceSourceKind::Binance,
        };
        let failure_policy = match lookup("FETCH_FAILURE_POLICY") {
            Some(v) => v.parse::<FailurePolicy>()?,
            None => FailurePolicy::Fallback,
        };

        Ok(Self {
            kind,
            base_url: lookup("PRICE_SOURCE_BASE_URL")
                .unwrap_or_else(|| kind.default_base_url().to_string()),
            symbol: lookup("PRICE_SYMBOL").unwrap_or_else(|| kind.default_symbol().to_string()),
            timeout: Duration::from_secs(
                lookup("FETCH_TIMEOUT_SECS")
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(5),
            ),
            failure_policy,
            fallback_price: lookup("FALLBACK_PRICE")
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(0.0),
        })
    }
}
