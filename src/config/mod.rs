//! Configuration module for pricecast.
//!
//! Structured configuration loading from environment variables, organized by
//! concern: Price Source, Sampler, Storage, and Server.

mod sampler_config;
mod server_config;
mod source_config;
mod storage_config;

pub use sampler_config::SamplerEnvConfig;
pub use server_config::ServerEnvConfig;
pub use source_config::{FailurePolicy, PriceSourceEnvConfig, PriceSourceKind};
pub use storage_config::StorageEnvConfig;

use anyhow::Result;
use std::env;

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub source: PriceSourceEnvConfig,
    pub sampler: SamplerEnvConfig,
    pub storage: StorageEnvConfig,
    pub server: ServerEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    /// Only the enumerated settings can fail; numeric settings fall back to
    /// their defaults when unparseable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            source: PriceSourceEnvConfig::from_lookup(&lookup)?,
            sampler: SamplerEnvConfig::from_lookup(&lookup),
            storage: StorageEnvConfig::from_lookup(&lookup),
            server: ServerEnvConfig::from_lookup(&lookup),
        })
    }
}
