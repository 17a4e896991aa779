//! Sampling job configuration parsing from environment variables.

use std::time::Duration;

/// Sampler environment configuration
#[derive(Debug, Clone)]
pub struct SamplerEnvConfig {
    pub count: usize,
    pub interval: Duration,
}

impl Default for SamplerEnvConfig {
    fn default() -> Self {
        Self {
            count: 10,
            interval: Duration::from_secs(5),
        }
    }
}

impl SamplerEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            count: lookup("SAMPLE_COUNT")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(10),
            interval: Duration::from_secs(
                lookup("SAMPLE_INTERVAL_SECS")
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(5),
            ),
        }
    }
}
