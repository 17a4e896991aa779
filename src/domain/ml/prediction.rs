use super::algorithm::Algorithm;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One request's worth of model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predictions: BTreeMap<Algorithm, f64>,
    pub latest_price: f64,
    /// True when the upstream fetch failed and `latest_price` is the fallback.
    pub fallback_used: bool,
    pub source: String,
}
