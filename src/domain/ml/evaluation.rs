use super::algorithm::Algorithm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hold-out error of one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldoutMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl HoldoutMetrics {
    /// Returns `None` for empty or mismatched inputs.
    /// R² is reported as 0.0 when the actuals have no variance.
    pub fn compute(actuals: &[f64], predictions: &[f64]) -> Option<Self> {
        let n = actuals.len();
        if n == 0 || n != predictions.len() {
            return None;
        }
        let n_f = n as f64;

        let sq_err: f64 = predictions
            .iter()
            .zip(actuals)
            .map(|(p, t)| (p - t).powi(2))
            .sum();
        let abs_err: f64 = predictions
            .iter()
            .zip(actuals)
            .map(|(p, t)| (p - t).abs())
            .sum();

        let mean = actuals.iter().sum::<f64>() / n_f;
        let ss_tot: f64 = actuals.iter().map(|t| (t - mean).powi(2)).sum();
        let r2 = if ss_tot > 0.0 { 1.0 - sq_err / ss_tot } else { 0.0 };

        Some(Self {
            rmse: (sq_err / n_f).sqrt(),
            mae: abs_err / n_f,
            r2,
        })
    }
}

/// Written next to the model artifacts by the trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub generated_at: DateTime<Utc>,
    pub training_rows: usize,
    pub test_rows: usize,
    pub models: BTreeMap<Algorithm, HoldoutMetrics>,
}
