//! ε-insensitive support vector regression with an RBF kernel.
//!
//! The intercept starts at the target median and the remaining offset is
//! absorbed by adding a constant 1 to the kernel, which leaves a box-constrained
//! dual without the equality constraint:
//!
//! ```text
//! min_β  ½ βᵀQβ − rᵀβ + ε‖β‖₁   s.t. −C ≤ β_i ≤ C,   Q = K + 1,  r = y − median(y)
//! ```
//!
//! solved by cyclic coordinate descent with soft-thresholded Newton steps.

use super::check_fit_input;
use crate::domain::errors::ModelError;
use crate::domain::ml::{Algorithm, FeatureRow, LAG_COUNT};
use serde::{Deserialize, Serialize};

/// Above this many rows the Gram matrix is recomputed column by column
const MAX_CACHED_ROWS: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvrParams {
    pub c: f64,
    pub epsilon: f64,
    /// RBF width; `None` selects 1 / (n_features · Var(X))
    pub gamma: Option<f64>,
    pub tol: f64,
    pub max_sweeps: usize,
}

impl Default for SvrParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.1,
            gamma: None,
            tol: 1e-3,
            max_sweeps: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvrModel {
    gamma: f64,
    intercept: f64,
    support_vectors: Vec<[f64; LAG_COUNT]>,
    coefficients: Vec<f64>,
}

fn rbf(a: &[f64; LAG_COUNT], b: &[f64; LAG_COUNT], gamma: f64) -> f64 {
    let dist: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    (-gamma * dist).exp()
}

/// `1 / (n_features · Var(X))` over every cell, 1.0 for constant input.
fn scale_gamma(rows: &[FeatureRow]) -> f64 {
    let values: Vec<f64> = rows.iter().flat_map(|r| r.lags).collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    if var > 0.0 {
        1.0 / (LAG_COUNT as f64 * var)
    } else {
        1.0
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

enum Gram {
    Cached { n: usize, values: Vec<f64> },
    OnDemand,
}

impl Gram {
    fn new(rows: &[FeatureRow], gamma: f64) -> Self {
        let n = rows.len();
        if n > MAX_CACHED_ROWS {
            return Self::OnDemand;
        }
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let q = rbf(&rows[i].lags, &rows[j].lags, gamma) + 1.0;
                values[i * n + j] = q;
                values[j * n + i] = q;
            }
        }
        Self::Cached { n, values }
    }

    fn get(&self, rows: &[FeatureRow], gamma: f64, i: usize, j: usize) -> f64 {
        match self {
            Self::Cached { n, values } => values[i * n + j],
            Self::OnDemand => rbf(&rows[i].lags, &rows[j].lags, gamma) + 1.0,
        }
    }
}

impl SvrModel {
    const ALGORITHM: Algorithm = Algorithm::Svr;

    pub fn fit(rows: &[FeatureRow], targets: &[f64]) -> Result<Self, ModelError> {
        Self::fit_with(rows, targets, SvrParams::default())
    }

    pub fn fit_with(
        rows: &[FeatureRow],
        targets: &[f64],
        params: SvrParams,
    ) -> Result<Self, ModelError> {
        check_fit_input(rows, targets, Self::ALGORITHM)?;
        if rows.iter().flat_map(|r| r.lags).chain(targets.iter().copied()).any(|v| !v.is_finite()) {
            return Err(ModelError::FitFailed {
                algorithm: Self::ALGORITHM,
                reason: "non-finite input".to_string(),
            });
        }

        let n = rows.len();
        let gamma = params.gamma.unwrap_or_else(|| scale_gamma(rows));
        let intercept = median(targets);
        let residual: Vec<f64> = targets.iter().map(|y| y - intercept).collect();
        let gram = Gram::new(rows, gamma);

        let mut beta = vec![0.0; n];
        // f = Qβ, kept in sync with every coordinate update
        let mut f = vec![0.0; n];

        for _ in 0..params.max_sweeps {
            let mut max_step: f64 = 0.0;
            for i in 0..n {
                let q_ii = gram.get(rows, gamma, i, i);
                let grad = f[i] - residual[i];
                let unconstrained = beta[i] - grad / q_ii;
                let shrink = params.epsilon / q_ii;
                let soft = unconstrained.signum() * (unconstrained.abs() - shrink).max(0.0);
                let updated = soft.clamp(-params.c, params.c);

                let delta = updated - beta[i];
                if delta != 0.0 {
                    for (j, fj) in f.iter_mut().enumerate() {
                        *fj += delta * gram.get(rows, gamma, j, i);
                    }
                    beta[i] = updated;
                    max_step = max_step.max(delta.abs());
                }
            }
            if max_step < params.tol {
                break;
            }
        }

        let (support_vectors, coefficients): (Vec<_>, Vec<_>) = rows
            .iter()
            .zip(&beta)
            .filter(|(_, b)| **b != 0.0)
            .map(|(r, b)| (r.lags, *b))
            .unzip();

        Ok(Self {
            gamma,
            intercept,
            support_vectors,
            coefficients,
        })
    }

    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        Ok(rows
            .iter()
            .map(|row| {
                self.intercept
                    + self
                        .support_vectors
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(sv, b)| b * (rbf(sv, &row.lags, self.gamma) + 1.0))
                        .sum::<f64>()
            })
            .collect())
    }

    pub fn support_vector_count(&self) -> usize {
        self.support_vectors.len()
    }
}
