//! Concrete regressors behind [`TrainedModel`](super::predictor::TrainedModel).
//!
//! Linear regression and the CART family come straight from smartcore. The
//! boosted ensembles and the support-vector regressor are built here, the
//! first on top of smartcore's regression tree.

pub mod gradient_boosting;
pub mod linear;
pub mod svr;
pub mod trees;
pub mod xgboost;

pub use gradient_boosting::GradientBoostingModel;
pub use linear::LinearModel;
pub use svr::SvrModel;
pub use trees::{DecisionTreeModel, RandomForestModel};
pub use xgboost::XgBoostModel;

use crate::domain::errors::ModelError;
use crate::domain::ml::{Algorithm, FeatureRow};
use crate::domain::ml::feature_registry::rows_to_matrix_input;
use smartcore::linalg::basic::matrix::DenseMatrix;

pub(crate) fn to_matrix(
    rows: &[FeatureRow],
    algorithm: Algorithm,
) -> Result<DenseMatrix<f64>, ModelError> {
    DenseMatrix::from_2d_vec(&rows_to_matrix_input(rows)).map_err(|e| ModelError::PredictFailed {
        algorithm,
        reason: format!("Matrix creation failed: {}", e),
    })
}

pub(crate) fn check_fit_input(
    rows: &[FeatureRow],
    targets: &[f64],
    algorithm: Algorithm,
) -> Result<(), ModelError> {
    if rows.is_empty() {
        return Err(ModelError::FitFailed {
            algorithm,
            reason: "no training rows".to_string(),
        });
    }
    if rows.len() != targets.len() {
        return Err(ModelError::FitFailed {
            algorithm,
            reason: format!("{} rows but {} targets", rows.len(), targets.len()),
        });
    }
    Ok(())
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::ml::FeatureRow;

    /// Lag rows over a smooth series, target = the next value.
    pub fn lagged_series(n: usize, f: impl Fn(f64) -> f64) -> (Vec<FeatureRow>, Vec<f64>) {
        let series: Vec<f64> = (0..n + 5).map(|i| f(i as f64)).collect();
        let rows = (5..series.len())
            .map(|i| {
                FeatureRow::new([
                    series[i - 1],
                    series[i - 2],
                    series[i - 3],
                    series[i - 4],
                    series[i - 5],
                ])
            })
            .collect();
        let targets = series[5..].to_vec();
        (rows, targets)
    }

    /// Deterministic, well-conditioned stand-in for price noise.
    pub fn pseudo_noise(t: f64) -> f64 {
        ((t * 12.9898).sin() * 43758.5453).fract()
    }

    pub fn rmse(predictions: &[f64], targets: &[f64]) -> f64 {
        let n = targets.len() as f64;
        (predictions
            .iter()
            .zip(targets)
            .map(|(p, t)| (p - t).powi(2))
            .sum::<f64>()
            / n)
            .sqrt()
    }
}
