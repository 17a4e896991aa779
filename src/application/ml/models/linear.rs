use super::{check_fit_input, mean, to_matrix};
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::LAG_COUNT;
use crate::domain::ml::{Algorithm, FeatureRow};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};

/// smartcore's SVD solver needs more rows than coefficients (lags plus intercept).
const SVD_MIN_ROWS: usize = LAG_COUNT + 1;

/// Eigenvalues below this share of the largest one are treated as zero.
const RANK_TOLERANCE: f64 = 1e-10;

const MAX_SWEEPS: usize = 64;

/// Ordinary least squares.
///
/// With fewer rows than coefficients the system is underdetermined and the
/// minimum-norm solution is used instead.
#[derive(Serialize, Deserialize)]
pub struct LinearModel {
    solver: LinearSolver,
}

#[derive(Serialize, Deserialize)]
enum LinearSolver {
    Svd(LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    MinimumNorm {
        coefficients: [f64; LAG_COUNT],
        intercept: f64,
    },
}

impl LinearModel {
    const ALGORITHM: Algorithm = Algorithm::LinearRegression;

    pub fn fit(rows: &[FeatureRow], targets: &[f64]) -> Result<Self, ModelError> {
        check_fit_input(rows, targets, Self::ALGORITHM)?;

        if rows.len() < SVD_MIN_ROWS {
            let (coefficients, intercept) = minimum_norm_fit(rows, targets);
            return Ok(Self {
                solver: LinearSolver::MinimumNorm {
                    coefficients,
                    intercept,
                },
            });
        }

        let x = to_matrix(rows, Self::ALGORITHM)?;
        let y = targets.to_vec();

        // SVD tolerates the collinear lag columns a slowly moving price produces
        let params =
            LinearRegressionParameters::default().with_solver(LinearRegressionSolverName::SVD);
        let model = LinearRegression::fit(&x, &y, params).map_err(|e| ModelError::FitFailed {
            algorithm: Self::ALGORITHM,
            reason: e.to_string(),
        })?;

        Ok(Self {
            solver: LinearSolver::Svd(model),
        })
    }

    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        match &self.solver {
            LinearSolver::Svd(model) => {
                let x = to_matrix(rows, Self::ALGORITHM)?;
                model.predict(&x).map_err(|e| ModelError::PredictFailed {
                    algorithm: Self::ALGORITHM,
                    reason: e.to_string(),
                })
            }
            LinearSolver::MinimumNorm {
                coefficients,
                intercept,
            } => Ok(rows
                .iter()
                .map(|row| intercept + dot(coefficients, &row.lags))
                .collect()),
        }
    }
}

/// Least squares with an intercept on centered data. The weights come from
/// `Xcᵀ (Xc Xcᵀ)⁺ yc`, the smallest-norm vector among all exact minimisers.
fn minimum_norm_fit(rows: &[FeatureRow], targets: &[f64]) -> ([f64; LAG_COUNT], f64) {
    let n = rows.len();
    let mut column_means = [0.0; LAG_COUNT];
    for row in rows {
        for (m, lag) in column_means.iter_mut().zip(row.lags) {
            *m += lag / n as f64;
        }
    }
    let target_mean = mean(targets);

    let centered: Vec<[f64; LAG_COUNT]> = rows
        .iter()
        .map(|row| {
            let mut c = row.lags;
            for (v, m) in c.iter_mut().zip(column_means) {
                *v -= m;
            }
            c
        })
        .collect();
    let centered_targets: Vec<f64> = targets.iter().map(|t| t - target_mean).collect();

    // n x n Gram matrix, row major
    let mut gram = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            gram[i * n + j] = dot(&centered[i], &centered[j]);
        }
    }

    let (eigenvalues, eigenvectors) = symmetric_eigen(gram, n);
    let largest = eigenvalues.iter().cloned().fold(0.0_f64, f64::max);

    // alpha = G⁺ yc
    let mut alpha = vec![0.0; n];
    if largest > 0.0 {
        for (k, &lambda) in eigenvalues.iter().enumerate() {
            if lambda <= largest * RANK_TOLERANCE {
                continue;
            }
            let projection: f64 = (0..n)
                .map(|i| eigenvectors[i * n + k] * centered_targets[i])
                .sum();
            for (i, a) in alpha.iter_mut().enumerate() {
                *a += eigenvectors[i * n + k] * projection / lambda;
            }
        }
    }

    let mut coefficients = [0.0; LAG_COUNT];
    for (row, a) in centered.iter().zip(&alpha) {
        for (w, v) in coefficients.iter_mut().zip(row) {
            *w += v * a;
        }
    }
    let intercept = target_mean - dot(&coefficients, &column_means);
    (coefficients, intercept)
}

/// Cyclic Jacobi eigendecomposition of a symmetric row-major matrix.
/// Returns the eigenvalues and the eigenvectors as columns.
fn symmetric_eigen(mut a: Vec<f64>, n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut v = vec![0.0; n * n];
    for i in 0..n {
        v[i * n + i] = 1.0;
    }

    let total: f64 = a.iter().map(|x| x * x).sum();
    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| (p + 1..n).map(move |q| (p, q)))
            .map(|(p, q)| a[p * n + q] * a[p * n + q])
            .sum();
        if off <= total * f64::EPSILON * f64::EPSILON {
            break;
        }

        for p in 0..n {
            for q in p + 1..n {
                let apq = a[p * n + q];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[q * n + q] - a[p * n + p]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[k * n + p];
                    let akq = a[k * n + q];
                    a[k * n + p] = c * akp - s * akq;
                    a[k * n + q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[p * n + k];
                    let aqk = a[q * n + k];
                    a[p * n + k] = c * apk - s * aqk;
                    a[q * n + k] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[k * n + p];
                    let vkq = v[k * n + q];
                    v[k * n + p] = c * vkp - s * vkq;
                    v[k * n + q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let eigenvalues = (0..n).map(|i| a[i * n + i]).collect();
    (eigenvalues, v)
}

fn dot(a: &[f64; LAG_COUNT], b: &[f64; LAG_COUNT]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::models::fixtures::{lagged_series, pseudo_noise};

    #[test]
    fn test_recovers_linear_relationship() {
        // target = 2 * lag_1 - lag_2 + 3 on a series without linear recurrences
        let (rows, _) = lagged_series(30, |t| pseudo_noise(t) * 10.0);
        let targets: Vec<f64> = rows.iter().map(|r| 2.0 * r.lags[0] - r.lags[1] + 3.0).collect();

        let model = LinearModel::fit(&rows, &targets).unwrap();
        let query = FeatureRow::new([10.0, 4.0, 1.0, 7.0, 2.0]);
        let predicted = model.predict(&[query]).unwrap()[0];

        assert!((predicted - 19.0).abs() < 1e-6, "got {}", predicted);
    }

    #[test]
    fn test_rejects_mismatched_targets() {
        let (rows, _) = lagged_series(5, |t| t);
        assert!(matches!(
            LinearModel::fit(&rows, &[1.0]),
            Err(ModelError::FitFailed { .. })
        ));
    }

    #[test]
    fn test_fits_fewer_rows_than_coefficients() {
        for n in 1..SVD_MIN_ROWS {
            let (rows, targets) = lagged_series(n, |t| 64_000.0 + 25.0 * pseudo_noise(t));
            let model = LinearModel::fit(&rows, &targets).unwrap();
            let predicted = model.predict(&rows).unwrap();

            assert_eq!(predicted.len(), n);
            for (p, t) in predicted.iter().zip(&targets) {
                assert!(p.is_finite());
                assert!((p - t).abs() < 1e-6, "n = {}: predicted {} for target {}", n, p, t);
            }
        }
    }

    #[test]
    fn test_underdetermined_fit_ignores_constant_lags() {
        let rows: Vec<FeatureRow> = [1.0, 2.0, 3.0]
            .iter()
            .map(|&x| FeatureRow::new([x, 5.0, 5.0, 5.0, 5.0]))
            .collect();
        let targets = [2.0, 4.0, 6.0];

        let model = LinearModel::fit(&rows, &targets).unwrap();
        let predicted = model
            .predict(&[FeatureRow::new([10.0, 5.0, 5.0, 5.0, 5.0])])
            .unwrap()[0];

        assert!((predicted - 20.0).abs() < 1e-9, "got {}", predicted);
    }

    #[test]
    fn test_flat_prices_predict_the_level() {
        let rows = vec![FeatureRow::replicated(100.0); 4];
        let model = LinearModel::fit(&rows, &[100.0; 4]).unwrap();

        let predicted = model.predict(&[FeatureRow::replicated(100.0)]).unwrap()[0];
        assert!((predicted - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_norm_model_serializes() {
        let (rows, targets) = lagged_series(4, |t| 10.0 + pseudo_noise(t));
        let model = LinearModel::fit(&rows, &targets).unwrap();

        let json = serde_json::to_string(&model).unwrap();
        let restored: LinearModel = serde_json::from_str(&json).unwrap();

        assert_eq!(
            model.predict(&rows).unwrap(),
            restored.predict(&rows).unwrap()
        );
    }
}
