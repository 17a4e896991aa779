use super::predictor::{Regressor, TrainedModel};
use crate::domain::errors::{DatasetError, TrainingError};
use crate::domain::ml::{Algorithm, EvaluationReport, FeatureRow, HoldoutMetrics};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::info;

/// Smallest training prefix any of the six regressors can be fitted on.
pub const MIN_TRAINING_ROWS: usize = 2;

/// Splits `n` time-ordered rows into `(train, test)` counts without
/// shuffling. The hold-out suffix gets `ceil(n / 5)` rows.
pub fn temporal_split(n: usize) -> (usize, usize) {
    let test = n.div_ceil(5);
    (n - test, test)
}

pub struct TrainingOutcome {
    pub models: BTreeMap<Algorithm, TrainedModel>,
    pub report: EvaluationReport,
}

impl TrainingOutcome {
    pub fn training_rows(&self) -> usize {
        self.report.training_rows
    }
}

/// Fits every algorithm on the training prefix and scores it on the suffix.
pub struct ModelTrainer {
    algorithms: Vec<Algorithm>,
}

impl Default for ModelTrainer {
    fn default() -> Self {
        Self {
            algorithms: Algorithm::ALL.to_vec(),
        }
    }
}

impl ModelTrainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts training to a subset of algorithms.
    pub fn with_algorithms(algorithms: &[Algorithm]) -> Self {
        Self {
            algorithms: algorithms.to_vec(),
        }
    }

    /// Any single fit failure aborts the whole run.
    pub fn train(
        &self,
        rows: &[FeatureRow],
        targets: &[f64],
    ) -> Result<TrainingOutcome, TrainingError> {
        if rows.is_empty() {
            return Err(DatasetError::EmptyDataset.into());
        }
        if rows.len() != targets.len() {
            return Err(DatasetError::LengthMismatch {
                rows: rows.len(),
                targets: targets.len(),
            }
            .into());
        }

        let (train_len, test_len) = temporal_split(rows.len());
        if train_len < MIN_TRAINING_ROWS {
            return Err(DatasetError::InsufficientData {
                rows: train_len,
                required: MIN_TRAINING_ROWS,
            }
            .into());
        }
        let (train_x, test_x) = rows.split_at(train_len);
        let (train_y, test_y) = targets.split_at(train_len);
        info!(
            "ModelTrainer: {} rows -> {} train / {} test",
            rows.len(),
            train_len,
            test_len
        );

        let mut models = BTreeMap::new();
        let mut scores = BTreeMap::new();
        for &algorithm in &self.algorithms {
            let model = TrainedModel::fit(algorithm, train_x, train_y)?;
            info!("ModelTrainer: {} trained", algorithm);

            if !test_x.is_empty() {
                let predictions = model.predict(test_x)?;
                if let Some(metrics) = HoldoutMetrics::compute(test_y, &predictions) {
                    info!(
                        "ModelTrainer: {} hold-out RMSE={:.4} MAE={:.4} R2={:.4}",
                        algorithm, metrics.rmse, metrics.mae, metrics.r2
                    );
                    scores.insert(algorithm, metrics);
                }
            }
            models.insert(algorithm, model);
        }

        Ok(TrainingOutcome {
            models,
            report: EvaluationReport {
                generated_at: Utc::now(),
                training_rows: train_len,
                test_rows: test_len,
                models: scores,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::models::fixtures::{lagged_series, pseudo_noise};

    #[test]
    fn test_split_arithmetic() {
        assert_eq!(temporal_split(10), (8, 2));
        assert_eq!(temporal_split(4), (3, 1));
        assert_eq!(temporal_split(5), (4, 1));
        assert_eq!(temporal_split(6), (4, 2));
        assert_eq!(temporal_split(1), (0, 1));
        assert_eq!(temporal_split(0), (0, 0));
    }

    #[test]
    fn test_trains_all_six_and_scores_suffix() {
        let (rows, targets) = lagged_series(20, |t| pseudo_noise(t) + 10.0);
        let outcome = ModelTrainer::new().train(&rows, &targets).unwrap();

        assert_eq!(outcome.models.len(), Algorithm::ALL.len());
        for algorithm in Algorithm::ALL {
            assert_eq!(outcome.models[&algorithm].algorithm(), algorithm);
            assert!(outcome.report.models.contains_key(&algorithm));
        }
        assert_eq!(outcome.training_rows(), 16);
        assert_eq!(outcome.report.test_rows, 4);
    }

    #[test]
    fn test_rejects_tiny_training_prefix() {
        let (rows, targets) = lagged_series(2, |t| t);
        // 2 rows -> 1 train / 1 test
        let Err(err) = ModelTrainer::new().train(&rows, &targets) else {
            panic!("expected a dataset error");
        };
        assert!(matches!(
            err,
            TrainingError::Dataset(DatasetError::InsufficientData {
                rows: 1,
                required: 2
            })
        ));
    }

    #[test]
    fn test_trains_all_six_on_default_sample_count() {
        // 10 samples -> 5 feature rows -> 4 train / 1 test
        let (rows, targets) = lagged_series(5, |t| 64_000.0 + 25.0 * pseudo_noise(t));
        let outcome = ModelTrainer::new().train(&rows, &targets).unwrap();

        assert_eq!(outcome.models.len(), Algorithm::ALL.len());
        assert_eq!(outcome.training_rows(), 4);
        assert_eq!(outcome.report.test_rows, 1);

        let live = [FeatureRow::replicated(64_010.0)];
        for model in outcome.models.values() {
            let predicted = model.predict(&live).unwrap();
            assert!(predicted[0].is_finite(), "{}", model.algorithm());
        }
    }

    #[test]
    fn test_smallest_accepted_prefix_returns_result() {
        // 3 rows -> 2 train / 1 test
        let (rows, targets) = lagged_series(3, |t| 64_000.0 + 25.0 * pseudo_noise(t));
        assert_eq!(temporal_split(rows.len()).0, MIN_TRAINING_ROWS);

        match ModelTrainer::new().train(&rows, &targets) {
            Ok(outcome) => {
                assert_eq!(outcome.training_rows(), MIN_TRAINING_ROWS);
                assert_eq!(outcome.models.len(), Algorithm::ALL.len());
            }
            Err(err) => assert!(matches!(err, TrainingError::Model(_)), "{}", err),
        }
    }

    #[test]
    fn test_linear_regression_trains_on_every_small_prefix() {
        let trainer = ModelTrainer::with_algorithms(&[Algorithm::LinearRegression]);
        for n in 3..=8 {
            let (rows, targets) = lagged_series(n, |t| 64_000.0 + 25.0 * pseudo_noise(t));
            let outcome = trainer.train(&rows, &targets).unwrap();
            assert_eq!(outcome.training_rows(), temporal_split(n).0);
        }
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let (rows, _) = lagged_series(3, |t| t);
        let Err(err) = ModelTrainer::new().train(&rows, &[1.0, 2.0]) else {
            panic!("expected a dataset error");
        };
        assert!(matches!(
            err,
            TrainingError::Dataset(DatasetError::LengthMismatch {
                rows: 3,
                targets: 2
            })
        ));
    }

    #[test]
    fn test_rejects_empty_dataset() {
        let Err(err) = ModelTrainer::new().train(&[], &[]) else {
            panic!("expected a dataset error");
        };
        assert!(matches!(err, TrainingError::Dataset(DatasetError::EmptyDataset)));
    }

    #[test]
    fn test_subset_of_algorithms() {
        let (rows, targets) = lagged_series(10, |t| pseudo_noise(t) * 2.0);
        let trainer = ModelTrainer::with_algorithms(&[Algorithm::LinearRegression]);
        let outcome = trainer.train(&rows, &targets).unwrap();
        assert_eq!(outcome.models.len(), 1);
        assert!(outcome.models.contains_key(&Algorithm::LinearRegression));
    }
}
