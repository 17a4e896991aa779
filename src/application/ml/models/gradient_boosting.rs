use super::trees::SmartTree;
use super::{check_fit_input, mean, to_matrix};
use crate::domain::errors::ModelError;
use crate::domain::ml::{Algorithm, FeatureRow};
use serde::{Deserialize, Serialize};
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};

/// Gradient boosting hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: u16,
}

impl Default for GradientBoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
        }
    }
}

/// Least-squares gradient boosting: every stage is a shallow regression tree
/// fitted to the residuals of the stages before it.
#[derive(Serialize, Deserialize)]
pub struct GradientBoostingModel {
    params: GradientBoostingParams,
    init: f64,
    stages: Vec<SmartTree>,
}

impl GradientBoostingModel {
    const ALGORITHM: Algorithm = Algorithm::GradientBoosting;

    pub fn fit(rows: &[FeatureRow], targets: &[f64]) -> Result<Self, ModelError> {
        Self::fit_with(rows, targets, GradientBoostingParams::default())
    }

    pub fn fit_with(
        rows: &[FeatureRow],
        targets: &[f64],
        params: GradientBoostingParams,
    ) -> Result<Self, ModelError> {
        check_fit_input(rows, targets, Self::ALGORITHM)?;
        let x = to_matrix(rows, Self::ALGORITHM)?;
        let fit_err = |e: smartcore::error::Failed| ModelError::FitFailed {
            algorithm: Self::ALGORITHM,
            reason: e.to_string(),
        };

        let init = mean(targets);
        let mut current = vec![init; targets.len()];
        let mut stages = Vec::with_capacity(params.n_estimators);
        let tree_params = DecisionTreeRegressorParameters::default().with_max_depth(params.max_depth);

        for _ in 0..params.n_estimators {
            let residuals: Vec<f64> = targets
                .iter()
                .zip(&current)
                .map(|(y, f)| y - f)
                .collect();

            let tree = DecisionTreeRegressor::fit(&x, &residuals, tree_params.clone())
                .map_err(fit_err)?;
            let update = tree.predict(&x).map_err(fit_err)?;
            for (f, u) in current.iter_mut().zip(&update) {
                *f += params.learning_rate * u;
            }
            stages.push(tree);
        }

        Ok(Self {
            params,
            init,
            stages,
        })
    }

    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        let x = to_matrix(rows, Self::ALGORITHM)?;
        let mut output = vec![self.init; rows.len()];

        for tree in &self.stages {
            let update = tree.predict(&x).map_err(|e| ModelError::PredictFailed {
                algorithm: Self::ALGORITHM,
                reason: e.to_string(),
            })?;
            for (f, u) in output.iter_mut().zip(&update) {
                *f += self.params.learning_rate * u;
            }
        }

        Ok(output)
    }
}
