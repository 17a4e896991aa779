use super::{check_fit_input, to_matrix};
use crate::domain::errors::ModelError;
use crate::domain::ml::{Algorithm, FeatureRow};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};

pub(crate) type SmartTree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Single CART regression tree grown until leaves are pure.
#[derive(Serialize, Deserialize)]
pub struct DecisionTreeModel {
    model: SmartTree,
}

impl DecisionTreeModel {
    const ALGORITHM: Algorithm = Algorithm::DecisionTree;

    pub fn fit(rows: &[FeatureRow], targets: &[f64]) -> Result<Self, ModelError> {
        check_fit_input(rows, targets, Self::ALGORITHM)?;
        let x = to_matrix(rows, Self::ALGORITHM)?;
        let y = targets.to_vec();

        let model = DecisionTreeRegressor::fit(&x, &y, DecisionTreeRegressorParameters::default())
            .map_err(|e| ModelError::FitFailed {
                algorithm: Self::ALGORITHM,
                reason: e.to_string(),
            })?;

        Ok(Self { model })
    }

    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        let x = to_matrix(rows, Self::ALGORITHM)?;
        self.model.predict(&x).map_err(|e| ModelError::PredictFailed {
            algorithm: Self::ALGORITHM,
            reason: e.to_string(),
        })
    }
}

/// Bagged CART ensemble.
#[derive(Serialize, Deserialize)]
pub struct RandomForestModel {
    model: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
}

impl RandomForestModel {
    const ALGORITHM: Algorithm = Algorithm::RandomForest;
    const N_TREES: usize = 100;

    pub fn fit(rows: &[FeatureRow], targets: &[f64]) -> Result<Self, ModelError> {
        check_fit_input(rows, targets, Self::ALGORITHM)?;
        let x = to_matrix(rows, Self::ALGORITHM)?;
        let y = targets.to_vec();

        let params = RandomForestRegressorParameters::default().with_n_trees(Self::N_TREES);
        let model =
            RandomForestRegressor::fit(&x, &y, params).map_err(|e| ModelError::FitFailed {
                algorithm: Self::ALGORITHM,
                reason: e.to_string(),
            })?;

        Ok(Self { model })
    }

    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        let x = to_matrix(rows, Self::ALGORITHM)?;
        self.model.predict(&x).map_err(|e| ModelError::PredictFailed {
            algorithm: Self::ALGORITHM,
            reason: e.to_string(),
        })
    }
}
