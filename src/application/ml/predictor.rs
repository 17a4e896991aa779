use super::models::{
    DecisionTreeModel, GradientBoostingModel, LinearModel, RandomForestModel, SvrModel,
    XgBoostModel,
};
use crate::domain::errors::ModelError;
use crate::domain::ml::{Algorithm, FeatureRow};
use serde::{Deserialize, Serialize};

/// Interface for fitted regression models
pub trait Regressor: Send + Sync {
    /// One prediction per input row, in row order
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError>;

    fn algorithm(&self) -> Algorithm;

    /// Convenience wrapper for the single-row serving path
    fn predict_one(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        self.predict(std::slice::from_ref(row))?
            .first()
            .copied()
            .ok_or_else(|| ModelError::PredictFailed {
                algorithm: self.algorithm(),
                reason: "No prediction returned".to_string(),
            })
    }
}

/// A fitted regressor of any supported algorithm.
#[derive(Serialize, Deserialize)]
pub enum TrainedModel {
    LinearRegression(LinearModel),
    DecisionTree(DecisionTreeModel),
    RandomForest(RandomForestModel),
    GradientBoosting(GradientBoostingModel),
    #[serde(rename = "XGBoost")]
    XgBoost(XgBoostModel),
    #[serde(rename = "SVR")]
    Svr(SvrModel),
}

impl TrainedModel {
    /// Fits `algorithm` with its default hyperparameters.
    pub fn fit(
        algorithm: Algorithm,
        rows: &[FeatureRow],
        targets: &[f64],
    ) -> Result<Self, ModelError> {
        Ok(match algorithm {
            Algorithm::LinearRegression => Self::LinearRegression(LinearModel::fit(rows, targets)?),
            Algorithm::DecisionTree => Self::DecisionTree(DecisionTreeModel::fit(rows, targets)?),
            Algorithm::RandomForest => Self::RandomForest(RandomForestModel::fit(rows, targets)?),
            Algorithm::GradientBoosting => {
                Self::GradientBoosting(GradientBoostingModel::fit(rows, targets)?)
            }
            Algorithm::XgBoost => Self::XgBoost(XgBoostModel::fit(rows, targets)?),
            Algorithm::Svr => Self::Svr(SvrModel::fit(rows, targets)?),
        })
    }
}

impl Regressor for TrainedModel {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            Self::LinearRegression(m) => m.predict(rows),
            Self::DecisionTree(m) => m.predict(rows),
            Self::RandomForest(m) => m.predict(rows),
            Self::GradientBoosting(m) => m.predict(rows),
            Self::XgBoost(m) => m.predict(rows),
            Self::Svr(m) => m.predict(rows),
        }
    }

    fn algorithm(&self) -> Algorithm {
        match self {
            Self::LinearRegression(_) => Algorithm::LinearRegression,
            Self::DecisionTree(_) => Algorithm::DecisionTree,
            Self::RandomForest(_) => Algorithm::RandomForest,
            Self::GradientBoosting(_) => Algorithm::GradientBoosting,
            Self::XgBoost(_) => Algorithm::XgBoost,
            Self::Svr(_) => Algorithm::Svr,
        }
    }
}
