use super::predictor::Regressor;
use crate::domain::errors::{ArtifactError, ModelError};
use crate::domain::ml::{Algorithm, FeatureRow};
use crate::infrastructure::persistence::ModelStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// The loaded model set. Built once at start and shared read-only.
#[derive(Clone)]
pub struct ModelRegistry {
    models: BTreeMap<Algorithm, Arc<dyn Regressor>>,
}

impl ModelRegistry {
    /// Loads every algorithm's artifact; the first missing or corrupt one
    /// fails the whole load.
    pub fn load(store: &ModelStore) -> Result<Self, ArtifactError> {
        let mut models: BTreeMap<Algorithm, Arc<dyn Regressor>> = BTreeMap::new();
        for algorithm in Algorithm::ALL {
            let artifact = store.load(algorithm)?;
            info!(
                "ModelRegistry: loaded {} ({} training rows, trained {})",
                algorithm, artifact.training_rows, artifact.trained_at
            );
            models.insert(algorithm, Arc::new(artifact.model));
        }
        Ok(Self { models })
    }

    pub fn from_models(models: impl IntoIterator<Item = Arc<dyn Regressor>>) -> Self {
        Self {
            models: models.into_iter().map(|m| (m.algorithm(), m)).collect(),
        }
    }

    pub fn algorithms(&self) -> impl Iterator<Item = Algorithm> + '_ {
        self.models.keys().copied()
    }

    pub fn predict_all(&self, row: &FeatureRow) -> Result<BTreeMap<Algorithm, f64>, ModelError> {
        self.models
            .iter()
            .map(|(algorithm, model)| Ok((*algorithm, model.predict_one(row)?)))
            .collect()
    }
}
