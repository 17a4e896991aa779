use super::predictor::{Regressor, TrainedModel};
use crate::domain::errors::ArtifactError;
use crate::domain::ml::Algorithm;
use crate::domain::ml::feature_registry::{FEATURE_NAMES, feature_names};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// On-disk envelope for one trained model.
#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub algorithm: Algorithm,
    pub feature_names: Vec<String>,
    pub training_rows: usize,
    pub trained_at: DateTime<Utc>,
    pub model: TrainedModel,
}

impl ModelArtifact {
    pub fn new(model: TrainedModel, training_rows: usize) -> Self {
        Self {
            algorithm: model.algorithm(),
            feature_names: feature_names(),
            training_rows,
            trained_at: Utc::now(),
            model,
        }
    }

    /// Rejects envelopes that were stored under the wrong name or trained on
    /// a different feature layout.
    pub fn validate(&self, expected: Algorithm) -> Result<(), ArtifactError> {
        if self.algorithm != expected || self.model.algorithm() != expected {
            return Err(ArtifactError::ArtifactCorrupt {
                algorithm: expected,
                reason: format!(
                    "artifact holds {} (model {})",
                    self.algorithm,
                    self.model.algorithm()
                ),
            });
        }
        if self.feature_names != FEATURE_NAMES {
            return Err(ArtifactError::ArtifactCorrupt {
                algorithm: expected,
                reason: format!("feature layout {:?} != {:?}", self.feature_names, FEATURE_NAMES),
            });
        }
        Ok(())
    }
}
