use super::ml::Algorithm;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by an upstream price adapter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceSourceError {
    #[error("{upstream} unavailable: {reason}")]
    UpstreamUnavailable { upstream: String, reason: String },

    #[error("{upstream} returned a malformed response: {reason}")]
    UpstreamMalformed { upstream: String, reason: String },
}

impl PriceSourceError {
    pub fn unavailable(upstream: &str, reason: impl ToString) -> Self {
        Self::UpstreamUnavailable {
            upstream: upstream.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(upstream: &str, reason: impl ToString) -> Self {
        Self::UpstreamMalformed {
            upstream: upstream.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors related to persisted model artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Model artifact for {algorithm} not found at {path:?}")]
    ArtifactMissing { algorithm: Algorithm, path: PathBuf },

    #[error("Model artifact for {algorithm} is corrupt: {reason}")]
    ArtifactCorrupt { algorithm: Algorithm, reason: String },

    #[error("Artifact I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to sample and feature datasets
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset is empty: nothing collected")]
    EmptyDataset,

    #[error("Insufficient data: {rows} rows, need at least {required}")]
    InsufficientData { rows: usize, required: usize },

    #[error("Length mismatch: {rows} feature rows but {targets} targets")]
    LengthMismatch { rows: usize, targets: usize },

    #[error("CSV error for {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Dataset I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while fitting or evaluating a regressor
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{algorithm} fit failed: {reason}")]
    FitFailed { algorithm: Algorithm, reason: String },

    #[error("{algorithm} prediction failed: {reason}")]
    PredictFailed { algorithm: Algorithm, reason: String },

    #[error("{algorithm} expects {expected} features per row, got {actual}")]
    DimensionMismatch {
        algorithm: Algorithm,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Failures surfaced by a prediction request
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Upstream(#[from] PriceSourceError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
