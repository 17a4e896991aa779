//! JSON artifacts for trained models plus the hold-out report.

use crate::application::ml::artifact::ModelArtifact;
use crate::domain::errors::ArtifactError;
use crate::domain::ml::{Algorithm, EvaluationReport};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const METRICS_FILE: &str = "metrics.json";

/// Directory of `{Name}.json` model artifacts.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_path(&self, algorithm: Algorithm) -> PathBuf {
        self.dir.join(algorithm.artifact_file_name())
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.dir.join(METRICS_FILE)
    }

    /// Overwrites the artifact for `artifact.algorithm`.
    pub fn save(&self, artifact: &ModelArtifact) -> Result<PathBuf, ArtifactError> {
        let path = self.artifact_path(artifact.algorithm);
        let json = serde_json::to_vec(artifact).map_err(|e| ArtifactError::ArtifactCorrupt {
            algorithm: artifact.algorithm,
            reason: format!("Serialization failed: {}", e),
        })?;
        write_atomic(&path, &json)?;
        info!("Saved {} model to {:?}", artifact.algorithm, path);
        Ok(path)
    }

    pub fn load(&self, algorithm: Algorithm) -> Result<ModelArtifact, ArtifactError> {
        let path = self.artifact_path(algorithm);
        let bytes = fs::read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ArtifactError::ArtifactMissing {
                algorithm,
                path: path.clone(),
            },
            _ => ArtifactError::Io {
                path: path.clone(),
                source,
            },
        })?;

        let artifact: ModelArtifact =
            serde_json::from_slice(&bytes).map_err(|e| ArtifactError::ArtifactCorrupt {
                algorithm,
                reason: e.to_string(),
            })?;
        artifact.validate(algorithm)?;
        debug!("Loaded {} model from {:?}", algorithm, path);
        Ok(artifact)
    }

    pub fn save_report(&self, report: &EvaluationReport) -> Result<PathBuf, ArtifactError> {
        let path = self.metrics_path();
        write_json(&path, report)?;
        info!("Saved evaluation report to {:?}", path);
        Ok(path)
    }

    /// `Ok(None)` when no report has been written yet.
    pub fn load_report(&self) -> Result<Option<EvaluationReport>, ArtifactError> {
        let path = self.metrics_path();
        decode_report(&path, fs::read(&path))
    }
}

/// Non-blocking report read for request handlers. `Ok(None)` when the
/// file does not exist.
pub async fn read_report(path: &Path) -> Result<Option<EvaluationReport>, ArtifactError> {
    decode_report(path, tokio::fs::read(path).await)
}

fn decode_report(
    path: &Path,
    read: std::io::Result<Vec<u8>>,
) -> Result<Option<EvaluationReport>, ArtifactError> {
    let bytes = match read {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| ArtifactError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(ErrorKind::InvalidData, e),
        })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let json = serde_json::to_vec_pretty(value).map_err(|e| ArtifactError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(ErrorKind::InvalidData, e),
    })?;
    write_atomic(path, &json)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let temp = path.with_extension("json.tmp");
    fs::write(&temp, bytes).map_err(io_err)?;
    fs::rename(&temp, path).map_err(io_err)
}
