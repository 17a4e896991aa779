//! HTTP surface of the prediction service.

use crate::application::PredictionService;
use crate::domain::errors::{ArtifactError, PredictionError};
use crate::domain::ml::{EvaluationReport, PredictionResult};
use crate::infrastructure::persistence::model_store::read_report;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

pub const ROOT_MESSAGE: &str = "Crypto Prediction API is running!";

/// Shared, read-only handler state.
pub struct AppState {
    pub service: PredictionService,
    pub metrics_path: PathBuf,
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
}

pub enum ApiError {
    Prediction(PredictionError),
    Report(ArtifactError),
    NoReport,
}

impl From<PredictionError> for ApiError {
    fn from(e: PredictionError) -> Self {
        Self::Prediction(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Prediction(PredictionError::Upstream(e)) => {
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            Self::Prediction(PredictionError::Model(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            Self::Report(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::NoReport => (
                StatusCode::NOT_FOUND,
                "No evaluation report available".to_string(),
            ),
        };
        if status.is_server_error() {
            error!("API: {}", message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/predict/", get(predict))
        .route("/predict", get(predict))
        .route("/metrics/", get(metrics))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: ROOT_MESSAGE,
    })
}

async fn predict(State(state): State<SharedState>) -> Result<Json<PredictionResult>, ApiError> {
    Ok(Json(state.service.predict().await?))
}

/// Re-read on every request so a retrain is visible without a restart.
async fn metrics(State(state): State<SharedState>) -> Result<Json<EvaluationReport>, ApiError> {
    match read_report(&state.metrics_path).await {
        Ok(Some(report)) => Ok(Json(report)),
        Ok(None) => Err(ApiError::NoReport),
        Err(e) => Err(ApiError::Report(e)),
    }
}
