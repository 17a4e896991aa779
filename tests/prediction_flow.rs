//! Trained artifacts loaded into the HTTP API and served on a live price.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pricecast::application::PredictionService;
use pricecast::application::market_data::PriceFetcher;
use pricecast::application::ml::{ModelArtifact, ModelRegistry, ModelTrainer, Regressor};
use pricecast::config::FailurePolicy;
use pricecast::domain::ml::{Algorithm, FeatureRow, FeatureRecord, PredictionResult};
use pricecast::domain::ml::feature_record::into_training_set;
use pricecast::infrastructure::ModelStore;
use pricecast::infrastructure::mock::MockPriceSource;
use pricecast::interfaces::{AppState, create_router};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tower::ServiceExt;

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn create_test_dir() -> PathBuf {
    let unique_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "pricecast_it_{}_{}_{}_prediction",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
        unique_id
    ));
    fs::create_dir_all(&dir).expect("Failed to create test temp dir");
    dir
}

/// Trains and saves all six models, returning the store.
fn trained_store(dir: &Path) -> ModelStore {
    let start = chrono::Utc::now();
    let prices: Vec<f64> = (0..26)
        .map(|i| {
            let t = i as f64;
            100.0 + 3.0 * ((t * 12.9898).sin() * 43758.5453).fract() + t
        })
        .collect();
    let records: Vec<FeatureRecord> = (5..prices.len())
        .map(|i| {
            FeatureRecord::new(
                start + chrono::Duration::seconds(i as i64),
                prices[i],
                FeatureRow::new([prices[i - 1], prices[i - 2], prices[i - 3], prices[i - 4], prices[i - 5]]),
            )
        })
        .collect();
    let (rows, targets) = into_training_set(&records);

    let store = ModelStore::new(dir.join("models"));
    let outcome = ModelTrainer::new().train(&rows, &targets).unwrap();
    let training_rows = outcome.training_rows();
    for model in outcome.models.into_values() {
        store.save(&ModelArtifact::new(model, training_rows)).unwrap();
    }
    store.save_report(&outcome.report).unwrap();
    store
}

fn app(store: &ModelStore, source: MockPriceSource, policy: FailurePolicy) -> (axum::Router, Arc<ModelRegistry>) {
    let registry = Arc::new(ModelRegistry::load(store).unwrap());
    let service = PredictionService::new(
        PriceFetcher::new(Arc::new(source), policy, 0.0),
        registry.clone(),
    );
    let router = create_router(Arc::new(AppState {
        service,
        metrics_path: store.metrics_path(),
    }));
    (router, registry)
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, response.into_body().collect().await.unwrap().to_bytes().to_vec())
}

#[tokio::test]
async fn test_predict_serves_every_trained_model() {
    let dir = create_test_dir();
    let store = trained_store(&dir);
    let (router, registry) = app(&store, MockPriceSource::fixed(120.0), FailurePolicy::Fallback);

    let (status, body) = get(router, "/predict/").await;
    assert_eq!(status, StatusCode::OK);

    let result: PredictionResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.latest_price, 120.0);
    assert!(!result.fallback_used);
    assert_eq!(result.source, "mock");
    assert_eq!(
        result.predictions.keys().copied().collect::<Vec<_>>(),
        Algorithm::ALL.to_vec()
    );

    let direct = registry.predict_all(&FeatureRow::replicated(120.0)).unwrap();
    assert_eq!(result.predictions, direct);
    fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_predict_with_dead_upstream_uses_zero() {
    let dir = create_test_dir();
    let store = trained_store(&dir);
    let (router, _) = app(&store, MockPriceSource::failing(), FailurePolicy::Fallback);

    let (status, body) = get(router, "/predict/").await;
    assert_eq!(status, StatusCode::OK);
    let result: PredictionResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.latest_price, 0.0);
    assert!(result.fallback_used);
    assert_eq!(result.predictions.len(), 6);
    assert!(result.predictions.values().all(|p| p.is_finite()));
    fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_metrics_endpoint_serves_training_report() {
    let dir = create_test_dir();
    let store = trained_store(&dir);
    let (router, _) = app(&store, MockPriceSource::fixed(1.0), FailurePolicy::Fail);

    let (status, body) = get(router, "/metrics/").await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["training_rows"], 16);
    assert_eq!(report["test_rows"], 5);
    for name in ["LinearRegression", "DecisionTree", "RandomForest", "GradientBoosting", "XGBoost", "SVR"] {
        assert!(report["models"][name]["rmse"].is_number(), "{}", name);
    }
    fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_algorithm_of_each_loaded_model_matches_its_key() {
    let dir = create_test_dir();
    let store = trained_store(&dir);

    for algorithm in Algorithm::ALL {
        let artifact = store.load(algorithm).unwrap();
        assert_eq!(artifact.model.algorithm(), algorithm);
        assert_eq!(artifact.feature_names, vec!["lag_1", "lag_2", "lag_3", "lag_4", "lag_5"]);
    }
    fs::remove_dir_all(dir).ok();
}
