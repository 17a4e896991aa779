// Price acquisition and sampling
pub mod market_data;

// Feature engineering, training and model serving
pub mod ml;

pub mod prediction_service;

pub use prediction_service::PredictionService;
