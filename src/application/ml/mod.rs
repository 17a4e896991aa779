pub mod artifact;
pub mod feature_builder;
pub mod model_registry;
pub mod models;
pub mod predictor;
pub mod trainer;

pub use artifact::ModelArtifact;
pub use feature_builder::{build_feature_records, build_features};
pub use model_registry::ModelRegistry;
pub use predictor::{Regressor, TrainedModel};
pub use trainer::{ModelTrainer, TrainingOutcome, temporal_split};
