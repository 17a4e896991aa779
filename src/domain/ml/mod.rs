pub mod algorithm;
pub mod evaluation;
pub mod feature_record;
pub mod feature_registry;
pub mod prediction;

pub use algorithm::Algorithm;
pub use evaluation::{EvaluationReport, HoldoutMetrics};
pub use feature_record::FeatureRecord;
pub use feature_registry::{FEATURE_NAMES, FeatureRow, LAG_COUNT};
pub use prediction::PredictionResult;
