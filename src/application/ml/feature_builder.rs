use crate::domain::market::PriceSample;
use crate::domain::ml::{FeatureRecord, FeatureRow, LAG_COUNT};

/// Orders samples by timestamp, ties keep their input order.
fn sorted_samples(samples: &[PriceSample]) -> Vec<PriceSample> {
    let mut sorted = samples.to_vec();
    sorted.sort_by_key(|s| s.timestamp);
    sorted
}

/// Lag rows for every sample with a full history: `max(0, L - LAG_COUNT)`
/// rows, where row `j` belongs to sample `j + LAG_COUNT` and its lag_k is the
/// price k samples earlier.
pub fn build_features(samples: &[PriceSample]) -> Vec<FeatureRow> {
    build_feature_records(samples)
        .iter()
        .map(FeatureRecord::row)
        .collect()
}

/// Same rows as [`build_features`], keeping the sample's timestamp and price.
pub fn build_feature_records(samples: &[PriceSample]) -> Vec<FeatureRecord> {
    let sorted = sorted_samples(samples);
    (LAG_COUNT..sorted.len())
        .map(|i| {
            let lags: [f64; LAG_COUNT] = std::array::from_fn(|k| sorted[i - k - 1].price);
            FeatureRecord::new(sorted[i].timestamp, sorted[i].price, FeatureRow::new(lags))
        })
        .collect()
}
