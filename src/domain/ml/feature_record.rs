use super::feature_registry::FeatureRow;
use crate::domain::market::price_sample::deserialize_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the preprocessed feature file: the sample itself plus its
/// five lagged prices. `price` is the training target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub lag_1: f64,
    pub lag_2: f64,
    pub lag_3: f64,
    pub lag_4: f64,
    pub lag_5: f64,
}

impl FeatureRecord {
    pub fn new(timestamp: DateTime<Utc>, price: f64, row: FeatureRow) -> Self {
        let [lag_1, lag_2, lag_3, lag_4, lag_5] = row.lags;
        Self {
            timestamp,
            price,
            lag_1,
            lag_2,
            lag_3,
            lag_4,
            lag_5,
        }
    }

    pub fn row(&self) -> FeatureRow {
        FeatureRow::new([self.lag_1, self.lag_2, self.lag_3, self.lag_4, self.lag_5])
    }
}

/// Splits records into model inputs and targets.
pub fn into_training_set(records: &[FeatureRecord]) -> (Vec<FeatureRow>, Vec<f64>) {
    records.iter().map(|r| (r.row(), r.price)).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_row_round_trip() {
        let row = FeatureRow::new([5.0, 4.0, 3.0, 2.0, 1.0]);
        let record = FeatureRecord::new(Utc::now(), 6.0, row);
        assert_eq!(record.lag_1, 5.0);
        assert_eq!(record.lag_5, 1.0);
        assert_eq!(record.row(), row);
    }
}
