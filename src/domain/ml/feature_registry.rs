use serde::{Deserialize, Serialize};

/// Number of lagged prices in every feature row.
pub const LAG_COUNT: usize = 5;

/// Ordered list of feature names.
/// Artifacts record this list and are rejected on load if it differs,
/// so any change here is a breaking change for persisted models.
pub const FEATURE_NAMES: [&str; LAG_COUNT] = ["lag_1", "lag_2", "lag_3", "lag_4", "lag_5"];

/// Fixed-width lag vector. `lags[k - 1]` holds lag_k, the price observed
/// k samples before the row's own sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub lags: [f64; LAG_COUNT],
}

impl FeatureRow {
    pub fn new(lags: [f64; LAG_COUNT]) -> Self {
        Self { lags }
    }

    /// Serving-time row: the single live price copied into every lag slot.
    pub fn replicated(price: f64) -> Self {
        Self {
            lags: [price; LAG_COUNT],
        }
    }

    /// lag_k for k in 1..=LAG_COUNT.
    pub fn lag(&self, k: usize) -> Option<f64> {
        k.checked_sub(1).and_then(|i| self.lags.get(i)).copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.lags.to_vec()
    }
}

pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Rows as the nested vectors smartcore's `DenseMatrix::from_2d_vec` expects.
pub fn rows_to_matrix_input(rows: &[FeatureRow]) -> Vec<Vec<f64>> {
    rows.iter().map(FeatureRow::to_vec).collect()
}
