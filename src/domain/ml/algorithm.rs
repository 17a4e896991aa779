use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of regression algorithms trained and served.
/// The display names double as artifact file stems and response keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    LinearRegression,
    DecisionTree,
    RandomForest,
    GradientBoosting,
    #[serde(rename = "XGBoost")]
    XgBoost,
    #[serde(rename = "SVR")]
    Svr,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::LinearRegression,
        Algorithm::DecisionTree,
        Algorithm::RandomForest,
        Algorithm::GradientBoosting,
        Algorithm::XgBoost,
        Algorithm::Svr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinearRegression => "LinearRegression",
            Self::DecisionTree => "DecisionTree",
            Self::RandomForest => "RandomForest",
            Self::GradientBoosting => "GradientBoosting",
            Self::XgBoost => "XGBoost",
            Self::Svr => "SVR",
        }
    }

    pub fn artifact_file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown algorithm: {}", s))
    }
}
