//! File locations for price data, features and model artifacts.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StorageEnvConfig {
    pub data_dir: PathBuf,
    pub prices_file: String,
    pub features_file: String,
    pub models_dir: PathBuf,
}

impl Default for StorageEnvConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            prices_file: "bitcoin_prices.csv".to_string(),
            features_file: "preprocessed_crypto.csv".to_string(),
            models_dir: PathBuf::from("models"),
        }
    }
}

impl StorageEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            prices_file: lookup("PRICES_FILE").unwrap_or(defaults.prices_file),
            features_file: lookup("FEATURES_FILE").unwrap_or(defaults.features_file),
            models_dir: lookup("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.models_dir),
        }
    }

    pub fn prices_path(&self) -> PathBuf {
        self.data_dir.join(&self.prices_file)
    }

    pub fn features_path(&self) -> PathBuf {
        self.data_dir.join(&self.features_file)
    }
}
