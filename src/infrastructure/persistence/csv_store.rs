//! Flat-file persistence for price samples and feature records.

use crate::domain::errors::DatasetError;
use crate::domain::market::PriceSample;
use crate::domain::ml::FeatureRecord;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn write_price_samples(path: &Path, samples: &[PriceSample]) -> Result<(), DatasetError> {
    write_records(path, samples)?;
    info!("Saved {} price samples to {:?}", samples.len(), path);
    Ok(())
}

pub fn read_price_samples(path: &Path) -> Result<Vec<PriceSample>, DatasetError> {
    read_records(path)
}

pub fn write_feature_records(path: &Path, records: &[FeatureRecord]) -> Result<(), DatasetError> {
    write_records(path, records)?;
    info!("Saved {} feature rows to {:?}", records.len(), path);
    Ok(())
}

pub fn read_feature_records(path: &Path) -> Result<Vec<FeatureRecord>, DatasetError> {
    read_records(path)
}

/// Overwrites `path` with a header row plus one row per record.
/// Rows go to a sibling temp file first and are renamed into place.
fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), DatasetError> {
    let io_err = |source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let temp_path = temp_path_for(path);
    {
        let mut writer = csv::Writer::from_path(&temp_path).map_err(csv_err)?;
        for record in records {
            writer.serialize(record).map_err(csv_err)?;
        }
        writer.flush().map_err(io_err)?;
    }
    fs::rename(&temp_path, path).map_err(io_err)
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let csv_err = |source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::FeatureRow;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_test_dir() -> PathBuf {
        let unique_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "pricecast_test_{}_{}_{}_csv",
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

    fn samples(n: usize) -> Vec<PriceSample> {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        (0..n)
            .map(|i| PriceSample::new(start + Duration::seconds(5 * i as i64), 64_000.0 + i as f64 * 0.25))
            .collect()
    }

    #[test]
    fn test_price_samples_round_trip_in_order() {
        let dir = create_test_dir();
        let path = dir.join("nested").join("prices.csv");
        let written = samples(4);

        write_price_samples(&path, &written).unwrap();
        let read = read_price_samples(&path).unwrap();

        assert_eq!(read, written);
        assert!(!temp_path_for(&path).exists());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_write_overwrites_previous_file() {
        let dir = create_test_dir();
        let path = dir.join("prices.csv");

        write_price_samples(&path, &samples(6)).unwrap();
        write_price_samples(&path, &samples(2)).unwrap();

        assert_eq!(read_price_samples(&path).unwrap().len(), 2);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_header_and_legacy_timestamps() {
        let dir = create_test_dir();
        let path = dir.join("legacy.csv");
        fs::write(
            &path,
            "timestamp,price\n2025-03-01 12:00:00.123456,64000.5\n2025-03-01 12:00:05.200000,64001.0\n",
        )
        .unwrap();

        let read = read_price_samples(&path).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[1].price, 64001.0);
        assert!(read[0].timestamp < read[1].timestamp);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_feature_file_columns() {
        let dir = create_test_dir();
        let path = dir.join("features.csv");
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let record = FeatureRecord::new(ts, 6.0, FeatureRow::new([5.0, 4.0, 3.0, 2.0, 1.0]));

        write_feature_records(&path, &[record]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, "timestamp,price,lag_1,lag_2,lag_3,lag_4,lag_5");
        assert_eq!(read_feature_records(&path).unwrap(), vec![record]);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_file_is_csv_error() {
        let err = read_price_samples(Path::new("/nonexistent/pricecast/prices.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Csv { .. }));
    }
}
