use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single observed spot price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PriceSample {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }

    pub fn now(price: f64) -> Self {
        Self::new(Utc::now(), price)
    }
}

/// Parses RFC 3339 first, then the space-separated `YYYY-MM-DD HH:MM:SS[.f]`
/// form (interpreted as UTC) that older price files were written with.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2025-03-01T12:30:05.250Z").unwrap();
        assert_eq!(ts.year(), 2025);
        assert_eq!(ts.second(), 5);
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_legacy_format() {
        let ts = parse_timestamp("2025-03-01 12:30:05.123456").unwrap();
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.minute(), 30);
        assert_eq!(ts.timestamp_subsec_micros(), 123456);

        let whole = parse_timestamp("2025-03-01 12:30:05").unwrap();
        assert_eq!(whole.second(), 5);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
