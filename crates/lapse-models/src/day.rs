//! Calendar day keys.
//!
//! A [`DayKey`] identifies one day's frame bucket and its derived daily
//! video. It renders as `YYYY-MM-DD`, which doubles as the bucket directory
//! name and the daily video file stem, so lexicographic order equals
//! calendar order.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a day key from a string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DayKeyError {
    #[error("Invalid day key: {0}")]
    InvalidFormat(String),
}

/// One calendar date, the identity of a frame bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Create a day key from a calendar date.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The underlying calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = DayKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DayKeyError::InvalidFormat(s.to_string()))
    }
}

impl TryFrom<String> for DayKey {
    type Error = DayKeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.to_string()
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let key: DayKey = "2024-01-05".parse().unwrap();
        assert_eq!(key.to_string(), "2024-01-05");
        assert_eq!(key.date().to_string(), "2024-01-05");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("not-a-date".parse::<DayKey>().is_err());
        assert!("2024-13-40".parse::<DayKey>().is_err());
        assert!("20240105".parse::<DayKey>().is_err());
    }

    #[test]
    fn test_ordering_matches_calendar() {
        let a: DayKey = "2024-01-05".parse().unwrap();
        let b: DayKey = "2024-01-06".parse().unwrap();
        let c: DayKey = "2024-02-01".parse().unwrap();
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a.succ(), b);
    }

    #[test]
    fn test_serde_as_string() {
        let key: DayKey = "2024-01-05".parse().unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-01-05\"");
        let back: DayKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
