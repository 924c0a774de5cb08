//! Calendar dates for modification tracking.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire format of every modification date (`mdate`) in the catalog.
pub const MDATE_FORMAT: &str = "%Y-%m-%d";

/// Error raised when a string is not a `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a YYYY-MM-DD calendar date: {value:?}")]
pub struct DateError {
    /// The rejected input.
    pub value: String,
}

/// A calendar date without time-of-day.
///
/// Wraps `chrono::NaiveDate` and implements `Ord` so the inclusive cutoff
/// rule is a plain `>=` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModDate(NaiveDate);

impl ModDate {
    /// Create from a chrono date.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Create from year, month and day. Returns `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a strict `YYYY-MM-DD` string.
    ///
    /// Surrounding whitespace and trailing characters are rejected.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        // chrono tolerates leading spaces, signed years and unpadded fields;
        // mdate attributes are always `dddd-dd-dd`.
        if !has_mdate_shape(s) {
            return Err(DateError { value: s.to_string() });
        }
        NaiveDate::parse_from_str(s, MDATE_FORMAT)
            .map(Self)
            .map_err(|_| DateError { value: s.to_string() })
    }

    /// Whether this date is on or after `cutoff`.
    pub fn is_on_or_after(&self, cutoff: ModDate) -> bool {
        *self >= cutoff
    }
}

fn has_mdate_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl fmt::Display for ModDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(MDATE_FORMAT))
    }
}

impl std::str::FromStr for ModDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ModDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let d = ModDate::parse("2021-06-01").unwrap();
        assert_eq!(d, ModDate::from_ymd(2021, 6, 1).unwrap());
        assert_eq!(d.to_string(), "2021-06-01");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "2021-13-01", "2021-02-30", "2021/06/01", "yesterday", " 2021-06-01", "2021-6-1", "2021-06-01T00:00",
            " 2020-1-01", "+202-01-01", "-999-01-01", "2020-01- 1", "2020-1-001", "２０２０-01-01"] {
            let err = ModDate::parse(bad).unwrap_err();
            assert_eq!(err.value, bad);
        }
    }

    #[test]
    fn test_parse_via_from_str() {
        let d: ModDate = "0999-12-31".parse().unwrap();
        assert_eq!(d, ModDate::from_ymd(999, 12, 31).unwrap());
        assert!("2020-1-01 ".parse::<ModDate>().is_err());
    }

    #[test]
    fn test_inclusive_comparison() {
        let cutoff = ModDate::parse("2020-01-01").unwrap();
        assert!(ModDate::parse("2020-01-01").unwrap().is_on_or_after(cutoff));
        assert!(ModDate::parse("2020-01-02").unwrap().is_on_or_after(cutoff));
        assert!(!ModDate::parse("2019-12-31").unwrap().is_on_or_after(cutoff));
    }

    #[test]
    fn test_serde_as_string() {
        let d = ModDate::parse("2019-01-01").unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2019-01-01\"");
        let back: ModDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
        assert!(serde_json::from_str::<ModDate>("\"2019-99-01\"").is_err());
    }
}
