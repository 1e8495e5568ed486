//! Billing cycle tags.
//!
//! A cycle tag buckets movements and ledger rows into a statement period,
//! formatted as `YYYY-MM`.

use serde::{Deserialize, Serialize};

/// A `YYYY-MM` statement period key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleTag(String);

impl CycleTag {
    /// Builds a cycle tag for the given year and month.
    ///
    /// # Errors
    ///
    /// Returns an error if the month is outside 1..=12.
    pub fn from_parts(year: i32, month: u32) -> Result<Self, String> {
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid month: {month}"));
        }
        Ok(Self(format!("{year:04}-{month:02}")))
    }

    /// Builds the cycle tag containing the given date.
    #[must_use]
    pub fn from_date(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        Self(format!("{:04}-{:02}", date.year(), date.month()))
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CycleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CycleTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[4] == b'-'
            && bytes[5..].iter().all(u8::is_ascii_digit);

        if !well_formed {
            return Err(format!("Invalid cycle tag (expected YYYY-MM): {s}"));
        }

        let month: u32 = s[5..7].parse().map_err(|_| format!("Invalid month: {s}"))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid month in cycle tag: {s}"));
        }

        Ok(Self(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_valid_cycle_tags() {
        assert_eq!(CycleTag::from_str("2025-09").unwrap().as_str(), "2025-09");
        assert_eq!(CycleTag::from_str("1999-12").unwrap().as_str(), "1999-12");
        assert_eq!(CycleTag::from_str("2025-01").unwrap().as_str(), "2025-01");
    }

    #[test]
    fn test_invalid_cycle_tags() {
        assert!(CycleTag::from_str("2025-13").is_err());
        assert!(CycleTag::from_str("2025-00").is_err());
        assert!(CycleTag::from_str("2025-9").is_err());
        assert!(CycleTag::from_str("202509").is_err());
        assert!(CycleTag::from_str("").is_err());
        assert!(CycleTag::from_str("abcd-ef").is_err());
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(CycleTag::from_parts(2025, 9).unwrap().as_str(), "2025-09");
        assert!(CycleTag::from_parts(2025, 13).is_err());
    }

    #[test]
    fn test_from_date() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 9, 14).unwrap();
        assert_eq!(CycleTag::from_date(date).as_str(), "2025-09");
    }
}
