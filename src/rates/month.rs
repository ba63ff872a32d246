//! Calendar-month key used to index every rate series and trajectory

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single calendar month, the unit of time for the whole simulator.
///
/// Ordering is chronological (derived from the `year`-then-`month` field
/// order), and arithmetic works on the flat month index `year * 12 + month`.
/// Serializes as its `YYYY-MM` string so it can key serialized maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month key. `month` must be in 1..=12.
    pub fn new(year: i32, month: u32) -> Self {
        assert!((1..=12).contains(&month), "month must be in 1..=12, got {month}");
        Self { year, month }
    }

    /// Month containing the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month.
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Signed number of months from `earlier` to `self`.
    pub fn months_since(self, earlier: Month) -> i64 {
        self.flat_index() - earlier.flat_index()
    }

    fn flat_index(self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Failure to parse a `YYYY-MM` month literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month '{input}', expected YYYY-MM")]
pub struct ParseMonthError {
    input: String,
}

impl FromStr for Month {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthError { input: s.to_string() };

        let (year, month) = s.split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        if !(1..=12).contains(&month) {
            return Err(err());
        }
        Ok(Month::new(year, month))
    }
}
