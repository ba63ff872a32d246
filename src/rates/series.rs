//! Gap-free monthly rate series
//!
//! A `RateSeries` is the common shape for every data source the simulator
//! consumes: the fund's own returns, the reference rate (CDI or similar) and
//! any market indicator used for comparison.

use super::Month;
use serde::{Deserialize, Serialize};

/// An ordered, contiguous sequence of fractional monthly rates.
///
/// Contiguity is guaranteed by construction: the series stores a start month
/// and one rate per month from there, so gaps and duplicate months are
/// unrepresentable. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSeries {
    name: String,
    start: Month,
    rates: Vec<f64>,
}

impl RateSeries {
    /// Build a series from a start month and one fractional rate per month.
    pub fn new(name: impl Into<String>, start: Month, rates: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            start,
            rates,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// First month covered, if the series is non-empty.
    pub fn first_month(&self) -> Option<Month> {
        if self.rates.is_empty() {
            None
        } else {
            Some(self.start)
        }
    }

    /// Last month covered, if the series is non-empty.
    pub fn last_month(&self) -> Option<Month> {
        let mut month = self.first_month()?;
        for _ in 1..self.rates.len() {
            month = month.succ();
        }
        Some(month)
    }

    /// Rate for the given month, `None` when outside the covered range.
    pub fn rate_for(&self, month: Month) -> Option<f64> {
        let offset = month.months_since(self.start);
        if offset < 0 {
            return None;
        }
        self.rates.get(offset as usize).copied()
    }

    /// Whether the series covers the given month.
    pub fn covers(&self, month: Month) -> bool {
        self.rate_for(month).is_some()
    }

    /// Iterate over `(month, rate)` pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        let mut month = self.start;
        self.rates.iter().map(move |&rate| {
            let current = month;
            month = month.succ();
            (current, rate)
        })
    }

    /// Iterate over the covered months in chronological order.
    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        self.iter().map(|(month, _)| month)
    }

    /// Arithmetic mean of the monthly rates, 0 for an empty series.
    pub fn mean_rate(&self) -> f64 {
        if self.rates.is_empty() {
            return 0.0;
        }
        self.rates.iter().sum::<f64>() / self.rates.len() as f64
    }
}
