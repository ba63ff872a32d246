//! CSV-based rate series loader
//!
//! Realizes the data-retrieval contract at the file boundary: whatever fetched
//! the data (central bank API export, fund administrator report), it arrives
//! here as a `month,rate` CSV and leaves as a validated gap-free `RateSeries`.

use super::{Month, RateSeries};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::path::Path;

/// How rate values are expressed in the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateUnit {
    /// Fractional monthly rates (0.008 for 0.8%), the simulator's native unit.
    Fraction,
    /// Percentage points (0.8 for 0.8%), the unit used by BCB-style exports.
    Percent,
}

/// Load a rate series from a `month,rate` CSV file with a header row.
///
/// Months must be `YYYY-MM`. Rows may arrive unsorted; duplicates and gaps are
/// rejected.
pub fn load_rate_series(path: &Path, name: &str, unit: RateUnit) -> Result<RateSeries> {
    let file = File::open(path)
        .with_context(|| format!("cannot open rate series file {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut points = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("bad CSV record in {}", path.display()))?;
        if record.len() < 2 {
            bail!("{} line {}: expected month,rate columns", path.display(), line + 2);
        }
        let month: Month = record[0]
            .trim()
            .parse()
            .with_context(|| format!("{} line {}", path.display(), line + 2))?;
        let mut rate: f64 = record[1]
            .trim()
            .parse()
            .with_context(|| format!("{} line {}: bad rate '{}'", path.display(), line + 2, &record[1]))?;
        if unit == RateUnit::Percent {
            rate /= 100.0;
        }
        points.push((month, rate));
    }

    let series = series_from_points(name, points)?;
    if let (Some(first), Some(last)) = (series.first_month(), series.last_month()) {
        log::info!(
            "loaded series '{}' from {}: {} months ({first} to {last})",
            name,
            path.display(),
            series.len(),
        );
    }
    Ok(series)
}

/// Assemble a `RateSeries` from unsorted `(month, rate)` points, validating
/// that the months form a gap-free run with no duplicates.
pub fn series_from_points(name: &str, mut points: Vec<(Month, f64)>) -> Result<RateSeries> {
    if points.is_empty() {
        bail!("rate series '{name}' has no data points");
    }
    points.sort_by_key(|(month, _)| *month);

    for pair in points.windows(2) {
        let (prev, next) = (pair[0].0, pair[1].0);
        if next == prev {
            bail!("rate series '{name}' has a duplicate entry for month {prev}");
        }
        if next != prev.succ() {
            bail!("rate series '{name}' has a gap between {prev} and {next}");
        }
    }

    if let Some((month, rate)) = points.iter().find(|(_, rate)| rate.abs() > 1.0) {
        log::warn!(
            "series '{name}' month {month}: rate {rate} exceeds 100% monthly, check the input unit"
        );
    }

    let start = points[0].0;
    let rates = points.into_iter().map(|(_, rate)| rate).collect();
    Ok(RateSeries::new(name, start, rates))
}
