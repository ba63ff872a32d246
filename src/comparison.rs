//! Side-by-side alignment of a trajectory with indicator series
//!
//! Builds the month-by-month table the report/export layer renders: the fund's
//! net return next to each selected indicator. Indicator rates are reported as
//! given, never transformed.

use crate::rates::{Month, RateSeries};
use crate::simulation::CapitalTrajectory;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

/// Which month axis the table is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlignmentMode {
    /// Only months present in the trajectory and in every indicator.
    #[default]
    Intersection,
    /// Every month seen anywhere; missing cells stay absent (not zero).
    Union,
}

/// One month of the comparison table. `None` cells mean "no data", which is
/// distinct from a zero return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub month: Month,
    pub fund_return: Option<f64>,
    /// One cell per indicator, in the caller-supplied column order.
    pub indicator_returns: Vec<Option<f64>>,
}

/// Month-indexed comparison of fund net returns against indicator series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub indicator_names: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Write the table as CSV: `month,fund,<indicator...>`, empty cells for
    /// absent data.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut out = csv::Writer::from_writer(writer);

        let mut header = vec!["month".to_string(), "fund".to_string()];
        header.extend(self.indicator_names.iter().cloned());
        out.write_record(&header)?;

        let fmt = |cell: Option<f64>| cell.map_or(String::new(), |v| format!("{v:.8}"));
        for row in &self.rows {
            let mut record = vec![row.month.to_string(), fmt(row.fund_return)];
            record.extend(row.indicator_returns.iter().map(|&cell| fmt(cell)));
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Align a trajectory's net returns with indicator series on a common month
/// axis. Months ascend; indicator columns keep the caller's order.
pub fn align(
    trajectory: &CapitalTrajectory,
    indicators: &[&RateSeries],
    mode: AlignmentMode,
) -> ComparisonTable {
    let fund_returns: BTreeMap<Month, f64> = trajectory
        .snapshots()
        .iter()
        .map(|row| (row.month, row.net_rate))
        .collect();

    let months: Vec<Month> = match mode {
        AlignmentMode::Intersection => fund_returns
            .keys()
            .copied()
            .filter(|&month| indicators.iter().all(|series| series.covers(month)))
            .collect(),
        AlignmentMode::Union => {
            let mut months: BTreeSet<Month> = fund_returns.keys().copied().collect();
            for series in indicators {
                months.extend(series.months());
            }
            months.into_iter().collect()
        }
    };

    let rows = months
        .into_iter()
        .map(|month| ComparisonRow {
            month,
            fund_return: fund_returns.get(&month).copied(),
            indicator_returns: indicators
                .iter()
                .map(|series| series.rate_for(month))
                .collect(),
        })
        .collect();

    ComparisonTable {
        indicator_names: indicators.iter().map(|s| s.name().to_string()).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::FeeConfig;
    use crate::schedule::CashFlowSchedule;
    use crate::simulation::{SimulationConfig, SimulationEngine};

    fn trajectory(start: Month, months: usize) -> CapitalTrajectory {
        let fund = RateSeries::new("fund", start, vec![0.01; months]);
        let cdi = RateSeries::new("CDI", start, vec![0.008; months]);
        SimulationEngine::new(SimulationConfig {
            initial_capital: 100_000.0,
            fees: FeeConfig::new(1.0, 0.0),
            extend_beyond_rates: false,
        })
        .run(&fund, &cdi, &CashFlowSchedule::new())
        .unwrap()
    }

    #[test]
    fn test_intersection_drops_uncovered_months() {
        let start = Month::new(2024, 1);
        let run = trajectory(start, 4);
        // Indicator starts one month late.
        let ibov = RateSeries::new("IBOVESPA", Month::new(2024, 2), vec![0.02, -0.01, 0.005]);

        let table = align(&run, &[&ibov], AlignmentMode::Intersection);

        assert_eq!(table.indicator_names, vec!["IBOVESPA"]);
        let months: Vec<_> = table.rows.iter().map(|r| r.month).collect();
        assert_eq!(
            months,
            vec![Month::new(2024, 2), Month::new(2024, 3), Month::new(2024, 4)]
        );
        for row in &table.rows {
            assert!(row.fund_return.is_some());
            assert!(row.indicator_returns[0].is_some());
        }
    }

    #[test]
    fn test_union_marks_gaps_as_absent() {
        let start = Month::new(2024, 1);
        let run = trajectory(start, 2);
        let ibov = RateSeries::new("IBOVESPA", Month::new(2024, 2), vec![0.02, -0.01]);

        let table = align(&run, &[&ibov], AlignmentMode::Union);

        assert_eq!(table.rows.len(), 3);
        // 2024-01: fund only.
        assert!(table.rows[0].fund_return.is_some());
        assert_eq!(table.rows[0].indicator_returns[0], None);
        // 2024-03: indicator only.
        assert_eq!(table.rows[2].fund_return, None);
        assert_eq!(table.rows[2].indicator_returns[0], Some(-0.01));
    }

    #[test]
    fn test_indicator_rates_pass_through_and_columns_keep_order() {
        let start = Month::new(2024, 1);
        let run = trajectory(start, 2);
        let cdi = RateSeries::new("CDI", start, vec![0.008, 0.0081]);
        let ipca = RateSeries::new("IPCA", start, vec![0.004, 0.0042]);

        let table = align(&run, &[&ipca, &cdi], AlignmentMode::Intersection);

        assert_eq!(table.indicator_names, vec!["IPCA", "CDI"]);
        assert_eq!(table.rows[0].indicator_returns, vec![Some(0.004), Some(0.008)]);
        assert_eq!(table.rows[0].fund_return, Some(0.01));
    }

    #[test]
    fn test_csv_export_shape() {
        let start = Month::new(2024, 1);
        let run = trajectory(start, 2);
        let cdi = RateSeries::new("CDI", start, vec![0.008, 0.0081]);
        let table = align(&run, &[&cdi], AlignmentMode::Intersection);

        let mut buffer = Vec::new();
        table.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("month,fund,CDI"));
        assert!(lines.next().unwrap().starts_with("2024-01,0.01000000,0.00800000"));
    }
}
