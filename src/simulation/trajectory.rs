//! Trajectory output structures for simulation runs

use crate::rates::Month;
use serde::{Deserialize, Serialize};

/// One month of the capital walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSnapshot {
    pub month: Month,

    /// Capital at the start of the month (= prior month's closing capital).
    pub opening_capital: f64,

    /// Gross fund rate applied this month.
    pub gross_rate: f64,

    /// Rate actually credited after the performance fee.
    pub net_rate: f64,

    /// Dollar gain from the net rate (`opening_capital * net_rate`).
    pub net_gain: f64,

    /// Contribution added after growth.
    pub contribution: f64,

    /// Withdrawal taken after growth and contribution.
    pub withdrawal: f64,

    /// Gain paid out instead of compounded when reinvestment is off.
    pub distribution: f64,

    /// Capital at the end of the month, next month's opening capital.
    pub closing_capital: f64,
}

/// Complete result of one simulation run.
///
/// Produced once by the engine and immutable afterwards; downstream consumers
/// (risk metrics, comparison, export) only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalTrajectory {
    initial_capital: f64,
    snapshots: Vec<MonthSnapshot>,
}

impl CapitalTrajectory {
    pub(crate) fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            snapshots: Vec::new(),
        }
    }

    pub(crate) fn add_row(&mut self, row: MonthSnapshot) {
        self.snapshots.push(row);
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn snapshots(&self) -> &[MonthSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Closing capital of the last month, or the initial capital for an empty
    /// trajectory.
    pub fn final_capital(&self) -> f64 {
        self.snapshots
            .last()
            .map_or(self.initial_capital, |row| row.closing_capital)
    }

    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        self.snapshots.iter().map(|row| row.month)
    }

    /// Aggregate totals over the whole run.
    pub fn summary(&self) -> TrajectorySummary {
        TrajectorySummary {
            months: self.snapshots.len() as u32,
            initial_capital: self.initial_capital,
            final_capital: self.final_capital(),
            total_contributions: self.snapshots.iter().map(|r| r.contribution).sum(),
            total_withdrawals: self.snapshots.iter().map(|r| r.withdrawal).sum(),
            total_distributions: self.snapshots.iter().map(|r| r.distribution).sum(),
            total_net_gain: self.snapshots.iter().map(|r| r.net_gain).sum(),
        }
    }
}

/// Run-level totals for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub months: u32,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_contributions: f64,
    pub total_withdrawals: f64,
    pub total_distributions: f64,
    pub total_net_gain: f64,
}
