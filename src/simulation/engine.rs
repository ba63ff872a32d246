//! Core simulation engine: folds fees and cash flows over a rate series
//!
//! Each run is a synchronous, deterministic walk over the fund's months. The
//! run is all-or-nothing: any error aborts it and no partial trajectory is
//! returned.

use super::trajectory::{CapitalTrajectory, MonthSnapshot};
use crate::error::{Result, SimulationError};
use crate::fees::FeeConfig;
use crate::rates::{Month, RateSeries};
use crate::schedule::CashFlowSchedule;

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Capital at the start of the first month. Zero is legal when the
    /// schedule funds the position through contributions.
    pub initial_capital: f64,

    /// Fee parameters applied every month.
    pub fees: FeeConfig,

    /// When true, schedule entries past the end of the fund series are walked
    /// at zero growth instead of failing with `MissingRateForMonth`.
    pub extend_beyond_rates: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_capital: 0.0,
            fees: FeeConfig::default(),
            extend_beyond_rates: false,
        }
    }
}

/// Main simulation engine.
pub struct SimulationEngine {
    config: SimulationConfig,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the month-by-month capital walk.
    ///
    /// The horizon is the fund series' month range, extended to the last
    /// scheduled event when `extend_beyond_rates` is set. Both series must
    /// cover every in-range month; the engine never interpolates.
    pub fn run(
        &self,
        fund: &RateSeries,
        reference: &RateSeries,
        schedule: &CashFlowSchedule,
    ) -> Result<CapitalTrajectory> {
        self.config.fees.validate()?;

        let mut trajectory = CapitalTrajectory::new(self.config.initial_capital);

        let (Some(start), Some(rates_end)) = (fund.first_month(), fund.last_month()) else {
            return Ok(trajectory);
        };

        // Scheduled events outside the rate data are an error unless the
        // caller opted into extending past the end at zero growth.
        for (month, event) in schedule.iter() {
            if event.is_passive() {
                continue;
            }
            if month < start || (month > rates_end && !self.config.extend_beyond_rates) {
                return Err(SimulationError::MissingRateForMonth {
                    series: fund.name().to_string(),
                    month,
                });
            }
        }

        let end = if self.config.extend_beyond_rates {
            schedule.last_month().map_or(rates_end, |m| m.max(rates_end))
        } else {
            rates_end
        };

        let mut capital = self.config.initial_capital;
        let mut month = start;
        loop {
            let row = self.step(month, capital, fund, reference, schedule, rates_end)?;
            capital = row.closing_capital;
            trajectory.add_row(row);

            if month == end {
                break;
            }
            month = month.succ();
        }

        log::debug!(
            "simulated {} months, {:.2} -> {:.2}",
            trajectory.len(),
            self.config.initial_capital,
            capital,
        );
        Ok(trajectory)
    }

    /// Compute one month of the walk.
    fn step(
        &self,
        month: Month,
        opening_capital: f64,
        fund: &RateSeries,
        reference: &RateSeries,
        schedule: &CashFlowSchedule,
        rates_end: Month,
    ) -> Result<MonthSnapshot> {
        let event = schedule.event_for(month);
        if event.contribution < 0.0 {
            return Err(SimulationError::InvalidCashFlowAmount {
                month,
                flow: "contribution",
                amount: event.contribution,
            });
        }
        if event.withdrawal < 0.0 {
            return Err(SimulationError::InvalidCashFlowAmount {
                month,
                flow: "withdrawal",
                amount: event.withdrawal,
            });
        }

        // Past the rate data (extend mode only) the position sits flat.
        let (gross_rate, reference_rate) = if month > rates_end {
            (0.0, 0.0)
        } else {
            let gross = fund
                .rate_for(month)
                .ok_or_else(|| SimulationError::MissingRateForMonth {
                    series: fund.name().to_string(),
                    month,
                })?;
            let reference_rate =
                reference
                    .rate_for(month)
                    .ok_or_else(|| SimulationError::MissingRateForMonth {
                        series: reference.name().to_string(),
                        month,
                    })?;
            (gross, reference_rate)
        };

        let net_rate = self.config.fees.net_rate(gross_rate, reference_rate)?;

        let grown = opening_capital * (1.0 + net_rate);
        let net_gain = grown - opening_capital;

        let available = grown + event.contribution;
        if event.withdrawal > available {
            return Err(SimulationError::InsufficientCapitalForWithdrawal {
                month,
                requested: event.withdrawal,
                available,
            });
        }
        let after_flows = available - event.withdrawal;

        // Non-reinvested months pay the gain out so later months compound on
        // principal only. Losses stay in the position, and the payout never
        // takes the capital below zero after a same-month withdrawal.
        let distribution = if event.reinvest {
            0.0
        } else {
            net_gain.max(0.0).min(after_flows)
        };
        let closing_capital = after_flows - distribution;

        Ok(MonthSnapshot {
            month,
            opening_capital,
            gross_rate,
            net_rate,
            net_gain,
            contribution: event.contribution,
            withdrawal: event.withdrawal,
            distribution,
            closing_capital,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::CashFlowEvent;
    use approx::assert_relative_eq;

    fn flat_series(name: &str, start: Month, rate: f64, months: usize) -> RateSeries {
        RateSeries::new(name, start, vec![rate; months])
    }

    fn engine(initial_capital: f64, performance_fee: f64) -> SimulationEngine {
        SimulationEngine::new(SimulationConfig {
            initial_capital,
            fees: FeeConfig::new(1.0, performance_fee),
            extend_beyond_rates: false,
        })
    }

    #[test]
    fn test_flat_run_compounds_net_rate() {
        // 1.2% gross, 0.8% reference, 30% performance fee -> 1.08% net
        let start = Month::new(2024, 1);
        let fund = flat_series("fund", start, 0.012, 3);
        let cdi = flat_series("CDI", start, 0.008, 3);

        let trajectory = engine(100_000.0, 0.30)
            .run(&fund, &cdi, &CashFlowSchedule::new())
            .unwrap();

        assert_eq!(trajectory.len(), 3);
        for row in trajectory.snapshots() {
            assert_relative_eq!(row.net_rate, 0.0108, epsilon = 1e-12);
        }
        assert_relative_eq!(
            trajectory.final_capital(),
            100_000.0 * 1.0108_f64.powi(3),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_closing_equals_next_opening() {
        let start = Month::new(2024, 1);
        let fund = RateSeries::new("fund", start, vec![0.01, -0.02, 0.015, 0.003]);
        let cdi = flat_series("CDI", start, 0.008, 4);
        let mut schedule = CashFlowSchedule::new();
        schedule.set(Month::new(2024, 2), CashFlowEvent::contribution(5_000.0));
        schedule.set(Month::new(2024, 3), CashFlowEvent::withdrawal(2_000.0));

        let trajectory = engine(50_000.0, 0.30).run(&fund, &cdi, &schedule).unwrap();

        for pair in trajectory.snapshots().windows(2) {
            assert_relative_eq!(pair[0].closing_capital, pair[1].opening_capital);
        }
    }

    #[test]
    fn test_withdrawal_exceeding_capital_aborts() {
        let start = Month::new(2024, 1);
        let fund = flat_series("fund", start, 0.012, 3);
        let cdi = flat_series("CDI", start, 0.008, 3);
        let mut schedule = CashFlowSchedule::new();
        schedule.set(Month::new(2024, 2), CashFlowEvent::withdrawal(200_000.0));

        let err = engine(100_000.0, 0.30).run(&fund, &cdi, &schedule).unwrap_err();
        match err {
            SimulationError::InsufficientCapitalForWithdrawal { month, requested, .. } => {
                assert_eq!(month, Month::new(2024, 2));
                assert_eq!(requested, 200_000.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_reference_month_names_series_and_month() {
        let start = Month::new(2024, 1);
        let fund = flat_series("fund", start, 0.012, 3);
        // Reference stops one month short of the fund data.
        let cdi = flat_series("CDI", start, 0.008, 2);

        let err = engine(100_000.0, 0.30)
            .run(&fund, &cdi, &CashFlowSchedule::new())
            .unwrap_err();
        assert_eq!(
            err,
            SimulationError::MissingRateForMonth {
                series: "CDI".to_string(),
                month: Month::new(2024, 3),
            }
        );
    }

    #[test]
    fn test_negative_contribution_rejected() {
        let start = Month::new(2024, 1);
        let fund = flat_series("fund", start, 0.012, 2);
        let cdi = flat_series("CDI", start, 0.008, 2);
        let mut schedule = CashFlowSchedule::new();
        schedule.set(start, CashFlowEvent::contribution(-100.0));

        let err = engine(100_000.0, 0.30).run(&fund, &cdi, &schedule).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidCashFlowAmount { .. }));
    }

    #[test]
    fn test_negative_withdrawal_rejected() {
        let start = Month::new(2024, 1);
        let fund = flat_series("fund", start, 0.012, 2);
        let cdi = flat_series("CDI", start, 0.008, 2);
        let mut schedule = CashFlowSchedule::new();
        schedule.set(start, CashFlowEvent::withdrawal(-50.0));

        let err = engine(100_000.0, 0.30).run(&fund, &cdi, &schedule).unwrap_err();
        assert_eq!(
            err,
            SimulationError::InvalidCashFlowAmount {
                month: start,
                flow: "withdrawal",
                amount: -50.0,
            }
        );
    }

    #[test]
    fn test_zero_initial_capital_with_contributions() {
        let start = Month::new(2024, 1);
        let fund = flat_series("fund", start, 0.01, 3);
        let cdi = flat_series("CDI", start, 0.008, 3);
        let schedule = CashFlowSchedule::flat(start, 3, CashFlowEvent::contribution(1_000.0));

        let trajectory = engine(0.0, 0.30).run(&fund, &cdi, &schedule).unwrap();
        assert_eq!(trajectory.len(), 3);
        assert!(trajectory.final_capital() > 3_000.0);
    }

    #[test]
    fn test_non_reinvested_gain_is_distributed() {
        let start = Month::new(2024, 1);
        let fund = flat_series("fund", start, 0.01, 2);
        let cdi = flat_series("CDI", start, 0.008, 2);
        let mut schedule = CashFlowSchedule::new();
        schedule.set(start, CashFlowEvent::default().with_reinvest(false));
        schedule.set(start.succ(), CashFlowEvent::default().with_reinvest(false));

        let trajectory = engine(100_000.0, 0.0).run(&fund, &cdi, &schedule).unwrap();

        // Gain is carved out each month, so principal never compounds.
        let first = &trajectory.snapshots()[0];
        assert_relative_eq!(first.distribution, 1_000.0, epsilon = 1e-9);
        assert_relative_eq!(first.closing_capital, 100_000.0, epsilon = 1e-9);

        let second = &trajectory.snapshots()[1];
        assert_relative_eq!(second.opening_capital, 100_000.0, epsilon = 1e-9);
        assert_relative_eq!(second.distribution, 1_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_loss_is_not_distributed() {
        let start = Month::new(2024, 1);
        let fund = flat_series("fund", start, -0.01, 1);
        let cdi = flat_series("CDI", start, 0.008, 1);
        let mut schedule = CashFlowSchedule::new();
        schedule.set(start, CashFlowEvent::default().with_reinvest(false));

        let trajectory = engine(100_000.0, 0.0).run(&fund, &cdi, &schedule).unwrap();
        let row = &trajectory.snapshots()[0];
        assert_eq!(row.distribution, 0.0);
        assert_relative_eq!(row.closing_capital, 99_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extend_beyond_rates_walks_schedule_at_zero_growth() {
        let start = Month::new(2024, 1);
        let fund = flat_series("fund", start, 0.01, 2);
        let cdi = flat_series("CDI", start, 0.008, 2);
        let mut schedule = CashFlowSchedule::new();
        schedule.set(Month::new(2024, 4), CashFlowEvent::contribution(1_000.0));

        // Without the opt-in, a schedule entry past the rate data is a
        // missing-rate failure naming the scheduled month.
        let err = engine(10_000.0, 0.0).run(&fund, &cdi, &schedule).unwrap_err();
        assert_eq!(
            err,
            SimulationError::MissingRateForMonth {
                series: "fund".to_string(),
                month: Month::new(2024, 4),
            }
        );

        let extended = SimulationEngine::new(SimulationConfig {
            initial_capital: 10_000.0,
            fees: FeeConfig::new(1.0, 0.0),
            extend_beyond_rates: true,
        })
        .run(&fund, &cdi, &schedule)
        .unwrap();

        assert_eq!(extended.len(), 4);
        let tail = &extended.snapshots()[2..];
        assert_eq!(tail[0].gross_rate, 0.0);
        assert_eq!(tail[0].net_gain, 0.0);
        assert_relative_eq!(tail[1].contribution, 1_000.0);
    }

    #[test]
    fn test_summary_totals() {
        let start = Month::new(2024, 1);
        let fund = RateSeries::new("fund", start, vec![0.012, -0.004, 0.02]);
        let cdi = flat_series("CDI", start, 0.008, 3);
        let mut schedule = CashFlowSchedule::new();
        schedule.set(Month::new(2024, 2), CashFlowEvent::contribution(2_000.0));
        schedule.set(Month::new(2024, 3), CashFlowEvent::withdrawal(1_000.0));

        let trajectory = engine(60_000.0, 0.30).run(&fund, &cdi, &schedule).unwrap();
        let totals = trajectory.summary();

        assert_eq!(totals.months, 3);
        assert_eq!(totals.initial_capital, 60_000.0);
        assert_eq!(totals.final_capital, trajectory.final_capital());
        assert_relative_eq!(totals.total_contributions, 2_000.0);
        assert_relative_eq!(totals.total_withdrawals, 1_000.0);
        assert_eq!(totals.total_distributions, 0.0);
        assert_relative_eq!(
            totals.total_net_gain,
            trajectory.snapshots().iter().map(|r| r.net_gain).sum::<f64>()
        );

        // Totals reconcile: gains plus flows account for the capital change.
        assert_relative_eq!(
            totals.final_capital,
            totals.initial_capital + totals.total_net_gain + totals.total_contributions
                - totals.total_withdrawals
                - totals.total_distributions,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_idempotent_runs() {
        let start = Month::new(2024, 1);
        let fund = RateSeries::new("fund", start, vec![0.012, -0.004, 0.02, 0.001]);
        let cdi = flat_series("CDI", start, 0.008, 4);
        let mut schedule = CashFlowSchedule::new();
        schedule.set(Month::new(2024, 2), CashFlowEvent::contribution(500.0));
        schedule.set(
            Month::new(2024, 3),
            CashFlowEvent::withdrawal(250.0).with_reinvest(false),
        );

        let engine = engine(75_000.0, 0.30);
        let first = engine.run(&fund, &cdi, &schedule).unwrap();
        let second = engine.run(&fund, &cdi, &schedule).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reconciliation_invariant() {
        // Final capital must equal the independent recomputation from the
        // snapshot list: compound each month's net rate, add contributions,
        // subtract withdrawals and distributions.
        let start = Month::new(2024, 1);
        let fund = RateSeries::new("fund", start, vec![0.012, 0.009, -0.003, 0.02, 0.005]);
        let cdi = flat_series("CDI", start, 0.008, 5);
        let mut schedule = CashFlowSchedule::new();
        schedule.set(Month::new(2024, 2), CashFlowEvent::contribution(2_000.0));
        schedule.set(Month::new(2024, 4), CashFlowEvent::withdrawal(1_500.0));
        schedule.set(Month::new(2024, 5), CashFlowEvent::default().with_reinvest(false));

        let trajectory = engine(40_000.0, 0.30).run(&fund, &cdi, &schedule).unwrap();

        let mut capital = trajectory.initial_capital();
        for row in trajectory.snapshots() {
            capital = capital * (1.0 + row.net_rate) + row.contribution
                - row.withdrawal
                - row.distribution;
        }
        assert_relative_eq!(capital, trajectory.final_capital(), epsilon = 1e-9);
    }
}
