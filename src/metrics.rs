//! Risk statistics derived from a finished trajectory
//!
//! Annualization convention: a mean monthly rate scales by 12 and a monthly
//! standard deviation by sqrt(12), so the Sharpe numerator and denominator use
//! the same simple (non-compounded) convention.

use crate::error::{Result, SimulationError};
use crate::rates::{Month, RateSeries};
use crate::simulation::CapitalTrajectory;
use serde::{Deserialize, Serialize};

/// Risk and return statistics for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// `(final_capital / initial_capital) - 1` over the whole horizon.
    pub total_net_return: f64,

    /// Sample standard deviation of monthly net returns, times sqrt(12).
    pub annualized_volatility: f64,

    /// Annualized excess return over the risk-free series, divided by the
    /// annualized volatility. Zero when the volatility is zero.
    pub sharpe_ratio: f64,

    /// Number of monthly observations in the volatility sample.
    pub observations: usize,

    /// Months dropped from the sample because the opening capital was zero
    /// (their return is undefined).
    pub excluded_months: Vec<Month>,
}

/// Compute volatility, Sharpe ratio and total return for a trajectory.
///
/// The risk-free series must cover every sampled month. Fails with
/// `DivisionByZeroCapital` for a zero initial capital and with
/// `InsufficientDataForStatistics` when fewer than two months are usable.
pub fn summarize(trajectory: &CapitalTrajectory, risk_free: &RateSeries) -> Result<RiskSummary> {
    if trajectory.initial_capital() == 0.0 {
        return Err(SimulationError::DivisionByZeroCapital);
    }

    let mut returns = Vec::with_capacity(trajectory.len());
    let mut risk_free_rates = Vec::with_capacity(trajectory.len());
    let mut excluded_months = Vec::new();

    for row in trajectory.snapshots() {
        if row.opening_capital == 0.0 {
            excluded_months.push(row.month);
            continue;
        }
        returns.push(row.net_gain / row.opening_capital);
        risk_free_rates.push(risk_free.rate_for(row.month).ok_or_else(|| {
            SimulationError::MissingRateForMonth {
                series: risk_free.name().to_string(),
                month: row.month,
            }
        })?);
    }

    let observations = returns.len();
    if observations < 2 {
        return Err(SimulationError::InsufficientDataForStatistics { observations });
    }

    let n = observations as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let annualized_volatility = variance.sqrt() * 12.0_f64.sqrt();

    let risk_free_mean = risk_free_rates.iter().sum::<f64>() / n;
    let sharpe_ratio = if annualized_volatility == 0.0 {
        0.0
    } else {
        (mean * 12.0 - risk_free_mean * 12.0) / annualized_volatility
    };

    let total_net_return = trajectory.final_capital() / trajectory.initial_capital() - 1.0;

    Ok(RiskSummary {
        total_net_return,
        annualized_volatility,
        sharpe_ratio,
        observations,
        excluded_months,
    })
}
