//! Error taxonomy for simulation runs
//!
//! Every variant is a recoverable, caller-facing condition. A run aborts on the
//! first error so callers never observe a half-built trajectory.

use crate::rates::Month;
use thiserror::Error;

/// Convenience alias used throughout the core.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// All failure modes of the simulation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A fee fraction outside [0, 1] was supplied.
    #[error("fee fraction {value} is outside [0, 1]")]
    InvalidFeeFraction { value: f64 },

    /// A required month is absent from a rate series.
    #[error("series '{series}' has no rate for month {month}")]
    MissingRateForMonth { series: String, month: Month },

    /// A negative contribution or withdrawal was scheduled.
    #[error("negative {flow} of {amount} scheduled for month {month}")]
    InvalidCashFlowAmount {
        month: Month,
        flow: &'static str,
        amount: f64,
    },

    /// A scheduled withdrawal exceeds the capital available that month.
    #[error(
        "withdrawal of {requested:.2} in month {month} exceeds available capital {available:.2}"
    )]
    InsufficientCapitalForWithdrawal {
        month: Month,
        requested: f64,
        available: f64,
    },

    /// Volatility/Sharpe need at least two monthly observations.
    #[error("risk statistics need at least 2 monthly observations, got {observations}")]
    InsufficientDataForStatistics { observations: usize },

    /// Total return is undefined when the initial capital is zero.
    #[error("total return is undefined for an initial capital of zero")]
    DivisionByZeroCapital,
}
