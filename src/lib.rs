//! Fund Simulator - monthly net-return simulation for investment fund positions
//!
//! This library provides:
//! - Month-by-month capital simulation under contributions, withdrawals and
//!   reinvestment decisions
//! - Performance-fee modeling against a reference rate (CDI or similar)
//! - Risk statistics (annualized volatility, Sharpe ratio, total return)
//! - Side-by-side alignment against external market indicators
//! - Multi-scenario batch runs

pub mod comparison;
pub mod error;
pub mod fees;
pub mod metrics;
pub mod rates;
pub mod scenario;
pub mod schedule;
pub mod simulation;

// Re-export commonly used types
pub use comparison::{align, AlignmentMode, ComparisonTable};
pub use error::{Result, SimulationError};
pub use fees::FeeConfig;
pub use metrics::{summarize, RiskSummary};
pub use rates::{Month, RateSeries};
pub use scenario::{Scenario, ScenarioRunner};
pub use schedule::{CashFlowEvent, CashFlowSchedule};
pub use simulation::{CapitalTrajectory, MonthSnapshot, SimulationConfig, SimulationEngine};
