//! Month-by-month capital simulation

mod engine;
mod trajectory;

pub use engine::{SimulationConfig, SimulationEngine};
pub use trajectory::{CapitalTrajectory, MonthSnapshot, TrajectorySummary};
