//! Scenario runner for batch simulations
//!
//! Binds the rate data once, then runs many what-if configurations against it.
//! Runs are independent pure folds, so batches go through rayon.

use crate::error::Result;
use crate::rates::RateSeries;
use crate::schedule::CashFlowSchedule;
use crate::simulation::{CapitalTrajectory, SimulationConfig, SimulationEngine};
use rayon::prelude::*;

/// One named what-if case: a configuration plus its cash-flow schedule.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub label: String,
    pub config: SimulationConfig,
    pub schedule: CashFlowSchedule,
}

/// Pre-loaded runner over a fixed fund/reference pair.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    fund: RateSeries,
    reference: RateSeries,
}

impl ScenarioRunner {
    pub fn new(fund: RateSeries, reference: RateSeries) -> Self {
        Self { fund, reference }
    }

    pub fn fund(&self) -> &RateSeries {
        &self.fund
    }

    pub fn reference(&self) -> &RateSeries {
        &self.reference
    }

    /// Run a single configuration.
    pub fn run(
        &self,
        config: SimulationConfig,
        schedule: &CashFlowSchedule,
    ) -> Result<CapitalTrajectory> {
        SimulationEngine::new(config).run(&self.fund, &self.reference, schedule)
    }

    /// Run one configuration across many schedules in parallel, keeping input
    /// order. Each schedule fails or succeeds on its own.
    pub fn run_batch(
        &self,
        config: SimulationConfig,
        schedules: &[CashFlowSchedule],
    ) -> Vec<Result<CapitalTrajectory>> {
        schedules
            .par_iter()
            .map(|schedule| self.run(config.clone(), schedule))
            .collect()
    }

    /// Run every scenario in parallel, keeping input order. Each scenario
    /// fails or succeeds on its own; one bad configuration does not abort the
    /// batch.
    pub fn run_scenarios(&self, scenarios: &[Scenario]) -> Vec<(String, Result<CapitalTrajectory>)> {
        scenarios
            .par_iter()
            .map(|scenario| {
                (
                    scenario.label.clone(),
                    self.run(scenario.config.clone(), &scenario.schedule),
                )
            })
            .collect()
    }
}
