//! Sweep performance-fee levels over one fund/reference pair
//!
//! Outputs final capital, total return and Sharpe ratio per fee level for
//! side-by-side fee comparison.

use anyhow::{bail, Context};
use fund_simulator::rates::{load_rate_series, RateUnit};
use fund_simulator::{
    metrics, CashFlowSchedule, FeeConfig, Scenario, ScenarioRunner, SimulationConfig,
};
use std::path::Path;
use std::time::Instant;

const FEE_LEVELS: &[f64] = &[0.0, 0.10, 0.20, 0.30, 0.40, 0.50];
const INITIAL_CAPITAL: f64 = 100_000.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        bail!("usage: fee_sweep <fund.csv> <reference.csv>");
    }

    let start = Instant::now();
    let fund = load_rate_series(Path::new(&args[1]), "fund", RateUnit::Fraction)?;
    let reference = load_rate_series(Path::new(&args[2]), "reference", RateUnit::Fraction)?;
    println!(
        "Loaded {} fund months and {} reference months in {:?}",
        fund.len(),
        reference.len(),
        start.elapsed()
    );

    let runner = ScenarioRunner::new(fund, reference);

    let scenarios: Vec<Scenario> = FEE_LEVELS
        .iter()
        .map(|&fee| Scenario {
            label: format!("performance fee {:.0}%", fee * 100.0),
            config: SimulationConfig {
                initial_capital: INITIAL_CAPITAL,
                fees: FeeConfig::new(1.0, fee),
                extend_beyond_rates: false,
            },
            schedule: CashFlowSchedule::new(),
        })
        .collect();

    let run_start = Instant::now();
    let results = runner.run_scenarios(&scenarios);
    println!("Ran {} scenarios in {:?}\n", results.len(), run_start.elapsed());

    println!(
        "{:<22} {:>14} {:>12} {:>10}",
        "Scenario", "Final Capital", "Total Ret%", "Sharpe"
    );
    println!("{}", "-".repeat(62));
    for (label, result) in results {
        let trajectory = result.with_context(|| format!("scenario '{label}' failed"))?;
        let summary = metrics::summarize(&trajectory, runner.reference())
            .with_context(|| format!("scenario '{label}' has no risk summary"))?;
        println!(
            "{:<22} {:>14.2} {:>12.4} {:>10.4}",
            label,
            trajectory.final_capital(),
            summary.total_net_return * 100.0,
            summary.sharpe_ratio,
        );
    }

    Ok(())
}
