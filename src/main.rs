//! Fund Simulator CLI
//!
//! Runs a what-if simulation of a fund position from CSV rate data and prints
//! the month-by-month trajectory, risk summary and indicator comparison.

use anyhow::Context;
use clap::Parser;
use fund_simulator::rates::{load_rate_series, RateUnit};
use fund_simulator::{
    align, metrics, AlignmentMode, CashFlowEvent, CashFlowSchedule, FeeConfig, RateSeries,
    SimulationConfig, SimulationEngine,
};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "fund_simulator", version, about = "Monthly net-return fund simulator")]
struct Args {
    /// CSV file with the fund's gross monthly returns (month,rate)
    #[arg(long)]
    fund: PathBuf,

    /// CSV file with the reference rate series, e.g. CDI (month,rate)
    #[arg(long)]
    reference: PathBuf,

    /// Indicator CSV for the comparison table (repeatable)
    #[arg(long = "indicator")]
    indicators: Vec<PathBuf>,

    /// Capital at the start of the first month
    #[arg(long, default_value_t = 100_000.0)]
    initial_capital: f64,

    /// Flat monthly contribution
    #[arg(long, default_value_t = 0.0)]
    contribution: f64,

    /// Flat monthly withdrawal
    #[arg(long, default_value_t = 0.0)]
    withdrawal: f64,

    /// Distribute monthly gains instead of compounding them
    #[arg(long)]
    no_reinvest: bool,

    /// Performance fee charged on the excess over the reference rate
    #[arg(long, default_value_t = 0.30)]
    performance_fee: f64,

    /// Administration benchmark as a fraction of the reference rate
    #[arg(long, default_value_t = 1.0)]
    administration_fee: f64,

    /// Input rates are percentage points (BCB-style) instead of fractions
    #[arg(long)]
    percent: bool,

    /// Write the comparison table to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Align the comparison on the union of months instead of the intersection
    #[arg(long)]
    union: bool,

    /// Print the risk summary as JSON
    #[arg(long)]
    json: bool,
}

fn series_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let unit = if args.percent {
        RateUnit::Percent
    } else {
        RateUnit::Fraction
    };

    let fund = load_rate_series(&args.fund, &series_name(&args.fund), unit)?;
    let reference = load_rate_series(&args.reference, &series_name(&args.reference), unit)?;
    let indicators: Vec<RateSeries> = args
        .indicators
        .iter()
        .map(|path| load_rate_series(path, &series_name(path), unit))
        .collect::<anyhow::Result<_>>()?;

    let start = fund.first_month().context("fund series is empty")?;
    let event = CashFlowEvent {
        contribution: args.contribution,
        withdrawal: args.withdrawal,
        reinvest: !args.no_reinvest,
    };
    let schedule = if event.is_passive() {
        CashFlowSchedule::new()
    } else {
        CashFlowSchedule::flat(start, fund.len() as u32, event)
    };

    let config = SimulationConfig {
        initial_capital: args.initial_capital,
        fees: FeeConfig::new(args.administration_fee, args.performance_fee),
        extend_beyond_rates: false,
    };
    let trajectory = SimulationEngine::new(config).run(&fund, &reference, &schedule)?;

    println!("Simulation ({} months):", trajectory.len());
    println!(
        "{:>8} {:>14} {:>9} {:>9} {:>12} {:>12} {:>12} {:>14}",
        "Month", "Opening", "Gross%", "Net%", "Contrib", "Withdrawal", "Distrib", "Closing"
    );
    println!("{}", "-".repeat(98));
    for row in trajectory.snapshots() {
        println!(
            "{:>8} {:>14.2} {:>9.4} {:>9.4} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            row.month.to_string(),
            row.opening_capital,
            row.gross_rate * 100.0,
            row.net_rate * 100.0,
            row.contribution,
            row.withdrawal,
            row.distribution,
            row.closing_capital,
        );
    }

    let totals = trajectory.summary();
    println!("\nSummary:");
    println!("  Initial Capital:      {:>14.2}", totals.initial_capital);
    println!("  Final Capital:        {:>14.2}", totals.final_capital);
    println!("  Total Contributions:  {:>14.2}", totals.total_contributions);
    println!("  Total Withdrawals:    {:>14.2}", totals.total_withdrawals);
    println!("  Total Distributions:  {:>14.2}", totals.total_distributions);
    println!("  Total Net Gain:       {:>14.2}", totals.total_net_gain);

    match metrics::summarize(&trajectory, &reference) {
        Ok(summary) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("\nRisk:");
                println!("  Total Net Return:      {:>9.4}%", summary.total_net_return * 100.0);
                println!(
                    "  Annualized Volatility: {:>9.4}%",
                    summary.annualized_volatility * 100.0
                );
                println!("  Sharpe Ratio:          {:>9.4}", summary.sharpe_ratio);
                if !summary.excluded_months.is_empty() {
                    println!(
                        "  Months excluded from the sample (zero opening capital): {}",
                        summary
                            .excluded_months
                            .iter()
                            .map(|m| m.to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                }
            }
        }
        Err(err) => log::warn!("risk summary unavailable: {err}"),
    }

    if !indicators.is_empty() {
        let refs: Vec<&RateSeries> = indicators.iter().collect();
        let mode = if args.union {
            AlignmentMode::Union
        } else {
            AlignmentMode::Intersection
        };
        let table = align(&trajectory, &refs, mode);

        if let Some(path) = &args.output {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            table.write_csv(file)?;
            println!("\nComparison table written to: {}", path.display());
        } else {
            let mut out = Vec::new();
            table.write_csv(&mut out)?;
            println!("\nComparison:\n{}", String::from_utf8_lossy(&out));
        }
    }

    Ok(())
}
