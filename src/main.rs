//! Property Projection CLI
//!
//! Analyzes one property snapshot (JSON, snake_case keys) and prints the
//! equity breakdown, ratios, risk grade and a forward projection.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::info;
use property_projection::{
    analysis::PropertyAnalysis,
    scenario::SensitivityBands,
    snapshot::load_snapshot_json,
    Appreciation, Assumptions, PeriodUnit, ProjectionConfig, ScenarioRunner,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct JsonReport<'a> {
    analysis: &'a PropertyAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    sensitivity_bands: Option<&'a SensitivityBands>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Period {
    Monthly,
    Yearly,
}

impl From<Period> for PeriodUnit {
    fn from(period: Period) -> Self {
        match period {
            Period::Monthly => PeriodUnit::Monthly,
            Period::Yearly => PeriodUnit::Yearly,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "property_projection", version, about = "Equity, ratio and projection analysis for one property")]
struct Cli {
    /// Snapshot JSON file
    snapshot: PathBuf,

    /// Number of projection periods
    #[arg(long, default_value_t = 10)]
    horizon: u32,

    /// Length of one projection period
    #[arg(long, value_enum, default_value_t = Period::Yearly)]
    period: Period,

    /// Annual appreciation (percent) used when no history is available
    #[arg(long)]
    appreciation_pct: Option<f64>,

    /// Use --appreciation-pct even when history is available
    #[arg(long, requires = "appreciation_pct")]
    fixed_appreciation: bool,

    /// Assumptions JSON file (risk rubric, sensitivity multipliers)
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Also print worst/base/best sensitivity bands
    #[arg(long)]
    bands: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn appreciation(&self) -> Appreciation {
        match (self.appreciation_pct, self.fixed_appreciation) {
            (Some(pct), true) => Appreciation::Fixed(pct),
            (Some(pct), false) => Appreciation::ImpliedOr(pct),
            (None, _) => Appreciation::Implied,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let assumptions = match &cli.assumptions {
        Some(path) => Assumptions::from_json_path(path)
            .with_context(|| format!("loading assumptions from {}", path.display()))?,
        None => Assumptions::from_default_path().context("loading default assumptions")?,
    };
    let snapshot = load_snapshot_json(&cli.snapshot)
        .with_context(|| format!("loading snapshot from {}", cli.snapshot.display()))?;

    let config = ProjectionConfig::new(cli.horizon, cli.period.into(), cli.appreciation());
    info!("projecting {} {:?} periods", config.horizon_periods, config.period_unit);

    let runner = ScenarioRunner::with_assumptions(assumptions);
    let analysis = runner.run(&snapshot, &config).context("analyzing snapshot")?;
    let bands = if cli.bands {
        Some(runner.sensitivity_bands(&snapshot, &config).context("computing sensitivity bands")?)
    } else {
        None
    };

    if cli.json {
        let report = JsonReport {
            analysis: &analysis,
            sensitivity_bands: bands.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&analysis);
    if let Some(bands) = bands {
        println!("\nSensitivity ({} periods):", bands.base.periods);
        println!("{:>8} {:>10} {:>16} {:>16}", "Band", "Apprec%", "Final Value", "Final Equity");
        for (name, summary) in [("Worst", &bands.worst), ("Base", &bands.base), ("Best", &bands.best)] {
            println!(
                "{:>8} {:>10.3} {:>16.2} {:>16.2}",
                name, summary.annual_appreciation_pct, summary.final_value, summary.final_equity
            );
        }
    }

    Ok(())
}

fn print_report(analysis: &PropertyAnalysis) {
    let equity = &analysis.equity;
    println!("Equity");
    println!("  Total:              ${:>14.2}", equity.total_equity);
    println!("  Down payment:       ${:>14.2}", equity.from_down_payment);
    println!("  Appreciation:       ${:>14.2}", equity.from_appreciation);
    println!("  Improvements:       ${:>14.2}", equity.from_improvements);
    println!("  Principal paydown:  ${:>14.2}", equity.from_principal_paydown);
    if equity.from_financing_gap != 0.0 {
        println!("  Financing gap:      ${:>14.2}", equity.from_financing_gap);
    }
    if equity.unrealized_loss > 0.0 {
        println!("  Unrealized loss:   -${:>14.2}", equity.unrealized_loss);
    }

    let m = &analysis.metrics;
    println!("\nProfitability");
    println!("  NOI:                ${:>14.2}", m.net_operating_income);
    println!("  Annual cash flow:   ${:>14.2}", m.annual_cash_flow);
    println!("  Cap rate:           {:>15}%", m.cap_rate);
    println!("  Cash-on-cash:       {:>15}%", m.cash_on_cash_return);
    println!("  DSCR:               {:>16}", m.debt_service_coverage_ratio);
    println!("  LTV:                {:>15.2}%", m.loan_to_value);
    println!("  Break-even:         {:>15}%", m.break_even_ratio);
    println!("  GRM:                {:>16}", m.gross_rent_multiplier);
    println!("  Risk:               {:>10.0} ({})", m.risk_score, m.risk_grade.as_str());

    let d = &analysis.disposition;
    println!("\nSale today");
    println!("  Selling costs:      ${:>14.2}", d.selling_costs);
    println!("  Capital gains tax:  ${:>14.2}", d.capital_gains_tax);
    println!("  Net proceeds:       ${:>14.2}", d.net_proceeds);

    let summary = &analysis.projection_summary;
    println!(
        "\nProjection ({} {:?} periods at {:.3}%/yr):",
        summary.periods, summary.period_unit, summary.annual_appreciation_pct
    );
    println!(
        "{:>6} {:>14} {:>14} {:>14} {:>8} {:>4}",
        "Period", "Value", "Balance", "Equity", "LTV%", "NegAm"
    );
    println!("{}", "-".repeat(66));
    for point in &analysis.projection {
        println!(
            "{:>6} {:>14.2} {:>14.2} {:>14.2} {:>8.2} {:>4}",
            point.period_index,
            point.projected_value,
            point.projected_loan_balance,
            point.projected_equity,
            point.loan_to_value,
            if point.non_amortizing { "yes" } else { "" },
        );
    }

    if let Some(period) = summary.payoff_period {
        println!("\nLoan paid off in period {}", period);
    }
    if summary.non_amortizing_periods > 0 {
        println!(
            "\nWarning: payment does not cover interest in {} period(s)",
            summary.non_amortizing_periods
        );
    }
    match analysis.hold_period_irr_pct {
        Some(irr) => println!("Hold-period IRR: {:.2}%", irr),
        None => println!("Hold-period IRR: n/a"),
    }
}
