//! Score a whole portfolio of properties from a CSV file
//!
//! Loads snapshots, analyzes them in parallel and writes one CSV row per
//! property. Rows the loader rejected are written too, with only the error
//! column filled. Projection settings may be overridden through environment
//! variables:
//!   HORIZON_YEARS, FALLBACK_APPRECIATION_PCT

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use property_projection::{
    snapshot::load_properties, Appreciation, Assumptions, ProjectionConfig, ScenarioRunner,
};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

const DEFAULT_HORIZON_YEARS: u32 = 10;
const DEFAULT_FALLBACK_APPRECIATION_PCT: f64 = 3.0;

#[derive(Debug, Parser)]
#[command(name = "score_portfolio", about = "Batch risk and return scoring from a CSV of properties")]
struct Args {
    /// Input CSV with one property per row
    #[arg(default_value = "data/sample_properties.csv")]
    input: PathBuf,

    /// Output CSV report
    #[arg(long, default_value = "portfolio_scores.csv")]
    output: PathBuf,

    /// Assumptions JSON file
    #[arg(long)]
    assumptions: Option<PathBuf>,
}

/// One output row; empty cells mean undefined or failed
#[derive(Debug, Serialize, Default)]
struct ScoreRow {
    property_id: String,
    total_equity: Option<f64>,
    loan_to_value_pct: Option<f64>,
    cap_rate_pct: Option<f64>,
    cash_on_cash_pct: Option<f64>,
    dscr: Option<f64>,
    risk_score: Option<f64>,
    risk_grade: Option<&'static str>,
    projected_equity: Option<f64>,
    hold_period_irr_pct: Option<f64>,
    payoff_period: Option<u32>,
    non_amortizing: Option<bool>,
    error: Option<String>,
}

/// Value of `key` if set and parseable, otherwise `default`
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring {}={:?}: not a valid value", key, raw);
            default
        }),
        Err(_) => default,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let horizon_years: u32 = env_or("HORIZON_YEARS", DEFAULT_HORIZON_YEARS);
    let fallback_pct: f64 = env_or("FALLBACK_APPRECIATION_PCT", DEFAULT_FALLBACK_APPRECIATION_PCT);
    let config = ProjectionConfig::yearly(horizon_years, Appreciation::ImpliedOr(fallback_pct));

    let assumptions = match &args.assumptions {
        Some(path) => Assumptions::from_json_path(path)
            .with_context(|| format!("loading assumptions from {}", path.display()))?,
        None => Assumptions::from_default_path()?,
    };

    let portfolio = load_properties(&args.input)
        .with_context(|| format!("loading properties from {}", args.input.display()))?;
    info!(
        "loaded {} properties ({} rejected) in {:?}",
        portfolio.properties.len(),
        portfolio.rejected.len(),
        start.elapsed()
    );

    let runner = ScenarioRunner::with_assumptions(assumptions);
    let scoring_start = Instant::now();
    let outcomes = runner.analyze_properties(&portfolio.properties, &config);
    info!("scored in {:?}", scoring_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let mut grade_counts = [0usize; 4];
    for outcome in outcomes {
        let row = match outcome.result {
            Ok(analysis) => {
                let m = &analysis.metrics;
                grade_counts[m.risk_grade as usize] += 1;
                ScoreRow {
                    property_id: outcome.property_id,
                    total_equity: Some(analysis.equity.total_equity),
                    loan_to_value_pct: Some(m.loan_to_value),
                    cap_rate_pct: m.cap_rate.value(),
                    cash_on_cash_pct: m.cash_on_cash_return.value(),
                    dscr: m.debt_service_coverage_ratio.value(),
                    risk_score: Some(m.risk_score),
                    risk_grade: Some(m.risk_grade.as_str()),
                    projected_equity: Some(analysis.projection_summary.final_equity),
                    hold_period_irr_pct: analysis.hold_period_irr_pct,
                    payoff_period: analysis.projection_summary.payoff_period,
                    non_amortizing: Some(analysis.projection_summary.non_amortizing_periods > 0),
                    error: None,
                }
            }
            Err(e) => ScoreRow {
                property_id: outcome.property_id,
                error: Some(e.to_string()),
                ..Default::default()
            },
        };
        writer.serialize(row)?;
    }
    for rejected in &portfolio.rejected {
        writer.serialize(ScoreRow {
            property_id: rejected.property_id.clone(),
            error: Some(rejected.error.to_string()),
            ..Default::default()
        })?;
    }
    writer.flush()?;

    println!(
        "Scored {} properties -> {}",
        portfolio.properties.len(),
        args.output.display()
    );
    if !portfolio.rejected.is_empty() {
        println!("  Rejected rows: {}", portfolio.rejected.len());
    }
    println!(
        "  Low: {}  Moderate: {}  Elevated: {}  High: {}",
        grade_counts[0], grade_counts[1], grade_counts[2], grade_counts[3]
    );
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
