//! Point-in-time metrics: equity, profitability, risk and disposition

mod ratio;
mod equity;
mod profitability;
mod risk;
mod disposition;

pub use ratio::Ratio;
pub use equity::{compute_equity_decomposition, EquityDecomposition};
pub use profitability::{
    compute_profitability_metrics, compute_profitability_metrics_with, ProfitabilityMetrics,
};
pub use risk::{assess_risk, RiskAssessment, RiskFactor};
pub use disposition::{estimate_disposition, estimate_disposition_at, DispositionEstimate};
