//! Property Projection - financial projection engine for real estate
//!
//! This library provides:
//! - Validated property snapshots and CSV/JSON loaders
//! - Equity decomposition by source (down payment, appreciation, paydown, improvements)
//! - Profitability ratios (cap rate, cash-on-cash, DSCR, LTV, break-even, GRM)
//! - A heuristic 0-100 risk score with qualitative grade
//! - Forward projections with a monthly amortization model
//! - Disposition estimates, hold-period IRR and deterministic sensitivity bands
//!
//! All calculations are pure: no I/O, no logging, no shared state.

pub mod error;
pub mod snapshot;
pub mod assumptions;
pub mod metrics;
pub mod projection;
pub mod analysis;
pub mod scenario;

// Re-export commonly used types
pub use error::{Error, Result};
pub use snapshot::PropertySnapshot;
pub use assumptions::{Assumptions, RiskGrade, RiskRubric};
pub use metrics::{
    compute_equity_decomposition, compute_profitability_metrics, EquityDecomposition,
    ProfitabilityMetrics, Ratio,
};
pub use projection::{project_forward, Appreciation, PeriodUnit, ProjectionConfig, ProjectionSeries};
pub use analysis::{analyze, PropertyAnalysis};
pub use scenario::ScenarioRunner;
