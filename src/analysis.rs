//! One-call analysis of a property snapshot

use serde::Serialize;

use crate::assumptions::Assumptions;
use crate::error::Result;
use crate::metrics::{
    compute_equity_decomposition, compute_profitability_metrics_with, estimate_disposition,
    estimate_disposition_at, DispositionEstimate, EquityDecomposition, ProfitabilityMetrics,
};
use crate::projection::{
    hold_period_irr, project_forward, ProjectionConfig, ProjectionPoint, ProjectionSummary,
};
use crate::snapshot::PropertySnapshot;

/// Every derived record for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyAnalysis {
    pub equity: EquityDecomposition,
    pub metrics: ProfitabilityMetrics,
    /// Sale at today's value
    pub disposition: DispositionEstimate,
    pub projection: Vec<ProjectionPoint>,
    pub projection_summary: ProjectionSummary,
    /// Sale at the end of the projection horizon
    pub projected_disposition: Option<DispositionEstimate>,
    /// Annualized hold-period IRR, percent
    pub hold_period_irr_pct: Option<f64>,
}

/// Validate `snapshot` once and derive everything from it
pub fn analyze(
    snapshot: &PropertySnapshot,
    assumptions: &Assumptions,
    config: &ProjectionConfig,
) -> Result<PropertyAnalysis> {
    let equity = compute_equity_decomposition(snapshot)?;
    let metrics = compute_profitability_metrics_with(snapshot, &assumptions.risk)?;
    let disposition = estimate_disposition(snapshot)?;

    let series = project_forward(snapshot, config)?;
    let projection = series.points();
    let projected_disposition = projection
        .last()
        .map(|point| estimate_disposition_at(snapshot, point))
        .transpose()?;
    let hold_period_irr_pct = if projection.is_empty() {
        None
    } else {
        hold_period_irr(snapshot, &series)?
    };

    Ok(PropertyAnalysis {
        equity,
        metrics,
        disposition,
        projection_summary: series.summary(),
        projection,
        projected_disposition,
        hold_period_irr_pct,
    })
}
