//! Scenario runner for batch analysis and sensitivity bands
//!
//! Holds the assumptions once, then analyzes many snapshots or many
//! appreciation scenarios for one snapshot. Every run is independent, so
//! batches fan out across a rayon pool with no coordination.

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::{analyze, PropertyAnalysis};
use crate::assumptions::Assumptions;
use crate::error::Result;
use crate::projection::{project_forward, ProjectionConfig, ProjectionSummary};
use crate::snapshot::{LoadedProperty, PropertySnapshot};

/// Deterministic worst/base/best projections
///
/// Each band scales the resolved appreciation rate by a fixed multiplier
/// from [`crate::assumptions::SensitivityMultipliers`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityBands {
    pub worst: ProjectionSummary,
    pub base: ProjectionSummary,
    pub best: ProjectionSummary,
}

/// Outcome for one property in a batch
#[derive(Debug)]
pub struct BatchOutcome {
    pub property_id: String,
    pub result: Result<PropertyAnalysis>,
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Runner with built-in default assumptions
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.assumptions
    }

    /// Analyze a single snapshot
    pub fn run(&self, snapshot: &PropertySnapshot, config: &ProjectionConfig) -> Result<PropertyAnalysis> {
        analyze(snapshot, &self.assumptions, config)
    }

    /// Analyze many snapshots in parallel; output order matches input order
    pub fn analyze_batch(
        &self,
        snapshots: &[PropertySnapshot],
        config: &ProjectionConfig,
    ) -> Vec<Result<PropertyAnalysis>> {
        debug!("analyzing batch of {} snapshots", snapshots.len());
        snapshots
            .par_iter()
            .map(|snapshot| self.run(snapshot, config))
            .collect()
    }

    /// Analyze loaded properties in parallel, keeping their identifiers
    pub fn analyze_properties(
        &self,
        properties: &[LoadedProperty],
        config: &ProjectionConfig,
    ) -> Vec<BatchOutcome> {
        let outcomes: Vec<BatchOutcome> = properties
            .par_iter()
            .map(|property| BatchOutcome {
                property_id: property.property_id.clone(),
                result: self.run(&property.snapshot, config),
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                warn!("property {} not analyzed: {}", outcome.property_id, e);
            }
        }
        info!(
            "analyzed {} properties ({} failed)",
            outcomes.len() - failed,
            failed
        );

        outcomes
    }

    /// Project the snapshot under the worst, base and best appreciation
    /// multipliers
    pub fn sensitivity_bands(
        &self,
        snapshot: &PropertySnapshot,
        config: &ProjectionConfig,
    ) -> Result<SensitivityBands> {
        let multipliers = &self.assumptions.sensitivity;
        let band = |multiplier: f64| -> Result<ProjectionSummary> {
            let scaled = ProjectionConfig {
                appreciation: config.appreciation.scaled(snapshot, multiplier)?,
                ..config.clone()
            };
            Ok(project_forward(snapshot, &scaled)?.summary())
        };

        Ok(SensitivityBands {
            worst: band(multipliers.worst)?,
            base: band(multipliers.base)?,
            best: band(multipliers.best)?,
        })
    }
}
