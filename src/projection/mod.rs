//! Forward projection of value, amortization and equity

mod state;
mod engine;
mod series;
mod irr;

pub use state::{level_payment, MonthStep, ProjectionState, StepParams};
pub use engine::{
    implied_appreciation_pct, project_forward, Appreciation, PeriodUnit, ProjectionConfig,
};
pub use series::{ProjectionIter, ProjectionPoint, ProjectionSeries, ProjectionSummary};
pub use irr::{calculate_irr, hold_period_cashflows, hold_period_irr};
