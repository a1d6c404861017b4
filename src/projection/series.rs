//! Projection output: lazy, restartable series of points

use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use std::iter::FusedIterator;

use super::engine::PeriodUnit;
use super::state::{ProjectionState, StepParams};
use crate::error::{Error, Result};
use crate::snapshot::loan_to_value;

/// One point of a projection, at the end of its period
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// 1-indexed period number
    pub period_index: u32,
    pub projected_value: f64,
    pub projected_loan_balance: f64,
    pub projected_equity: f64,
    /// Percent; 0 when the projected value is 0
    pub loan_to_value: f64,
    /// Interest charged during the period
    pub interest_accrued: f64,
    /// Principal repaid during the period; negative under negative amortization
    pub principal_paid: f64,
    /// True if the payment failed to cover interest in any month of the period
    pub non_amortizing: bool,
}

impl ProjectionPoint {
    /// Total paid to the lender during the period
    pub fn debt_service(&self) -> f64 {
        self.interest_accrued + self.principal_paid
    }
}

/// A finite projection that is computed on demand
///
/// Holds only the starting state and fixed parameters; each call to
/// [`ProjectionSeries::iter`] replays the projection from the start.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSeries {
    start: ProjectionState,
    params: StepParams,
    horizon_periods: u32,
    period_unit: PeriodUnit,
    annual_appreciation_pct: f64,
}

impl ProjectionSeries {
    pub(crate) fn new(
        start: ProjectionState,
        params: StepParams,
        horizon_periods: u32,
        period_unit: PeriodUnit,
        annual_appreciation_pct: f64,
    ) -> Self {
        Self {
            start,
            params,
            horizon_periods,
            period_unit,
            annual_appreciation_pct,
        }
    }

    pub fn iter(&self) -> ProjectionIter {
        ProjectionIter {
            state: self.start.clone(),
            params: self.params,
            months_per_period: self.period_unit.months(),
            next_period: 1,
            remaining: self.horizon_periods,
        }
    }

    pub fn len(&self) -> usize {
        self.horizon_periods as usize
    }

    pub fn is_empty(&self) -> bool {
        self.horizon_periods == 0
    }

    pub fn period_unit(&self) -> PeriodUnit {
        self.period_unit
    }

    /// Annual appreciation rate (percent) the series compounds at
    pub fn annual_appreciation_pct(&self) -> f64 {
        self.annual_appreciation_pct
    }

    /// Materialize every point
    pub fn points(&self) -> Vec<ProjectionPoint> {
        self.iter().collect()
    }

    pub fn last(&self) -> Option<ProjectionPoint> {
        self.iter().last()
    }

    /// Fail with the first period in which the loan did not amortize
    pub fn require_amortizing(&self) -> Result<()> {
        match self.iter().find(|p| p.non_amortizing) {
            Some(point) => Err(Error::NonAmortizing {
                period_index: point.period_index,
            }),
            None => Ok(()),
        }
    }

    pub fn summary(&self) -> ProjectionSummary {
        let mut summary = ProjectionSummary {
            periods: 0,
            period_unit: self.period_unit,
            annual_appreciation_pct: self.annual_appreciation_pct,
            final_value: self.start.value,
            final_loan_balance: self.start.balance,
            final_equity: self.start.equity(),
            total_interest: 0.0,
            total_principal: 0.0,
            payoff_period: None,
            non_amortizing_periods: 0,
        };

        for point in self.iter() {
            summary.periods += 1;
            summary.final_value = point.projected_value;
            summary.final_loan_balance = point.projected_loan_balance;
            summary.final_equity = point.projected_equity;
            summary.total_interest += point.interest_accrued;
            summary.total_principal += point.principal_paid;
            if point.non_amortizing {
                summary.non_amortizing_periods += 1;
            }
            if summary.payoff_period.is_none()
                && point.projected_loan_balance == 0.0
                && self.start.balance > 0.0
            {
                summary.payoff_period = Some(point.period_index);
            }
        }

        summary
    }
}

impl<'a> IntoIterator for &'a ProjectionSeries {
    type Item = ProjectionPoint;
    type IntoIter = ProjectionIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serializes as the list of points
impl Serialize for ProjectionSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Iterator over a [`ProjectionSeries`]
#[derive(Debug, Clone)]
pub struct ProjectionIter {
    state: ProjectionState,
    params: StepParams,
    months_per_period: u32,
    next_period: u32,
    remaining: u32,
}

impl Iterator for ProjectionIter {
    type Item = ProjectionPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let mut interest_accrued = 0.0;
        let mut principal_paid = 0.0;
        let mut non_amortizing = false;
        for _ in 0..self.months_per_period {
            let step = self.state.advance_month(&self.params);
            interest_accrued += step.interest;
            principal_paid += step.principal;
            non_amortizing |= step.non_amortizing;
        }

        let point = ProjectionPoint {
            period_index: self.next_period,
            projected_value: self.state.value,
            projected_loan_balance: self.state.balance,
            projected_equity: self.state.equity(),
            loan_to_value: loan_to_value(self.state.balance, self.state.value),
            interest_accrued,
            principal_paid,
            non_amortizing,
        };
        self.remaining -= 1;
        self.next_period = self.next_period.saturating_add(1);
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProjectionIter {}

impl FusedIterator for ProjectionIter {}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub periods: u32,
    pub period_unit: PeriodUnit,
    pub annual_appreciation_pct: f64,
    pub final_value: f64,
    pub final_loan_balance: f64,
    pub final_equity: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    /// First period that ends with the loan fully repaid
    pub payoff_period: Option<u32>,
    pub non_amortizing_periods: u32,
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::projection::{level_payment, project_forward, Appreciation, ProjectionConfig};
    use crate::snapshot::PropertySnapshot;
    use approx::assert_relative_eq;

    /// 15-year loan with 10 years left
    fn snapshot() -> PropertySnapshot {
        let payment = level_payment(200_000.0, 5.0, 180);
        let mut s = PropertySnapshot::with_standard_financing(
            350_000.0, 250_000.0, 50_000.0, 200_000.0, payment, 5.0, 5.0,
        );
        // Reset the clock so the whole 15-year schedule is ahead
        s.years_owned = 0.0;
        s
    }

    fn config(years: u32) -> ProjectionConfig {
        ProjectionConfig::yearly(years, Appreciation::Fixed(3.0))
    }

    #[test]
    fn test_length_matches_horizon() {
        let series = project_forward(&snapshot(), &config(7)).unwrap();
        assert_eq!(series.len(), 7);
        assert_eq!(series.iter().len(), 7);
        assert_eq!(series.points().len(), 7);

        let empty = project_forward(&snapshot(), &config(0)).unwrap();
        assert!(empty.is_empty());
        assert!(empty.last().is_none());
    }

    #[test]
    fn test_unbounded_horizon_iterates_lazily() {
        let series = project_forward(&snapshot(), &config(u32::MAX)).unwrap();
        let mut iter = series.iter();
        assert_eq!(iter.len(), u32::MAX as usize);

        let first: Vec<_> = iter.by_ref().take(3).collect();
        assert_eq!(first[2].period_index, 3);
        assert_eq!(iter.len(), u32::MAX as usize - 3);
    }

    #[test]
    fn test_size_hint_counts_down() {
        let series = project_forward(&snapshot(), &config(2)).unwrap();
        let mut iter = series.iter();
        assert_eq!(iter.size_hint(), (2, Some(2)));
        iter.next();
        iter.next();
        assert_eq!(iter.size_hint(), (0, Some(0)));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_balance_non_increasing_and_reaches_zero() {
        let series = project_forward(&snapshot(), &config(20)).unwrap();
        let points = series.points();

        let mut previous = snapshot().current_loan_balance;
        for point in &points {
            assert!(point.projected_loan_balance >= 0.0);
            assert!(point.projected_loan_balance <= previous + 1e-9);
            assert!(!point.non_amortizing);
            previous = point.projected_loan_balance;
        }

        // Paid off on schedule (floating-point may finish the last cents a
        // month late, hence the tolerance of one period)
        let summary = series.summary();
        let payoff = summary.payoff_period.expect("loan should pay off");
        assert!(payoff == 15 || payoff == 16, "paid off in year {}", payoff);
        assert_eq!(points[19].projected_loan_balance, 0.0);
        assert_relative_eq!(summary.total_principal, 200_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_restartable_and_idempotent() {
        let s = snapshot();
        let series = project_forward(&s, &config(10)).unwrap();

        let first: Vec<_> = series.iter().collect();
        let second: Vec<_> = series.iter().collect();
        assert_eq!(first, second);

        let again = project_forward(&s, &config(10)).unwrap();
        assert_eq!(again.points(), first);
    }

    #[test]
    fn test_negative_amortization_flagged() {
        let mut s = snapshot();
        // Interest alone is ~833/month
        s.monthly_payment = 500.0;
        let series = project_forward(&s, &config(3)).unwrap();
        let points = series.points();

        assert!(points.iter().all(|p| p.non_amortizing));
        assert!(points[0].projected_loan_balance > s.current_loan_balance);
        assert!(points[2].projected_loan_balance > points[1].projected_loan_balance);
        assert!(points[0].principal_paid < 0.0);
        assert_eq!(series.summary().non_amortizing_periods, 3);

        assert!(matches!(
            series.require_amortizing(),
            Err(Error::NonAmortizing { period_index: 1 })
        ));
    }

    #[test]
    fn test_debt_service_matches_payments() {
        let s = snapshot();
        let series = project_forward(&s, &config(1)).unwrap();
        let point = series.last().unwrap();
        assert_relative_eq!(point.debt_service(), s.monthly_payment * 12.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_value_ltv_defined() {
        let mut s = snapshot();
        s.market_value = 0.0;
        let series = project_forward(&s, &config(2)).unwrap();
        for point in &series {
            assert_eq!(point.loan_to_value, 0.0);
        }
    }

    #[test]
    fn test_serializes_as_points() {
        let series = project_forward(&snapshot(), &config(2)).unwrap();
        let json = serde_json::to_value(&series).unwrap();
        let array = json.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[1]["period_index"], 2);
    }
}
