//! Forward projection of value, loan balance and equity

use serde::{Deserialize, Serialize};

use super::series::ProjectionSeries;
use super::state::{ProjectionState, StepParams};
use crate::error::{Error, Result};
use crate::snapshot::PropertySnapshot;

/// Length of one projection point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodUnit {
    Monthly,
    Yearly,
}

impl PeriodUnit {
    pub fn months(&self) -> u32 {
        match self {
            PeriodUnit::Monthly => 1,
            PeriodUnit::Yearly => 12,
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        12 / self.months()
    }
}

/// Where the annual appreciation rate (percent) comes from
///
/// There is deliberately no default: a caller that has no price history must
/// say which rate to assume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Appreciation {
    /// Back out the historical rate; fail when it is undefined
    Implied,
    /// Back out the historical rate, or use the given rate when undefined
    ImpliedOr(f64),
    /// Always use the given rate
    Fixed(f64),
}

impl Appreciation {
    /// Resolve to an annual percentage for `snapshot`
    pub fn resolve(&self, snapshot: &PropertySnapshot) -> Result<f64> {
        let pct = match *self {
            Appreciation::Implied => implied_appreciation_pct(snapshot)?,
            Appreciation::ImpliedOr(fallback) => {
                implied_appreciation_pct(snapshot).unwrap_or(fallback)
            }
            Appreciation::Fixed(pct) => pct,
        };

        if !pct.is_finite() || pct < -100.0 {
            return Err(Error::invalid(
                "appreciation",
                format!("{}% is not a usable annual rate", pct),
            ));
        }
        Ok(pct)
    }

    /// Same source with the rate scaled by `multiplier`
    pub(crate) fn scaled(&self, snapshot: &PropertySnapshot, multiplier: f64) -> Result<Self> {
        Ok(Appreciation::Fixed(self.resolve(snapshot)? * multiplier))
    }
}

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Number of points to produce
    pub horizon_periods: u32,
    pub period_unit: PeriodUnit,
    pub appreciation: Appreciation,
}

impl ProjectionConfig {
    pub fn new(horizon_periods: u32, period_unit: PeriodUnit, appreciation: Appreciation) -> Self {
        Self {
            horizon_periods,
            period_unit,
            appreciation,
        }
    }

    pub fn yearly(years: u32, appreciation: Appreciation) -> Self {
        Self::new(years, PeriodUnit::Yearly, appreciation)
    }

    pub fn monthly(months: u32, appreciation: Appreciation) -> Self {
        Self::new(months, PeriodUnit::Monthly, appreciation)
    }
}

/// Historical compound annual growth, `(MV / PP)^(1 / years) - 1`, in percent
pub fn implied_appreciation_pct(snapshot: &PropertySnapshot) -> Result<f64> {
    if snapshot.years_owned <= 0.0 {
        return Err(Error::undefined(
            "implied appreciation rate",
            "years owned is 0",
        ));
    }
    if snapshot.purchase_price <= 0.0 {
        return Err(Error::undefined(
            "implied appreciation rate",
            "purchase price is 0",
        ));
    }

    let growth = (snapshot.market_value / snapshot.purchase_price).powf(1.0 / snapshot.years_owned);
    Ok((growth - 1.0) * 100.0)
}

/// Project value, balance and equity forward from `snapshot`
///
/// The returned series is lazy and restartable: nothing is computed until
/// it is iterated, and every iteration starts again from the snapshot.
pub fn project_forward(
    snapshot: &PropertySnapshot,
    config: &ProjectionConfig,
) -> Result<ProjectionSeries> {
    snapshot.validate()?;
    let annual_appreciation_pct = config.appreciation.resolve(snapshot)?;

    let params = StepParams {
        monthly_growth: (1.0 + annual_appreciation_pct / 100.0).powf(1.0 / 12.0) - 1.0,
        monthly_rate: snapshot.monthly_interest_rate(),
        payment: snapshot.monthly_payment,
    };

    Ok(ProjectionSeries::new(
        ProjectionState::from_snapshot(snapshot),
        params,
        config.horizon_periods,
        config.period_unit,
        annual_appreciation_pct,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::level_payment;
    use approx::assert_relative_eq;

    fn snapshot() -> PropertySnapshot {
        // 320k loan taken 5 years ago at 6% over 30 years
        let payment = level_payment(320_000.0, 6.0, 360);
        PropertySnapshot::with_standard_financing(
            500_000.0, 400_000.0, 80_000.0, 297_772.0, payment, 6.0, 5.0,
        )
    }

    #[test]
    fn test_implied_rate() {
        let pct = implied_appreciation_pct(&snapshot()).unwrap();
        assert_relative_eq!(pct, (1.25_f64.powf(0.2) - 1.0) * 100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_implied_rate_undefined_without_history() {
        let mut s = snapshot();
        s.years_owned = 0.0;
        assert!(matches!(
            implied_appreciation_pct(&s),
            Err(Error::UndefinedRatio { .. })
        ));
        assert!(matches!(
            project_forward(&s, &ProjectionConfig::yearly(5, Appreciation::Implied)),
            Err(Error::UndefinedRatio { .. })
        ));

        // Explicit fallback is used instead
        let series =
            project_forward(&s, &ProjectionConfig::yearly(5, Appreciation::ImpliedOr(3.0))).unwrap();
        assert_eq!(series.annual_appreciation_pct(), 3.0);
    }

    #[test]
    fn test_implied_rate_undefined_for_zero_price() {
        let mut s = snapshot();
        s.purchase_price = 0.0;
        s.down_payment = 0.0;
        assert!(matches!(
            implied_appreciation_pct(&s),
            Err(Error::UndefinedRatio { .. })
        ));
    }

    #[test]
    fn test_rejects_impossible_rate() {
        let result = project_forward(&snapshot(), &ProjectionConfig::yearly(5, Appreciation::Fixed(-150.0)));
        assert!(matches!(result, Err(Error::InvalidInput { field: "appreciation", .. })));
    }

    #[test]
    fn test_yearly_value_compounds_at_annual_rate() {
        let series =
            project_forward(&snapshot(), &ProjectionConfig::yearly(3, Appreciation::Fixed(4.0))).unwrap();
        let points = series.points();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].period_index, 1);
        assert_relative_eq!(points[0].projected_value, 520_000.0, epsilon = 1e-6);
        assert_relative_eq!(points[2].projected_value, 500_000.0 * 1.04_f64.powi(3), epsilon = 1e-6);
    }

    #[test]
    fn test_monthly_and_yearly_agree() {
        let s = snapshot();
        let yearly = project_forward(&s, &ProjectionConfig::yearly(2, Appreciation::Fixed(3.0))).unwrap();
        let monthly = project_forward(&s, &ProjectionConfig::monthly(24, Appreciation::Fixed(3.0))).unwrap();

        let y = yearly.last().unwrap();
        let m = monthly.last().unwrap();
        assert_relative_eq!(y.projected_value, m.projected_value, epsilon = 1e-6);
        assert_relative_eq!(y.projected_loan_balance, m.projected_loan_balance, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_snapshot_rejected_before_projection() {
        let mut s = snapshot();
        s.down_payment = 500_000.0;
        assert!(matches!(
            project_forward(&s, &ProjectionConfig::yearly(5, Appreciation::Fixed(3.0))),
            Err(Error::InvalidInput { field: "down_payment", .. })
        ));
    }
}
