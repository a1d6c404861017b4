//! Current-period profitability ratios

use serde::{Deserialize, Serialize};

use super::ratio::Ratio;
use super::risk::{assess_risk, RiskFactor};
use crate::assumptions::{RiskGrade, RiskRubric};
use crate::error::Result;
use crate::snapshot::PropertySnapshot;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Yield, leverage and coverage figures for one snapshot
///
/// Percentages are on a 0-100 scale and are never rounded here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityMetrics {
    // Income statement
    pub gross_annual_rent: f64,
    pub effective_gross_income: f64,
    pub annual_operating_expenses: f64,
    pub net_operating_income: f64,
    pub annual_debt_service: f64,
    pub annual_cash_flow: f64,
    pub total_cash_invested: f64,

    // Ratios
    pub cap_rate: Ratio,
    pub cash_on_cash_return: Ratio,
    pub debt_service_coverage_ratio: Ratio,
    /// 0 when the market value is 0
    pub loan_to_value: f64,
    pub break_even_ratio: Ratio,
    pub gross_rent_multiplier: Ratio,

    // Risk
    pub risk_score: f64,
    pub risk_grade: RiskGrade,
    pub risk_factors: Vec<RiskFactor>,
}

/// Profitability metrics scored with the default risk rubric
pub fn compute_profitability_metrics(snapshot: &PropertySnapshot) -> Result<ProfitabilityMetrics> {
    compute_profitability_metrics_with(snapshot, &RiskRubric::default())
}

/// Profitability metrics scored with a caller-supplied rubric
pub fn compute_profitability_metrics_with(
    snapshot: &PropertySnapshot,
    rubric: &RiskRubric,
) -> Result<ProfitabilityMetrics> {
    snapshot.validate()?;

    let gross_annual_rent = snapshot.monthly_rent * MONTHS_PER_YEAR;
    let effective_gross_income = gross_annual_rent * (1.0 - snapshot.vacancy_rate_pct / 100.0);
    let annual_operating_expenses = snapshot.monthly_operating_expenses * MONTHS_PER_YEAR;
    let net_operating_income = effective_gross_income - annual_operating_expenses;
    let annual_debt_service = snapshot.monthly_payment * MONTHS_PER_YEAR;
    let annual_cash_flow = net_operating_income - annual_debt_service;
    let total_cash_invested = snapshot.total_cash_invested();

    let mut metrics = ProfitabilityMetrics {
        gross_annual_rent,
        effective_gross_income,
        annual_operating_expenses,
        net_operating_income,
        annual_debt_service,
        annual_cash_flow,
        total_cash_invested,
        cap_rate: Ratio::percent(net_operating_income, snapshot.purchase_price),
        cash_on_cash_return: Ratio::percent(annual_cash_flow, total_cash_invested),
        debt_service_coverage_ratio: Ratio::of(net_operating_income, annual_debt_service),
        loan_to_value: snapshot.loan_to_value(),
        break_even_ratio: Ratio::percent(
            annual_operating_expenses + annual_debt_service,
            gross_annual_rent,
        ),
        gross_rent_multiplier: Ratio::of(snapshot.purchase_price, gross_annual_rent),
        risk_score: 0.0,
        risk_grade: RiskGrade::Low,
        risk_factors: Vec::new(),
    };

    let assessment = assess_risk(&metrics, rubric);
    metrics.risk_score = assessment.score;
    metrics.risk_grade = assessment.grade;
    metrics.risk_factors = assessment.factors;

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Single-family rental bought for 450k with 20% down
    fn rental() -> PropertySnapshot {
        let mut s = PropertySnapshot::with_standard_financing(
            480_000.0, 450_000.0, 90_000.0, 350_000.0, 2_160.0, 6.0, 3.0,
        );
        s.monthly_rent = 3_500.0;
        s.vacancy_rate_pct = 5.0;
        s.monthly_operating_expenses = 700.0;
        s.improvement_costs = 10_000.0;
        s
    }

    #[test]
    fn test_reproducible_by_hand() {
        let m = compute_profitability_metrics(&rental()).unwrap();

        // 3500 * 12 = 42000; less 5% vacancy = 39900; less 8400 opex = 31500
        assert_relative_eq!(m.gross_annual_rent, 42_000.0, epsilon = 1e-6);
        assert_relative_eq!(m.effective_gross_income, 39_900.0, epsilon = 1e-6);
        assert_relative_eq!(m.net_operating_income, 31_500.0, epsilon = 1e-6);

        // 31500 / 450000 = 7%
        assert_relative_eq!(m.cap_rate.value().unwrap(), 7.0, epsilon = 1e-9);

        // 31500 - 25920 = 5580 on 100000 invested
        assert_relative_eq!(m.annual_cash_flow, 5_580.0, epsilon = 1e-6);
        assert_relative_eq!(m.cash_on_cash_return.value().unwrap(), 5.58, epsilon = 1e-9);

        assert_relative_eq!(
            m.debt_service_coverage_ratio.value().unwrap(),
            31_500.0 / 25_920.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(m.loan_to_value, 350_000.0 / 480_000.0 * 100.0);
        assert_relative_eq!(
            m.break_even_ratio.value().unwrap(),
            (8_400.0 + 25_920.0) / 42_000.0 * 100.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(m.gross_rent_multiplier.value().unwrap(), 450_000.0 / 42_000.0);
    }

    #[test]
    fn test_zero_market_value_has_defined_ltv() {
        let mut s = rental();
        s.market_value = 0.0;
        let m = compute_profitability_metrics(&s).unwrap();
        assert_eq!(m.loan_to_value, 0.0);
        assert!(m.loan_to_value.is_finite());
    }

    #[test]
    fn test_no_debt_service_is_undefined_dscr() {
        let mut s = rental();
        s.monthly_payment = 0.0;
        let m = compute_profitability_metrics(&s).unwrap();
        assert_eq!(m.debt_service_coverage_ratio, Ratio::Undefined);
    }

    #[test]
    fn test_undefined_denominators() {
        let mut s = PropertySnapshot::with_standard_financing(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        s.monthly_operating_expenses = 100.0;
        let m = compute_profitability_metrics(&s).unwrap();

        assert_eq!(m.cap_rate, Ratio::Undefined);
        assert_eq!(m.cash_on_cash_return, Ratio::Undefined);
        assert_eq!(m.break_even_ratio, Ratio::Undefined);
        assert_eq!(m.gross_rent_multiplier, Ratio::Undefined);
        assert!(m.risk_score.is_finite());
    }

    #[test]
    fn test_monotone_in_market_value() {
        let mut s = rental();
        let before = compute_profitability_metrics(&s).unwrap();
        s.market_value = 600_000.0;
        let after = compute_profitability_metrics(&s).unwrap();

        assert!(after.loan_to_value < before.loan_to_value);
        assert!(after.cap_rate.value().unwrap() >= before.cap_rate.value().unwrap());
        assert!(after.risk_score <= before.risk_score);
    }

    #[test]
    fn test_custom_rubric() {
        let rubric = RiskRubric {
            min_cap_rate_pct: 8.0,
            ..Default::default()
        };
        let default = compute_profitability_metrics(&rental()).unwrap();
        let strict = compute_profitability_metrics_with(&rental(), &rubric).unwrap();
        assert!(strict.risk_score > default.risk_score);
    }
}
