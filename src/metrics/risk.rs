//! Additive penalty risk score
//!
//! Starts at 0 and adds the rubric weight for every triggered factor, then
//! clamps to [0, 100]. Lower is better.

use serde::{Deserialize, Serialize};

use super::profitability::ProfitabilityMetrics;
use crate::assumptions::{RiskGrade, RiskRubric};

const MAX_SCORE: f64 = 100.0;

/// A rubric factor that contributed to the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    LowCashOnCash,
    ThinCoverage,
    HighLeverage,
    Underwater,
    LowCapRate,
    HighBreakEven,
    NegativeCashFlow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub score: f64,
    pub grade: RiskGrade,
    pub factors: Vec<RiskFactor>,
}

/// Score the ratios in `metrics` against `rubric`
///
/// Undefined ratios are judged by what they mean: no debt service is not a
/// coverage problem, but no invested cash with a negative cash flow is a
/// cash-on-cash problem, and costs with no rent at all never break even.
pub fn assess_risk(metrics: &ProfitabilityMetrics, rubric: &RiskRubric) -> RiskAssessment {
    let negative_cash_flow = metrics.annual_cash_flow < 0.0;
    let costs_without_rent = metrics.gross_annual_rent == 0.0
        && metrics.annual_operating_expenses + metrics.annual_debt_service > 0.0;

    let checks = [
        (
            RiskFactor::LowCashOnCash,
            metrics.cash_on_cash_return.is_below(rubric.min_cash_on_cash_pct)
                || (!metrics.cash_on_cash_return.is_defined() && negative_cash_flow),
            rubric.low_cash_on_cash_weight,
        ),
        (
            RiskFactor::ThinCoverage,
            metrics.debt_service_coverage_ratio.is_below(rubric.min_dscr),
            rubric.thin_coverage_weight,
        ),
        (
            RiskFactor::HighLeverage,
            metrics.loan_to_value > rubric.max_loan_to_value_pct,
            rubric.high_leverage_weight,
        ),
        (
            RiskFactor::Underwater,
            metrics.loan_to_value > 100.0,
            rubric.underwater_weight,
        ),
        (
            RiskFactor::LowCapRate,
            metrics.cap_rate.is_below(rubric.min_cap_rate_pct),
            rubric.low_cap_rate_weight,
        ),
        (
            RiskFactor::HighBreakEven,
            metrics.break_even_ratio.is_above(rubric.max_break_even_pct)
                || (!metrics.break_even_ratio.is_defined() && costs_without_rent),
            rubric.high_break_even_weight,
        ),
        (
            RiskFactor::NegativeCashFlow,
            negative_cash_flow,
            rubric.negative_cash_flow_weight,
        ),
    ];

    let mut score = 0.0;
    let mut factors = Vec::new();
    for (factor, triggered, weight) in checks {
        if triggered {
            // Negative weights would break monotonicity
            score += weight.max(0.0);
            factors.push(factor);
        }
    }

    let score = score.clamp(0.0, MAX_SCORE);
    RiskAssessment {
        score,
        grade: rubric.grades.grade(score),
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_profitability_metrics;
    use crate::snapshot::PropertySnapshot;

    fn healthy() -> PropertySnapshot {
        let mut s = PropertySnapshot::with_standard_financing(
            500_000.0, 400_000.0, 120_000.0, 250_000.0, 1_700.0, 5.0, 4.0,
        );
        s.monthly_rent = 4_000.0;
        s.vacancy_rate_pct = 5.0;
        s.monthly_operating_expenses = 800.0;
        s
    }

    #[test]
    fn test_healthy_property_scores_zero() {
        let m = compute_profitability_metrics(&healthy()).unwrap();
        assert_eq!(m.risk_score, 0.0);
        assert!(m.risk_factors.is_empty());
        assert_eq!(m.risk_grade, RiskGrade::Low);
    }

    #[test]
    fn test_distressed_property_is_clamped() {
        let mut s = healthy();
        s.market_value = 200_000.0;
        s.monthly_rent = 1_000.0;
        s.monthly_payment = 2_500.0;
        let m = compute_profitability_metrics(&s).unwrap();

        assert!(m.risk_factors.contains(&RiskFactor::Underwater));
        assert!(m.risk_factors.contains(&RiskFactor::NegativeCashFlow));
        assert!(m.risk_score <= 100.0);
        assert_eq!(m.risk_grade, RiskGrade::High);
    }

    #[test]
    fn test_heavy_weights_clamp_at_hundred() {
        let rubric = RiskRubric {
            negative_cash_flow_weight: 500.0,
            ..Default::default()
        };
        let mut s = healthy();
        s.monthly_rent = 0.0;
        let m = crate::metrics::compute_profitability_metrics_with(&s, &rubric).unwrap();
        assert_eq!(m.risk_score, 100.0);
    }

    #[test]
    fn test_score_monotone_in_payment() {
        let mut previous = 0.0;
        for payment in [1_000.0, 2_000.0, 3_000.0, 4_000.0, 5_000.0] {
            let mut s = healthy();
            s.monthly_payment = payment;
            let score = compute_profitability_metrics(&s).unwrap().risk_score;
            assert!(score >= previous, "score fell from {} to {}", previous, score);
            previous = score;
        }
    }

    #[test]
    fn test_no_rent_with_costs_never_breaks_even() {
        let mut s = healthy();
        s.monthly_rent = 0.0;
        let m = compute_profitability_metrics(&s).unwrap();
        assert!(m.risk_factors.contains(&RiskFactor::HighBreakEven));
    }
}
