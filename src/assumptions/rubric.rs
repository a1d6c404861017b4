//! Risk rubric: thresholds and penalty weights for the heuristic risk score
//!
//! The defaults are a hand-tuned scoring rubric, not a statistically
//! calibrated model. Thresholds and weights may be adjusted freely, but every
//! factor only ever adds to the score and the total is clamped to [0, 100].

use serde::{Deserialize, Serialize};

/// Thresholds (percent or ratio) and the points each triggered factor adds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskRubric {
    /// Cash-on-cash return below this (percent) is penalized
    pub min_cash_on_cash_pct: f64,
    pub low_cash_on_cash_weight: f64,

    /// DSCR below this is penalized; loans with no debt service are not
    pub min_dscr: f64,
    pub thin_coverage_weight: f64,

    /// LTV above this (percent) is penalized
    pub max_loan_to_value_pct: f64,
    pub high_leverage_weight: f64,

    /// Extra penalty once the loan exceeds the value (LTV > 100%)
    pub underwater_weight: f64,

    /// Cap rate below this (percent) is penalized
    pub min_cap_rate_pct: f64,
    pub low_cap_rate_weight: f64,

    /// Break-even ratio above this (percent) is penalized
    pub max_break_even_pct: f64,
    pub high_break_even_weight: f64,

    /// Penalty when NOI does not cover debt service
    pub negative_cash_flow_weight: f64,

    pub grades: GradeBoundaries,
}

impl Default for RiskRubric {
    fn default() -> Self {
        Self {
            min_cash_on_cash_pct: 5.0,
            low_cash_on_cash_weight: 20.0,
            min_dscr: 1.25,
            thin_coverage_weight: 20.0,
            max_loan_to_value_pct: 80.0,
            high_leverage_weight: 15.0,
            underwater_weight: 10.0,
            min_cap_rate_pct: 4.0,
            low_cap_rate_weight: 10.0,
            max_break_even_pct: 85.0,
            high_break_even_weight: 10.0,
            negative_cash_flow_weight: 15.0,
            grades: GradeBoundaries::default(),
        }
    }
}

/// Lower score bounds for each grade above `Low`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeBoundaries {
    pub moderate: f64,
    pub elevated: f64,
    pub high: f64,
}

impl Default for GradeBoundaries {
    fn default() -> Self {
        Self {
            moderate: 25.0,
            elevated: 50.0,
            high: 75.0,
        }
    }
}

/// Qualitative reading of a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskGrade {
    Low,
    Moderate,
    Elevated,
    High,
}

impl GradeBoundaries {
    pub fn grade(&self, score: f64) -> RiskGrade {
        if score >= self.high {
            RiskGrade::High
        } else if score >= self.elevated {
            RiskGrade::Elevated
        } else if score >= self.moderate {
            RiskGrade::Moderate
        } else {
            RiskGrade::Low
        }
    }
}

impl RiskGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskGrade::Low => "Low",
            RiskGrade::Moderate => "Moderate",
            RiskGrade::Elevated => "Elevated",
            RiskGrade::High => "High",
        }
    }
}
