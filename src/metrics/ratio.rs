//! Ratio values that may be structurally undefined

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ratio whose denominator may be zero
///
/// `Undefined` stands in for what would otherwise be NaN or infinity, so
/// downstream arithmetic has to handle the case explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Ratio {
    Defined(f64),
    Undefined,
}

impl Ratio {
    /// `numerator / denominator`, undefined for a zero denominator
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            Ratio::Undefined
        } else {
            Ratio::Defined(numerator / denominator)
        }
    }

    /// Same as [`Ratio::of`], scaled to a percentage
    pub fn percent(numerator: f64, denominator: f64) -> Self {
        Self::of(numerator, denominator).map(|r| r * 100.0)
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Ratio::Defined(v) => Ratio::Defined(f(v)),
            Ratio::Undefined => Ratio::Undefined,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(*v),
            Ratio::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Ratio::Defined(_))
    }

    /// True only for a defined value strictly below `threshold`
    pub fn is_below(&self, threshold: f64) -> bool {
        matches!(self, Ratio::Defined(v) if *v < threshold)
    }

    /// True only for a defined value strictly above `threshold`
    pub fn is_above(&self, threshold: f64) -> bool {
        matches!(self, Ratio::Defined(v) if *v > threshold)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Defined(v) => f.pad(&format!("{:.2}", v)),
            Ratio::Undefined => f.pad("n/a"),
        }
    }
}
