//! Engine assumptions: risk rubric and sensitivity multipliers

mod rubric;

pub use rubric::{GradeBoundaries, RiskGrade, RiskRubric};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default path to an assumptions override file
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions.json";

/// Container for all tunable assumptions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    pub risk: RiskRubric,
    pub sensitivity: SensitivityMultipliers,
}

/// Fixed multipliers applied to the resolved appreciation rate for the
/// worst/base/best bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityMultipliers {
    pub worst: f64,
    pub base: f64,
    pub best: f64,
}

impl Default for SensitivityMultipliers {
    fn default() -> Self {
        Self {
            worst: 0.85,
            base: 1.0,
            best: 1.15,
        }
    }
}

impl Assumptions {
    /// Load assumptions from a JSON file; absent keys keep their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load from the default location, or fall back to built-in defaults
    /// when no file exists there
    pub fn from_default_path() -> Result<Self> {
        let path = Path::new(DEFAULT_ASSUMPTIONS_PATH);
        if path.exists() {
            Self::from_json_path(path)
        } else {
            Ok(Self::default())
        }
    }
}
