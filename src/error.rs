//! Error types for the projection engine and its loaders

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while validating, computing or loading
///
/// The first three variants come from the engine itself and are always local
/// and synchronous. The remaining ones only appear at the file boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// A field is negative, non-finite, out of range or breaks an invariant
    #[error("invalid input for `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// A ratio whose denominator is structurally zero and that has no fallback
    #[error("{ratio} is undefined: {reason}")]
    UndefinedRatio { ratio: &'static str, reason: String },

    /// The scheduled payment does not cover interest at the given period
    #[error("loan does not amortize: payment does not cover interest in period {period_index}")]
    NonAmortizing { period_index: u32 },

    #[error("failed to load row {row}: {reason}")]
    Load { row: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidInput { field, reason: reason.into() }
    }

    pub(crate) fn undefined(ratio: &'static str, reason: impl Into<String>) -> Self {
        Error::UndefinedRatio { ratio, reason: reason.into() }
    }
}
