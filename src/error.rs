//! Error types for pedigree inference.

use thiserror::Error;

/// Result type alias for heredity operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for heredity.
#[derive(Error, Debug)]
pub enum Error {
    // Pedigree errors (10-19)
    #[error("malformed pedigree: {0}")]
    MalformedPedigree(String),

    // Evidence errors (20-29)
    #[error("contradictory evidence: no consistent assignment gives {individual} nonzero weight")]
    ContradictoryEvidence { individual: String },

    #[error("inconsistent evidence totals for {individual}: expected {expected}, got {actual}")]
    InconsistentEvidence {
        individual: String,
        expected: f64,
        actual: f64,
    },

    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),

    // Model errors (30-39)
    #[error("invalid model: {0}")]
    InvalidModel(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    pub fn code(&self) -> u32 {
        match self {
            Error::MalformedPedigree(_) => 10,
            Error::ContradictoryEvidence { .. } => 20,
            Error::InconsistentEvidence { .. } => 21,
            Error::InvalidAssignment(_) => 22,
            Error::InvalidModel(_) => 30,
            Error::Io(_) => 60,
            Error::Csv(_) => 61,
            Error::Json(_) => 62,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedPedigree(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_grouped() {
        assert_eq!(Error::malformed("x").code(), 10);
        let err = Error::ContradictoryEvidence {
            individual: "Lisa".into(),
        };
        assert_eq!(err.code(), 20);
        assert!(err.to_string().contains("Lisa"));
        assert_eq!(Error::InvalidModel("bad".into()).code(), 30);
    }
}
