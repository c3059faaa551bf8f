//! Error types for the citemetrics engine
//!
//! Provides the analysis error taxonomy with:
//! - Distinct error types for different failure modes
//! - Severity classification (fatal vs. recoverable)
//! - Error codes for caller handling

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AnalysisError
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Input errors (1xxx)
    InvalidGraphInput,

    // Clustering errors (2xxx)
    ClusteringDidNotConverge,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Input (1xxx)
            ErrorCode::InvalidGraphInput => 1001,

            // Clustering (2xxx)
            ErrorCode::ClusteringDidNotConverge => 2001,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
        }
    }
}

/// Analysis error types
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Structural violation in the input records. Raised before any
    /// computation starts; no partial graph state is produced.
    #[error("Invalid graph input: {message}")]
    InvalidGraphInput { message: String },

    /// The community optimization did not stabilize within the
    /// configured number of aggregation passes. Callers route the run
    /// onto the corpus-wide fallback path rather than failing.
    #[error("Clustering did not converge after {passes} aggregation passes")]
    ClusteringDidNotConverge { passes: u32 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AnalysisError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalysisError::InvalidGraphInput { .. } => ErrorCode::InvalidGraphInput,
            AnalysisError::ClusteringDidNotConverge { .. } => ErrorCode::ClusteringDidNotConverge,
            AnalysisError::Configuration { .. } => ErrorCode::ConfigurationError,
            AnalysisError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Check if this error aborts the run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AnalysisError::ClusteringDidNotConverge { .. })
    }

    /// Check if this error degrades to the fallback path
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }
}

impl From<config::ConfigError> for AnalysisError {
    fn from(err: config::ConfigError) -> Self {
        AnalysisError::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AnalysisError::InvalidGraphInput {
            message: "dangling edge".into(),
        };
        assert_eq!(err.code(), ErrorCode::InvalidGraphInput);
        assert_eq!(err.code().as_code(), 1001);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_non_convergence_is_recoverable() {
        let err = AnalysisError::ClusteringDidNotConverge { passes: 16 };
        assert_eq!(err.code(), ErrorCode::ClusteringDidNotConverge);
        assert!(err.is_recoverable());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_configuration_error() {
        let err = AnalysisError::Configuration {
            message: "resolution must be positive".into(),
        };
        assert_eq!(err.code().as_code(), 9002);
        assert!(err.is_fatal());
    }
}
