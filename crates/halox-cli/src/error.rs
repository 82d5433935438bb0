//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Unreadable or malformed run configuration.
    #[error("Configuration error in {path}: {reason}")]
    Config {
        /// Configuration file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Configuration values outside their domain.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid sampling range.
    #[error("Invalid range [{min}, {max}] with {points} points: bounds must be positive and increasing")]
    InvalidRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Number of points.
        points: usize,
    },

    /// Redshift outside the tabulated range.
    #[error("Redshift {z} is outside the tabulated range [{min}, {max}]")]
    RedshiftOutOfRange {
        /// Requested redshift.
        z: f64,
        /// Lowest tabulated redshift.
        min: f64,
        /// Highest tabulated redshift.
        max: f64,
    },

    /// Malformed list of numbers.
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    /// Model construction or evaluation failed.
    #[error("Calculation error: {0}")]
    Calculation(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<halox_cosmology::CosmologyError> for CliError {
    fn from(e: halox_cosmology::CosmologyError) -> Self {
        Self::Calculation(e.to_string())
    }
}

impl From<halox_model::ModelError> for CliError {
    fn from(e: halox_model::ModelError) -> Self {
        Self::Calculation(e.to_string())
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
