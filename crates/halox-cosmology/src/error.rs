//! Error types for cosmology operations.

use halox_math::MathError;
use thiserror::Error;

/// A specialized Result type for cosmology operations.
pub type CosmologyResult<T> = Result<T, CosmologyError>;

/// Errors that can occur while building or querying a cosmological model.
#[derive(Error, Debug)]
pub enum CosmologyError {
    /// A named parameterisation is not recognised.
    #[error("Invalid {kind} parameterisation '{name}', accepted: {accepted}")]
    InvalidParameterization {
        /// Family of the parameterisation (e.g. "luminosity function").
        kind: &'static str,
        /// The rejected name.
        name: String,
        /// Comma separated list of accepted names.
        accepted: &'static str,
    },

    /// Invalid construction input.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Malformed line in a tabulated power spectrum.
    #[error("Parse error at line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// I/O error reading input data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the numerical layer.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl CosmologyError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}
