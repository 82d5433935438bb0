//! Error types for the halo-model pipelines.

use halox_cosmology::CosmologyError;
use halox_math::MathError;
use thiserror::Error;

/// A specialized Result type for halo-model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building or evaluating a halo model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A named model is not recognised.
    #[error("Invalid {kind} parameterisation '{name}'")]
    InvalidParameterization {
        /// Family of the parameterisation (e.g. "occupation").
        kind: &'static str,
        /// The rejected name.
        name: String,
    },

    /// Wrong number of parameters for a model.
    #[error("{model} takes {expected} parameters, got {actual}")]
    ParameterCount {
        /// Model name.
        model: &'static str,
        /// Expected count.
        expected: usize,
        /// Supplied count.
        actual: usize,
    },

    /// A statistic the pipeline does not define.
    #[error("Component '{component}' is not available for the {pipeline} pipeline")]
    UnsupportedComponent {
        /// Requested component.
        component: &'static str,
        /// Pipeline name.
        pipeline: &'static str,
    },

    /// Invalid input.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Error from the cosmology layer.
    #[error("Cosmology error: {0}")]
    Cosmology(#[from] CosmologyError),

    /// Error from the numerical layer.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl ModelError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an invalid parameterisation error.
    #[must_use]
    pub fn invalid_parameterization(kind: &'static str, name: impl Into<String>) -> Self {
        Self::InvalidParameterization {
            kind,
            name: name.into(),
        }
    }
}
