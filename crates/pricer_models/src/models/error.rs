//! Model parameter validation errors.

use pricer_core::types::{CalibrationError, InterpolationError, PricingError};
use thiserror::Error;

/// Errors raised while building or bumping model parameters.
///
/// # Examples
/// ```
/// use pricer_models::models::ModelError;
///
/// let err = ModelError::InvalidMeanReversion { value: -0.01 };
/// assert!(err.to_string().contains("-0.01"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Mean reversion must be positive.
    #[error("Invalid mean reversion: a = {value}")]
    InvalidMeanReversion {
        /// The rejected value
        value: f64,
    },

    /// A volatility is negative or not finite.
    #[error("Invalid volatility at index {index}: {value}")]
    InvalidVolatility {
        /// Position in the volatility array
        index: usize,
        /// The rejected value
        value: f64,
    },

    /// Knot times must be positive and strictly increasing.
    #[error("Knot times not strictly increasing at index {index}")]
    NonIncreasingKnots {
        /// First offending knot
        index: usize,
    },

    /// Array lengths do not agree.
    #[error("Dimension mismatch: {message}")]
    DimensionMismatch {
        /// What did not match
        message: String,
    },

    /// A scalar parameter is out of its domain.
    #[error("Invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// An index is outside the parameter arrays.
    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// Surface construction failed.
    #[error("Surface error: {0}")]
    Surface(#[from] InterpolationError),
}

impl From<ModelError> for PricingError {
    fn from(err: ModelError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

impl From<ModelError> for CalibrationError {
    fn from(err: ModelError) -> Self {
        CalibrationError::invalid_parameter(err.to_string())
    }
}
