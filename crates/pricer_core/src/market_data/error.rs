//! Market data error types.

use crate::types::InterpolationError;
use thiserror::Error;

/// Market data operation errors.
///
/// # Variants
///
/// - `CurveNotFound`: No curve registered under the requested name
/// - `InvalidMaturity`: Negative or otherwise unusable time
/// - `OutOfBounds`: Query outside valid domain
/// - `UnsupportedBump`: Bump requested on a curve that cannot carry it
/// - `Interpolation`: Wrapped interpolation error
/// - `InsufficientData`: Not enough data points for construction
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketDataError;
///
/// let err = MarketDataError::CurveNotFound { name: "Funding".to_string() };
/// assert_eq!(err.to_string(), "Curve not found: Funding");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Curve name is not present in the bundle.
    #[error("Curve not found: {name}")]
    CurveNotFound {
        /// Requested curve name
        name: String,
    },

    /// Invalid maturity (negative time).
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Query point outside valid domain.
    #[error("Out of bounds: {x} not in [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// The curve representation cannot carry the requested bump.
    #[error("Unsupported bump: {0}")]
    UnsupportedBump(String),

    /// Interpolation error.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },
}
