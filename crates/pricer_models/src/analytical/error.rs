//! Error types for analytical formulas.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Analytical formula errors.
///
/// # Variants
/// - `InvalidVolatility`: Negative or non-finite volatility
/// - `PriceOutOfBounds`: Option price outside its no-arbitrage bounds
/// - `NumericalInstability`: Computation encountered numerical issues
///
/// # Examples
/// ```
/// use pricer_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Invalid volatility.
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Price cannot be matched by any volatility.
    #[error("Price {price} outside no-arbitrage bounds [{lower}, {upper}]")]
    PriceOutOfBounds {
        /// The target price
        price: f64,
        /// Intrinsic value
        lower: f64,
        /// Maximal option value
        upper: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {message}")]
    NumericalInstability {
        /// Description of the numerical issue
        message: String,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        match err {
            AnalyticalError::InvalidVolatility { .. } | AnalyticalError::PriceOutOfBounds { .. } => {
                PricingError::InvalidInput(err.to_string())
            }
            AnalyticalError::NumericalInstability { .. } => {
                PricingError::NumericalInstability(err.to_string())
            }
        }
    }
}
