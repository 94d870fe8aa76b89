//! Instrument error types.
//!
//! This module provides structured error handling for swap and swaption
//! construction.

use pricer_core::types::{DateError, PricingError};
use thiserror::Error;

use crate::schedules::ScheduleError;

/// Instrument-related errors.
///
/// # Variants
/// - `EmptyLeg`: A swap leg has no coupon left
/// - `InvalidExpiry`: Expiry is negative or after the settlement
/// - `InvalidNotional`: Notional amount is invalid
/// - `InvalidParameter`: General parameter validation failure
/// - `Schedule`: Schedule generation failed
/// - `Date`: Date arithmetic failed
///
/// # Examples
/// ```
/// use pricer_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidExpiry { expiry: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// A leg would contain no coupon.
    #[error("Empty {leg} leg")]
    EmptyLeg {
        /// Leg description
        leg: &'static str,
    },

    /// Invalid expiry time.
    #[error("Invalid expiry: T = {expiry}")]
    InvalidExpiry {
        /// The invalid expiry value
        expiry: f64,
    },

    /// Invalid notional amount.
    #[error("Invalid notional: N = {notional}")]
    InvalidNotional {
        /// The invalid notional value
        notional: f64,
    },

    /// Invalid parameter (general validation failure).
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the validation failure
        message: String,
    },

    /// Schedule generation failed.
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Date arithmetic failed.
    #[error("Date error: {0}")]
    Date(#[from] DateError),
}

impl From<InstrumentError> for PricingError {
    fn from(err: InstrumentError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_pricing_error() {
        let err: PricingError = InstrumentError::EmptyLeg { leg: "fixed" }.into();
        assert_eq!(err, PricingError::InvalidInput("Empty fixed leg".to_string()));
    }

    #[test]
    fn test_schedule_error_wraps() {
        let err: InstrumentError = ScheduleError::ZeroTenor.into();
        assert!(err.to_string().contains("at least one month"));
    }
}
