//! Time, currency and error types.
//!
//! This module provides:
//! - `time`: Dates, tenors, day count and business day conventions
//! - `currency`: ISO 4217 currency codes
//! - `error`: Structured error types for pricing, dates, solvers and calibration
//!
//! # Re-exports
//!
//! - [`Date`], [`Tenor`], [`DayCountConvention`], [`BusinessDayConvention`], [`time_between`] from `time`
//! - [`Currency`] from `currency`
//! - [`PricingError`], [`DateError`], [`CurrencyError`], [`InterpolationError`],
//!   [`SolverError`], [`CalibrationError`], [`CalibrationErrorKind`] from `error`

pub mod currency;
pub mod error;
pub mod time;

pub use currency::Currency;
pub use error::{
    CalibrationError, CalibrationErrorKind, CurrencyError, DateError, InterpolationError,
    PricingError, SolverError,
};
pub use time::{time_between, BusinessDayConvention, Date, DayCountConvention, Tenor};
