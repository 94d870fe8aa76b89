//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from swaption pricing methods
//! - `DateError`: Errors from date construction and parsing
//! - `CurrencyError`: Errors from currency parsing
//! - `InterpolationError`: Errors from interpolation operations
//! - `SolverError`: Errors from root-finding and least-squares solvers
//! - `CalibrationError`: Errors from successive model calibration

use std::fmt;
use thiserror::Error;

use crate::market_data::MarketDataError;

/// Categorised pricing errors.
///
/// Provides structured error handling for pricing operations with
/// descriptive context for each failure mode.
///
/// # Variants
/// - `InvalidInput`: Invalid market data, curve names or parameters
/// - `NumericalInstability`: Computation failed to converge
/// - `ModelFailure`: Model assumptions violated
/// - `UnsupportedInstrument`: Swaption variant not supported by the method
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("unknown curve 'Funding'".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: unknown curve 'Funding'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters
    InvalidInput(String),

    /// Numerical instability during computation
    NumericalInstability(String),

    /// Model failed to produce valid result
    ModelFailure(String),

    /// Instrument type not supported
    UnsupportedInstrument(String),
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PricingError::NumericalInstability(msg) => {
                write!(f, "Numerical instability: {}", msg)
            }
            PricingError::ModelFailure(msg) => write!(f, "Model failure: {}", msg),
            PricingError::UnsupportedInstrument(msg) => {
                write!(f, "Unsupported instrument: {}", msg)
            }
        }
    }
}

impl std::error::Error for PricingError {}

impl From<MarketDataError> for PricingError {
    fn from(err: MarketDataError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

impl From<SolverError> for PricingError {
    fn from(err: SolverError) -> Self {
        PricingError::NumericalInstability(err.to_string())
    }
}

impl From<InterpolationError> for PricingError {
    fn from(err: InterpolationError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

/// Date-related errors.
///
/// # Variants
/// - `InvalidDate`: Invalid date components (e.g., February 30th)
/// - `ParseError`: Failed to parse date string
///
/// # Examples
/// ```
/// use pricer_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Date arithmetic left the representable range.
    OutOfRange(String),

    /// Failed to parse date string.
    ParseError(String),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::InvalidDate { year, month, day } => {
                write!(f, "Invalid date: {}-{}-{}", year, month, day)
            }
            DateError::OutOfRange(msg) => write!(f, "Date out of range: {}", msg),
            DateError::ParseError(msg) => write!(f, "Date parse error: {}", msg),
        }
    }
}

impl std::error::Error for DateError {}

/// Currency-related errors.
///
/// # Examples
/// ```
/// use pricer_core::types::CurrencyError;
///
/// let err = CurrencyError::UnknownCurrency("XYZ".to_string());
/// assert_eq!(format!("{}", err), "Unknown currency: XYZ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// Unknown currency code.
    UnknownCurrency(String),

    /// Two amounts in different currencies were combined.
    Mismatch {
        /// Currency of the left operand
        left: String,
        /// Currency of the right operand
        right: String,
    },
}

impl fmt::Display for CurrencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyError::UnknownCurrency(code) => write!(f, "Unknown currency: {}", code),
            CurrencyError::Mismatch { left, right } => {
                write!(f, "Currency mismatch: {} vs {}", left, right)
            }
        }
    }
}

impl std::error::Error for CurrencyError {}

/// Interpolation-related errors.
///
/// # Variants
/// - `OutOfBounds`: Query point outside valid interpolation domain
/// - `InsufficientData`: Not enough data points for interpolation
/// - `NonMonotonicData`: Data violates monotonicity requirement
/// - `InvalidInput`: General invalid input error
///
/// # Examples
/// ```
/// use pricer_core::types::InterpolationError;
///
/// let err = InterpolationError::OutOfBounds { x: 5.0, min: 0.0, max: 3.0 };
/// assert!(format!("{}", err).contains("outside valid domain"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationError {
    /// Query point outside valid interpolation domain.
    #[error("Query point {x} outside valid domain [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Insufficient data points for interpolation.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Data is not monotonic when monotonicity is required.
    #[error("Data is not monotonic at index {index}")]
    NonMonotonicData {
        /// Index where monotonicity violation was detected
        index: usize,
    },

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Root-finding and least-squares solver errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: Iteration budget exhausted; carries the last iterate
/// - `NoBracket`: Function values at bracket endpoints have same sign
/// - `NumericalInstability`: General numerical instability
///
/// # Examples
/// ```
/// use pricer_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100, last: 0.5, residual: 1e-3 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations (last x = {last}, residual = {residual:e})")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
        /// Last attempted value
        last: f64,
        /// Function value at the last attempted value
        residual: f64,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Calibration error kind.
///
/// # Variants
/// - `NotConverged`: A calibration step failed to converge within its budget
/// - `NumericalInstability`: Numerical issues during calibration
/// - `InsufficientData`: No instrument was added before calibrating
/// - `InvalidParameter`: Invalid parameter value during calibration
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalibrationErrorKind {
    /// Calibration did not converge within iteration limit.
    #[error("calibration did not converge")]
    NotConverged,

    /// Numerical instability during calibration.
    #[error("numerical instability")]
    NumericalInstability,

    /// Insufficient market data for calibration.
    #[error("insufficient data: need at least {need} instruments, got {got}")]
    InsufficientData {
        /// Number of instruments provided.
        got: usize,
        /// Minimum required instruments.
        need: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Calibration error with detailed diagnostics.
///
/// A failed successive calibration never yields a parameter object; the
/// partially calibrated values and the failing step are carried here instead.
///
/// # Fields
/// - `kind`: The type of calibration error
/// - `residual_ss`: Residual (price difference squared for root finding)
/// - `iterations`: Number of iterations performed
/// - `message`: Optional detailed error message
/// - `parameter_values`: Last attempted parameter values
/// - `instrument_index`: Index of the instrument being calibrated
///
/// # Examples
/// ```
/// use pricer_core::types::CalibrationError;
///
/// let err = CalibrationError::not_converged(100, 0.01).with_parameters(vec![0.012]);
/// assert_eq!(err.iterations, 100);
/// assert_eq!(err.parameter_values, Some(vec![0.012]));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationError {
    /// The type of calibration error.
    pub kind: CalibrationErrorKind,

    /// Final residual sum of squares.
    pub residual_ss: f64,

    /// Number of iterations performed.
    pub iterations: usize,

    /// Detailed error message.
    pub message: Option<String>,

    /// Last attempted parameter values (if available).
    pub parameter_values: Option<Vec<f64>>,

    /// Instrument being calibrated when the failure occurred.
    pub instrument_index: Option<usize>,
}

impl CalibrationError {
    /// Create a new calibration error.
    pub fn new(kind: CalibrationErrorKind) -> Self {
        Self {
            kind,
            residual_ss: f64::NAN,
            iterations: 0,
            message: None,
            parameter_values: None,
            instrument_index: None,
        }
    }

    /// Create a not-converged error.
    ///
    /// # Arguments
    /// * `iterations` - Number of iterations performed
    /// * `residual_ss` - Final residual sum of squares
    pub fn not_converged(iterations: usize, residual_ss: f64) -> Self {
        Self {
            kind: CalibrationErrorKind::NotConverged,
            residual_ss,
            iterations,
            message: Some(format!(
                "Failed to converge after {} iterations (residual_ss: {:.6e})",
                iterations, residual_ss
            )),
            parameter_values: None,
            instrument_index: None,
        }
    }

    /// Create a numerical instability error.
    pub fn numerical_instability(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(CalibrationErrorKind::NumericalInstability)
        }
    }

    /// Create an insufficient data error.
    pub fn insufficient_data(got: usize, need: usize) -> Self {
        Self {
            message: Some(format!(
                "Insufficient data: got {} instruments, need at least {}",
                got, need
            )),
            ..Self::new(CalibrationErrorKind::InsufficientData { got, need })
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            message: Some(msg.clone()),
            ..Self::new(CalibrationErrorKind::InvalidParameter(msg))
        }
    }

    /// Set the last attempted parameter values.
    pub fn with_parameters(mut self, params: Vec<f64>) -> Self {
        self.parameter_values = Some(params);
        self
    }

    /// Set the residual sum of squares.
    pub fn with_residual(mut self, residual_ss: f64) -> Self {
        self.residual_ss = residual_ss;
        self
    }

    /// Set the iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set a detailed message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the index of the instrument that failed.
    pub fn with_instrument(mut self, index: usize) -> Self {
        self.instrument_index = Some(index);
        self
    }

    /// Check if the error is due to non-convergence.
    pub fn is_not_converged(&self) -> bool {
        matches!(self.kind, CalibrationErrorKind::NotConverged)
    }

    /// Check if the error is due to numerical instability.
    pub fn is_numerical_instability(&self) -> bool {
        matches!(self.kind, CalibrationErrorKind::NumericalInstability)
    }

    /// Check if the error is due to insufficient data.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self.kind, CalibrationErrorKind::InsufficientData { .. })
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Calibration error: {}", self.kind)?;
        if let Some(ref msg) = self.message {
            if !matches!(self.kind, CalibrationErrorKind::NotConverged) {
                write!(f, " - {}", msg)?;
            }
        }
        if let Some(index) = self.instrument_index {
            write!(f, " (instrument {})", index)?;
        }
        if self.iterations > 0 {
            write!(f, " (after {} iterations)", self.iterations)?;
        }
        if !self.residual_ss.is_nan() {
            write!(f, " [residual_ss: {:.6e}]", self.residual_ss)?;
        }
        Ok(())
    }
}

impl std::error::Error for CalibrationError {}

impl From<SolverError> for CalibrationError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::MaxIterationsExceeded {
                iterations,
                last,
                residual,
            } => CalibrationError::not_converged(iterations, residual * residual)
                .with_parameters(vec![last]),
            SolverError::NumericalInstability(msg) => CalibrationError::numerical_instability(msg),
            SolverError::NoBracket { a, b } => CalibrationError::numerical_instability(format!(
                "No bracket found between {} and {}",
                a, b
            ))
            .with_parameters(vec![a, b]),
        }
    }
}

impl From<PricingError> for CalibrationError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidInput(_) | PricingError::UnsupportedInstrument(_) => {
                CalibrationError::invalid_parameter(err.to_string())
            }
            _ => CalibrationError::numerical_instability(err.to_string()),
        }
    }
}

impl From<CalibrationError> for PricingError {
    fn from(err: CalibrationError) -> Self {
        PricingError::ModelFailure(err.to_string())
    }
}
