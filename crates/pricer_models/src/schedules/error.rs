//! Schedule generation error types.

use pricer_core::types::time::Date;
use pricer_core::types::DateError;
use thiserror::Error;

/// Errors that can occur during schedule generation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Start date must be before end date.
    #[error("Start date {start} must be before end date {end}")]
    InvalidDateRange {
        /// The start date.
        start: Date,
        /// The end date.
        end: Date,
    },

    /// Missing required field in builder.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A zero-length tenor was requested.
    #[error("Period tenor must be at least one month")]
    ZeroTenor,

    /// Date arithmetic failed.
    #[error("Date arithmetic failed: {0}")]
    Date(#[from] DateError),
}
