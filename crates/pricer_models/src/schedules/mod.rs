//! Accrual schedules for the legs of fixed/ibor swaps.
//!
//! This module provides:
//! - [`Schedule`]: an ordered list of contiguous accrual periods
//! - [`Period`]: a single accrual period with start, end, and payment dates
//! - [`ScheduleBuilder`]: builder rolling a tenor forward from a start date
//!
//! # Examples
//!
//! ```
//! use pricer_models::schedules::ScheduleBuilder;
//! use pricer_core::types::time::{Date, DayCountConvention, Tenor};
//!
//! let schedule = ScheduleBuilder::new()
//!     .start(Date::from_ymd(2016, 7, 11).unwrap())
//!     .end(Date::from_ymd(2018, 7, 11).unwrap())
//!     .tenor(Tenor::from_months(6))
//!     .day_count(DayCountConvention::Thirty360)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schedule.periods().len(), 4);
//! ```

mod error;
mod period;
mod schedule;

pub use error::ScheduleError;
pub use period::Period;
pub use schedule::{Schedule, ScheduleBuilder};
