//! A single accrual period.

use pricer_core::types::time::{Date, DayCountConvention};
use std::fmt;

/// One accrual period with its payment date and day count.
///
/// # Examples
///
/// ```
/// use pricer_models::schedules::Period;
/// use pricer_core::types::time::{Date, DayCountConvention};
///
/// let period = Period::with_payment_on_end(
///     Date::from_ymd(2016, 7, 11).unwrap(),
///     Date::from_ymd(2017, 1, 11).unwrap(),
///     DayCountConvention::Thirty360,
/// );
/// assert!((period.year_fraction() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Period {
    start: Date,
    end: Date,
    payment: Date,
    day_count: DayCountConvention,
}

impl Period {
    /// Creates a period.
    #[inline]
    pub fn new(start: Date, end: Date, payment: Date, day_count: DayCountConvention) -> Self {
        Self {
            start,
            end,
            payment,
            day_count,
        }
    }

    /// A period paid on its accrual end date.
    #[inline]
    pub fn with_payment_on_end(start: Date, end: Date, day_count: DayCountConvention) -> Self {
        Self::new(start, end, end, day_count)
    }

    /// Accrual start date.
    #[inline]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Accrual end date.
    #[inline]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Payment date.
    #[inline]
    pub fn payment(&self) -> Date {
        self.payment
    }

    /// Day count used for the accrual factor.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Accrual factor of the period.
    #[inline]
    pub fn year_fraction(&self) -> f64 {
        self.day_count.year_fraction(self.start, self.end)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} - {}] paid {} ({})",
            self.start,
            self.end,
            self.payment,
            self.day_count.name()
        )
    }
}
