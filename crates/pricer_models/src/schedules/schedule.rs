//! Schedule and ScheduleBuilder implementation.

use super::error::ScheduleError;
use super::period::Period;
use pricer_core::types::time::{BusinessDayConvention, Date, DayCountConvention, Tenor};

/// An ordered, contiguous list of accrual periods.
///
/// # Examples
///
/// ```
/// use pricer_models::schedules::ScheduleBuilder;
/// use pricer_core::types::time::{Date, DayCountConvention, Tenor};
///
/// let schedule = ScheduleBuilder::new()
///     .start(Date::from_ymd(2016, 7, 11).unwrap())
///     .end(Date::from_ymd(2021, 7, 11).unwrap())
///     .tenor(Tenor::from_months(6))
///     .day_count(DayCountConvention::Thirty360)
///     .build()
///     .unwrap();
///
/// assert_eq!(schedule.len(), 10);
/// assert!((schedule.total_year_fraction() - 5.0).abs() < 0.01);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    periods: Vec<Period>,
}

impl Schedule {
    /// Wraps a non-empty list of periods.
    ///
    /// # Errors
    ///
    /// `ScheduleError::MissingField` if `periods` is empty.
    pub fn new(periods: Vec<Period>) -> Result<Self, ScheduleError> {
        if periods.is_empty() {
            return Err(ScheduleError::MissingField { field: "periods" });
        }
        Ok(Self { periods })
    }

    /// The periods in date order.
    #[inline]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Number of periods.
    #[inline]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Always false; kept for symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Payment dates in order.
    pub fn payment_dates(&self) -> Vec<Date> {
        self.periods.iter().map(Period::payment).collect()
    }

    /// Start of the first period.
    #[inline]
    pub fn start_date(&self) -> Date {
        self.periods[0].start()
    }

    /// End of the last period.
    #[inline]
    pub fn end_date(&self) -> Date {
        self.periods[self.periods.len() - 1].end()
    }

    /// Iterator over the periods.
    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.periods.iter()
    }

    /// Sum of the accrual factors.
    pub fn total_year_fraction(&self) -> f64 {
        self.periods.iter().map(Period::year_fraction).sum()
    }
}

/// Builder for regular schedules rolled forward from the start date.
///
/// Dates are `start + i·tenor` adjusted with the business day convention
/// (Monday–Friday calendar); rolling from the start avoids end-of-month drift.
/// A final stub is created when the tenor does not divide the range.
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    start_date: Option<Date>,
    end_date: Option<Date>,
    tenor: Option<Tenor>,
    day_count: DayCountConvention,
    convention: BusinessDayConvention,
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleBuilder {
    /// Creates a builder with ACT/360 and modified following.
    pub fn new() -> Self {
        Self {
            start_date: None,
            end_date: None,
            tenor: None,
            day_count: DayCountConvention::Actual360,
            convention: BusinessDayConvention::ModifiedFollowing,
        }
    }

    /// Sets the start date of the schedule.
    pub fn start(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the (unadjusted) end date of the schedule.
    pub fn end(mut self, date: Date) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Sets the period length.
    pub fn tenor(mut self, tenor: Tenor) -> Self {
        self.tenor = Some(tenor);
        self
    }

    /// Sets the day count convention.
    pub fn day_count(mut self, dc: DayCountConvention) -> Self {
        self.day_count = dc;
        self
    }

    /// Sets the business day convention.
    pub fn business_day_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Builds the schedule.
    ///
    /// # Errors
    ///
    /// - `MissingField` if start, end or tenor is missing
    /// - `ZeroTenor` for a zero-month tenor
    /// - `InvalidDateRange` unless start < end
    pub fn build(self) -> Result<Schedule, ScheduleError> {
        let start = self
            .start_date
            .ok_or(ScheduleError::MissingField { field: "start" })?;
        let end = self
            .end_date
            .ok_or(ScheduleError::MissingField { field: "end" })?;
        let tenor = self
            .tenor
            .ok_or(ScheduleError::MissingField { field: "tenor" })?;
        if tenor.months() == 0 {
            return Err(ScheduleError::ZeroTenor);
        }
        if start >= end {
            return Err(ScheduleError::InvalidDateRange { start, end });
        }

        let adjusted_end = self.convention.adjust(end)?;
        let mut periods = Vec::new();
        let mut period_start = start;
        let mut step = 1;
        loop {
            let unadjusted = start.add_months((step * tenor.months()) as i32)?;
            let last = unadjusted >= end;
            let period_end = if last {
                adjusted_end
            } else {
                self.convention.adjust(unadjusted)?
            };
            periods.push(Period::with_payment_on_end(period_start, period_end, self.day_count));
            if last {
                break;
            }
            period_start = period_end;
            step += 1;
        }
        Schedule::new(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_quarterly_schedule_is_contiguous() {
        let schedule = ScheduleBuilder::new()
            .start(date(2016, 7, 11))
            .end(date(2021, 7, 11))
            .tenor(Tenor::from_months(3))
            .build()
            .unwrap();
        assert_eq!(schedule.len(), 20);
        for pair in schedule.periods().windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
        assert_eq!(schedule.start_date(), date(2016, 7, 11));
        assert_eq!(schedule.end_date(), date(2021, 7, 12)); // 2021-07-11 is a Sunday
    }

    #[test]
    fn test_dates_are_business_days() {
        let schedule = ScheduleBuilder::new()
            .start(date(2016, 7, 11))
            .end(date(2026, 7, 11))
            .tenor(Tenor::from_months(6))
            .day_count(DayCountConvention::Thirty360)
            .build()
            .unwrap();
        assert!(schedule.payment_dates().iter().all(Date::is_business_day));
    }

    #[test]
    fn test_final_stub() {
        let schedule = ScheduleBuilder::new()
            .start(date(2016, 1, 15))
            .end(date(2017, 3, 15))
            .tenor(Tenor::from_months(6))
            .build()
            .unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule.end_date(), date(2017, 3, 15));
    }

    #[test]
    fn test_missing_fields() {
        let err = ScheduleBuilder::new().start(date(2016, 1, 15)).build().unwrap_err();
        assert_eq!(err, ScheduleError::MissingField { field: "end" });
        let err = ScheduleBuilder::new()
            .start(date(2016, 1, 15))
            .end(date(2015, 1, 15))
            .tenor(Tenor::from_months(3))
            .build()
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDateRange { .. }));
    }
}
