//! Dates, tenors, day count and business day conventions.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `Tenor`: Month-based periods used to roll swap schedules
//! - `DayCountConvention`: Accrual year fractions
//! - `BusinessDayConvention`: Weekend adjustment rules
//!
//! The calendar is Monday to Friday with no holidays.
//!
//! # Examples
//!
//! ```
//! use pricer_core::types::time::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2011, 7, 7).unwrap();
//! let end = Date::from_ymd(2012, 1, 9).unwrap();
//!
//! let yf = DayCountConvention::Actual360.year_fraction(start, end);
//! assert!((yf - 186.0 / 360.0).abs() < 1e-12);
//! ```

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::Date;
///
/// let date = Date::from_ymd(2016, 7, 7).unwrap();
/// let parsed: Date = "2016-07-07".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2016, 7, 1).unwrap();
/// assert_eq!(date - start, 6);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Adds a (possibly negative) number of calendar days.
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        self.0
            .checked_add_signed(Duration::days(days))
            .map(Date)
            .ok_or_else(|| DateError::OutOfRange(format!("{} + {} days", self, days)))
    }

    /// Adds a number of months, clamping to the end of the target month.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// let d = Date::from_ymd(2011, 8, 31).unwrap();
    /// assert_eq!(d.add_months(6).unwrap(), Date::from_ymd(2012, 2, 29).unwrap());
    /// ```
    pub fn add_months(self, months: i32) -> Result<Self, DateError> {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months as u32))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| DateError::OutOfRange(format!("{} + {} months", self, months)))
    }

    /// Returns true for Monday to Friday.
    pub fn is_business_day(&self) -> bool {
        !matches!(self.0.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Moves forward (or backward for negative counts) by business days.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// // Thursday + 2 business days lands on Monday.
    /// let expiry = Date::from_ymd(2016, 7, 7).unwrap();
    /// assert_eq!(expiry.add_business_days(2).unwrap(), Date::from_ymd(2016, 7, 11).unwrap());
    /// ```
    pub fn add_business_days(self, days: i32) -> Result<Self, DateError> {
        let step = if days >= 0 { 1 } else { -1 };
        let mut remaining = days.unsigned_abs();
        let mut current = self;
        while remaining > 0 {
            current = current.add_days(step)?;
            if current.is_business_day() {
                remaining -= 1;
            }
        }
        Ok(current)
    }

    /// Adds a tenor and applies a business day convention.
    pub fn add_tenor(
        self,
        tenor: Tenor,
        convention: BusinessDayConvention,
    ) -> Result<Self, DateError> {
        convention.adjust(self.add_months(tenor.months() as i32)?)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A month-based period such as 3M, 6M or 5Y.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::Tenor;
///
/// let t: Tenor = "5Y".parse().unwrap();
/// assert_eq!(t.months(), 60);
/// assert_eq!(Tenor::from_months(6).periods_per_year(), Some(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tenor {
    months: u32,
}

impl Tenor {
    /// Creates a tenor of the given number of months.
    pub const fn from_months(months: u32) -> Self {
        Self { months }
    }

    /// Creates a tenor of the given number of years.
    pub const fn from_years(years: u32) -> Self {
        Self { months: 12 * years }
    }

    /// Number of months.
    #[inline]
    pub fn months(&self) -> u32 {
        self.months
    }

    /// Number of periods per year, when the tenor divides a year evenly.
    pub fn periods_per_year(&self) -> Option<u32> {
        if self.months > 0 && 12 % self.months == 0 {
            Some(12 / self.months)
        } else {
            None
        }
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months % 12 == 0 && self.months > 0 {
            write!(f, "{}Y", self.months / 12)
        } else {
            write!(f, "{}M", self.months)
        }
    }
}

impl FromStr for Tenor {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();
        let (count, unit) = s.split_at(s.len().saturating_sub(1));
        let count: u32 = count
            .parse()
            .map_err(|_| DateError::ParseError(format!("invalid tenor: {}", s)))?;
        match unit {
            "M" => Ok(Tenor::from_months(count)),
            "Y" => Ok(Tenor::from_years(count)),
            _ => Err(DateError::ParseError(format!("invalid tenor unit: {}", s))),
        }
    }
}

/// Day count convention (accrual year fraction).
///
/// # Variants
/// - `Actual360`: actual days / 360 (ibor legs)
/// - `Actual365Fixed`: actual days / 365 (model time)
/// - `Thirty360`: 30/360 bond basis (fixed legs)
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCountConvention {
    /// Actual/360
    Actual360,
    /// Actual/365 Fixed
    Actual365Fixed,
    /// 30/360 Bond Basis
    Thirty360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    ///
    /// ```
    /// use pricer_core::types::time::DayCountConvention;
    ///
    /// assert_eq!(DayCountConvention::Actual360.name(), "ACT/360");
    /// assert_eq!(DayCountConvention::Thirty360.name(), "30/360");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Actual360 => "ACT/360",
            DayCountConvention::Actual365Fixed => "ACT/365F",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Year fraction between two dates. Negative if `start > end`.
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Actual360 => (end - start) as f64 / 360.0,
            DayCountConvention::Actual365Fixed => (end - start) as f64 / 365.0,
            DayCountConvention::Thirty360 => {
                let d1 = start.day().min(30);
                let d2 = if end.day() == 31 && d1 == 30 {
                    30
                } else {
                    end.day()
                };
                let days = 360 * (end.year() - start.year())
                    + 30 * (end.month() as i32 - start.month() as i32)
                    + (d2 as i32 - d1 as i32);
                days as f64 / 360.0
            }
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace([' ', '_', '-'], "").as_str() {
            "ACT/360" | "A360" | "ACTUAL360" => Ok(DayCountConvention::Actual360),
            "ACT/365F" | "ACT/365" | "A365F" | "ACTUAL365FIXED" => {
                Ok(DayCountConvention::Actual365Fixed)
            }
            "30/360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{BusinessDayConvention, DayCountConvention};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for DayCountConvention {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for DayCountConvention {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            DayCountConvention::from_str(&s).map_err(de::Error::custom)
        }
    }

    impl Serialize for BusinessDayConvention {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.code())
        }
    }

    impl<'de> Deserialize<'de> for BusinessDayConvention {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            BusinessDayConvention::from_str(&s).map_err(de::Error::custom)
        }
    }
}

/// Business day convention for adjusting dates that fall on a weekend.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::{BusinessDayConvention, Date};
///
/// // Saturday 2016-07-30 rolls back to Friday under Modified Following.
/// let sat = Date::from_ymd(2016, 7, 30).unwrap();
/// let adjusted = BusinessDayConvention::ModifiedFollowing.adjust(sat).unwrap();
/// assert_eq!(adjusted, Date::from_ymd(2016, 7, 29).unwrap());
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessDayConvention {
    /// Move to the next business day.
    Following,
    /// Move to the next business day, unless it crosses a month boundary.
    ModifiedFollowing,
    /// Move to the previous business day.
    Preceding,
    /// Do not adjust the date.
    Unadjusted,
}

impl BusinessDayConvention {
    /// Returns a short code for this convention.
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            BusinessDayConvention::Following => "F",
            BusinessDayConvention::ModifiedFollowing => "MF",
            BusinessDayConvention::Preceding => "P",
            BusinessDayConvention::Unadjusted => "U",
        }
    }

    /// Adjusts a date onto a business day.
    pub fn adjust(&self, date: Date) -> Result<Date, DateError> {
        match self {
            BusinessDayConvention::Unadjusted => Ok(date),
            BusinessDayConvention::Following => roll(date, 1),
            BusinessDayConvention::Preceding => roll(date, -1),
            BusinessDayConvention::ModifiedFollowing => {
                let following = roll(date, 1)?;
                if following.month() != date.month() {
                    roll(date, -1)
                } else {
                    Ok(following)
                }
            }
        }
    }
}

fn roll(date: Date, step: i64) -> Result<Date, DateError> {
    let mut current = date;
    while !current.is_business_day() {
        current = current.add_days(step)?;
    }
    Ok(current)
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for BusinessDayConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "following" | "f" => Ok(BusinessDayConvention::Following),
            "modifiedfollowing" | "mf" => Ok(BusinessDayConvention::ModifiedFollowing),
            "preceding" | "p" => Ok(BusinessDayConvention::Preceding),
            "unadjusted" | "u" | "none" => Ok(BusinessDayConvention::Unadjusted),
            _ => Err(format!("Unknown business day convention: {}", s)),
        }
    }
}

/// Model time between two dates (Act/365 Fixed).
///
/// Negative when `end` precedes `start`.
///
/// ```
/// use pricer_core::types::time::{time_between, Date};
///
/// let t0 = Date::from_ymd(2011, 7, 7).unwrap();
/// let t1 = Date::from_ymd(2012, 7, 6).unwrap();
/// assert!((time_between(t0, t1) - 365.0 / 365.0).abs() < 1e-12);
/// ```
pub fn time_between(start: Date, end: Date) -> f64 {
    DayCountConvention::Actual365Fixed.year_fraction(start, end)
}
