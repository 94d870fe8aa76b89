//! Conversion of dated swap and swaption terms into time-indexed instruments.
//!
//! Model times are ACT/365F year fractions from the reference date. The
//! calendar is Monday–Friday; fixings are `spot_lag` business days before
//! each ibor period start.

use pricer_core::types::time::{
    time_between, BusinessDayConvention, Date, DayCountConvention, Tenor,
};
use pricer_core::types::Currency;

use super::coupon::{CouponFixed, CouponIbor, IborFixing};
use super::swap::FixedIborSwap;
use super::swaption::{SwaptionBermudan, SwaptionCash, SwaptionPhysical};
use crate::instruments::InstrumentError;
use crate::schedules::{Period, ScheduleBuilder};

/// Conventions of a fixed/ibor swap market.
///
/// # Example
///
/// ```
/// use pricer_models::instruments::rates::SwapGenerator;
/// use pricer_core::types::time::{Date, Tenor};
///
/// let generator = SwapGenerator::eur("Funding", "Forward");
/// let reference = Date::from_ymd(2011, 7, 7).unwrap();
/// let expiry = Date::from_ymd(2016, 7, 7).unwrap();
/// let swaption = generator
///     .swaption_physical(reference, expiry, Tenor::from_years(5), 1e8, 0.0325, true, true)
///     .unwrap();
/// assert_eq!(swaption.underlying().fixed_leg().len(), 10);
/// assert_eq!(swaption.underlying().ibor_leg().len(), 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SwapGenerator {
    currency: Currency,
    funding_curve: String,
    forward_curve: String,
    fixed_tenor: Tenor,
    fixed_day_count: DayCountConvention,
    ibor_tenor: Tenor,
    ibor_day_count: DayCountConvention,
    spot_lag: i32,
    convention: BusinessDayConvention,
}

impl SwapGenerator {
    /// EUR swaps: fixed 6M 30/360 against Euribor 3M ACT/360, spot lag 2,
    /// modified following.
    pub fn eur(funding_curve: impl Into<String>, forward_curve: impl Into<String>) -> Self {
        Self {
            currency: Currency::EUR,
            funding_curve: funding_curve.into(),
            forward_curve: forward_curve.into(),
            fixed_tenor: Tenor::from_months(6),
            fixed_day_count: DayCountConvention::Thirty360,
            ibor_tenor: Tenor::from_months(3),
            ibor_day_count: DayCountConvention::Actual360,
            spot_lag: Currency::EUR.spot_lag(),
            convention: BusinessDayConvention::ModifiedFollowing,
        }
    }

    /// Sets the currency and its spot lag.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self.spot_lag = currency.spot_lag();
        self
    }

    /// Sets the fixed leg period and day count.
    pub fn with_fixed_leg(mut self, tenor: Tenor, day_count: DayCountConvention) -> Self {
        self.fixed_tenor = tenor;
        self.fixed_day_count = day_count;
        self
    }

    /// Sets the ibor leg period and day count.
    pub fn with_ibor_leg(mut self, tenor: Tenor, day_count: DayCountConvention) -> Self {
        self.ibor_tenor = tenor;
        self.ibor_day_count = day_count;
        self
    }

    /// Currency of generated instruments.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Settlement date of a trade or exercise on `date`.
    pub fn settlement_date(&self, date: Date) -> Result<Date, InstrumentError> {
        Ok(date.add_business_days(self.spot_lag)?)
    }

    /// Swap starting on `start` for `tenor`.
    ///
    /// # Errors
    ///
    /// `InvalidNotional` for a non-positive notional; schedule errors otherwise.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &self,
        reference_date: Date,
        start: Date,
        tenor: Tenor,
        notional: f64,
        fixed_rate: f64,
        is_payer: bool,
    ) -> Result<FixedIborSwap, InstrumentError> {
        let end = start.add_months(tenor.months() as i32)?;
        let fixed_periods = ScheduleBuilder::new()
            .start(start)
            .end(end)
            .tenor(self.fixed_tenor)
            .day_count(self.fixed_day_count)
            .business_day_convention(self.convention)
            .build()?;
        let notionals = vec![notional; fixed_periods.len()];
        self.amortising_swap(reference_date, start, tenor, &notionals, fixed_rate, is_payer)
    }

    /// Swap whose notional changes every fixed period. Each ibor coupon
    /// uses the notional of the fixed period it pays in.
    ///
    /// # Errors
    ///
    /// `InvalidNotional` if a notional is non-positive, `InvalidParameter`
    /// if the notional count differs from the fixed period count.
    pub fn amortising_swap(
        &self,
        reference_date: Date,
        start: Date,
        tenor: Tenor,
        notionals: &[f64],
        fixed_rate: f64,
        is_payer: bool,
    ) -> Result<FixedIborSwap, InstrumentError> {
        if let Some(&bad) = notionals.iter().find(|&&n| !(n > 0.0)) {
            return Err(InstrumentError::InvalidNotional { notional: bad });
        }
        let end = start.add_months(tenor.months() as i32)?;
        let fixed_schedule = ScheduleBuilder::new()
            .start(start)
            .end(end)
            .tenor(self.fixed_tenor)
            .day_count(self.fixed_day_count)
            .business_day_convention(self.convention)
            .build()?;
        let ibor_schedule = ScheduleBuilder::new()
            .start(start)
            .end(end)
            .tenor(self.ibor_tenor)
            .day_count(self.ibor_day_count)
            .business_day_convention(self.convention)
            .build()?;
        if notionals.len() != fixed_schedule.len() {
            return Err(InstrumentError::InvalidParameter {
                message: format!(
                    "{} notionals for {} fixed periods",
                    notionals.len(),
                    fixed_schedule.len()
                ),
            });
        }

        let fixed_sign = if is_payer { -1.0 } else { 1.0 };
        let fixed_leg = fixed_schedule
            .iter()
            .zip(notionals)
            .map(|(period, &n)| {
                CouponFixed::new(
                    self.currency,
                    time_between(reference_date, period.payment()),
                    self.funding_curve.clone(),
                    period.year_fraction(),
                    fixed_sign * n,
                    fixed_rate,
                )
            })
            .collect();

        let fixed_periods = fixed_schedule.periods();
        let mut ibor_leg = Vec::with_capacity(ibor_schedule.len());
        for period in ibor_schedule.iter() {
            let index = fixed_periods
                .iter()
                .position(|p| period.payment() <= p.payment())
                .unwrap_or(fixed_periods.len() - 1);
            ibor_leg.push(self.ibor_coupon(reference_date, period, -fixed_sign * notionals[index])?);
        }
        FixedIborSwap::new(time_between(reference_date, start), fixed_leg, ibor_leg)
    }

    fn ibor_coupon(
        &self,
        reference_date: Date,
        period: &Period,
        notional: f64,
    ) -> Result<CouponIbor, InstrumentError> {
        let fixing_date = period.start().add_business_days(-self.spot_lag)?;
        let fixing = IborFixing {
            fixing_time: time_between(reference_date, fixing_date),
            start_time: time_between(reference_date, period.start()),
            end_time: time_between(reference_date, period.end()),
            accrual_factor: period.year_fraction(),
            forward_curve: self.forward_curve.clone(),
        };
        Ok(CouponIbor::new(
            self.currency,
            time_between(reference_date, period.payment()),
            self.funding_curve.clone(),
            period.year_fraction(),
            notional,
            fixing,
            0.0,
        ))
    }

    /// Expiry time of `expiry` adjusted to a business day, with the spot
    /// date the exercised swap starts on.
    fn exercise(&self, reference_date: Date, expiry: Date) -> Result<(f64, Date), InstrumentError> {
        let adjusted = self.convention.adjust(expiry)?;
        let t = time_between(reference_date, adjusted);
        if t < 0.0 {
            return Err(InstrumentError::InvalidExpiry { expiry: t });
        }
        Ok((t, self.settlement_date(adjusted)?))
    }

    /// European swaption with physical delivery into a swap starting at
    /// the spot date of `expiry`.
    #[allow(clippy::too_many_arguments)]
    pub fn swaption_physical(
        &self,
        reference_date: Date,
        expiry: Date,
        tenor: Tenor,
        notional: f64,
        strike: f64,
        is_payer: bool,
        is_long: bool,
    ) -> Result<SwaptionPhysical, InstrumentError> {
        let (expiry_time, start) = self.exercise(reference_date, expiry)?;
        let swap = self.swap(reference_date, start, tenor, notional, strike, is_payer)?;
        Ok(SwaptionPhysical::new(expiry_time, swap, is_long)?.with_reference_date(reference_date))
    }

    /// European swaption settled in cash at the spot date of `expiry`.
    #[allow(clippy::too_many_arguments)]
    pub fn swaption_cash(
        &self,
        reference_date: Date,
        expiry: Date,
        tenor: Tenor,
        notional: f64,
        strike: f64,
        is_payer: bool,
        is_long: bool,
    ) -> Result<SwaptionCash, InstrumentError> {
        let (expiry_time, start) = self.exercise(reference_date, expiry)?;
        let swap = self.swap(reference_date, start, tenor, notional, strike, is_payer)?;
        Ok(SwaptionCash::new(expiry_time, swap, is_long)?.with_reference_date(reference_date))
    }

    /// Bermudan swaption exercisable on each of `expiries` into the part
    /// of one swap (starting at the first spot date, lasting `tenor`) that
    /// accrues from the exercise spot date. Expiries are adjusted with the
    /// business day convention.
    #[allow(clippy::too_many_arguments)]
    pub fn swaption_bermudan(
        &self,
        reference_date: Date,
        expiries: &[Date],
        tenor: Tenor,
        notional: f64,
        strike: f64,
        is_payer: bool,
        is_long: bool,
    ) -> Result<SwaptionBermudan, InstrumentError> {
        let first = expiries.first().ok_or(InstrumentError::InvalidParameter {
            message: "no exercise date".to_string(),
        })?;
        let (_, start) = self.exercise(reference_date, *first)?;
        let full = self.swap(reference_date, start, tenor, notional, strike, is_payer)?;
        let mut expiry_times = Vec::with_capacity(expiries.len());
        let mut underlyings = Vec::with_capacity(expiries.len());
        for &expiry in expiries {
            let (expiry_time, settlement) = self.exercise(reference_date, expiry)?;
            expiry_times.push(expiry_time);
            underlyings.push(full.trimmed_before(time_between(reference_date, settlement))?);
        }
        Ok(SwaptionBermudan::new(expiry_times, underlyings, is_long)?
            .with_reference_date(reference_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_swaption_times() {
        let generator = SwapGenerator::eur("Funding", "Forward");
        let reference = date(2011, 7, 7);
        let s = generator
            .swaption_physical(reference, date(2016, 7, 7), Tenor::from_years(5), 1e8, 0.0325, true, true)
            .unwrap();
        assert_relative_eq!(s.expiry_time(), 1827.0 / 365.0, epsilon = 1e-12);
        assert_relative_eq!(s.settlement_time(), 1831.0 / 365.0, epsilon = 1e-12);
        let swap = s.underlying();
        assert!(swap.is_payer());
        assert_relative_eq!(swap.fixed_leg()[0].accrual_factor(), 0.5, epsilon = 1e-12);
        let first_ibor = &swap.ibor_leg()[0];
        assert_relative_eq!(first_ibor.fixing().fixing_time, s.expiry_time(), epsilon = 1e-12);
        assert!(first_ibor.notional() > 0.0);
        assert_eq!(s.reference_date(), Some(reference));
    }

    #[test]
    fn test_amortising_notionals_follow_fixed_periods() {
        let generator = SwapGenerator::eur("Funding", "Forward");
        let notionals = [4.0, 3.0, 2.0, 1.0];
        let swap = generator
            .amortising_swap(date(2011, 7, 7), date(2011, 7, 11), Tenor::from_years(2), &notionals, 0.03, false)
            .unwrap();
        let fixed: Vec<f64> = swap.fixed_leg().iter().map(|c| c.notional()).collect();
        assert_eq!(fixed, notionals.to_vec());
        let ibor: Vec<f64> = swap.ibor_leg().iter().map(|c| c.notional()).collect();
        assert_eq!(ibor, vec![-4.0, -4.0, -3.0, -3.0, -2.0, -2.0, -1.0, -1.0]);
        assert!(generator
            .amortising_swap(date(2011, 7, 7), date(2011, 7, 11), Tenor::from_years(2), &[1.0], 0.03, false)
            .is_err());
    }

    #[test]
    fn test_bermudan_underlyings_shrink() {
        let generator = SwapGenerator::eur("Funding", "Forward");
        let expiries: Vec<Date> = (0..5).map(|i| date(2016 + i, 7, 7)).collect();
        let berm = generator
            .swaption_bermudan(date(2011, 7, 7), &expiries, Tenor::from_years(5), 1e8, 0.0325, true, true)
            .unwrap();
        let lengths: Vec<usize> = berm.underlyings().iter().map(|s| s.fixed_leg().len()).collect();
        assert_eq!(lengths, vec![10, 8, 6, 4, 2]);
        let last = &berm.underlyings()[4];
        assert_eq!(last.ibor_leg().len(), 4);
    }

    #[test]
    fn test_bermudan_coupons_accrue_after_exercise() {
        let generator = SwapGenerator::eur("Funding", "Forward");
        let reference = date(2011, 7, 7);
        let expiries: Vec<Date> = (1..10).map(|i| date(2011 + i, 7, 7)).collect();
        let berm = generator
            .swaption_bermudan(reference, &expiries, Tenor::from_years(9), 1e8, 0.0325, true, true)
            .unwrap();
        // 2013-07-07 is a Sunday.
        assert_relative_eq!(
            berm.expiry_times()[1],
            time_between(reference, date(2013, 7, 8)),
            epsilon = 1e-12
        );
        for (k, (&expiry, swap)) in berm.expiry_times().iter().zip(berm.underlyings()).enumerate() {
            let settlement = swap.settlement_time();
            assert!(settlement > expiry, "exercise {k}");
            for i in 0..swap.fixed_leg().len() {
                assert!(swap.fixed_accrual_start(i) >= settlement - 1e-12, "exercise {k}");
            }
            for coupon in swap.ibor_leg() {
                assert!(coupon.fixing().start_time >= settlement - 1e-12, "exercise {k}");
                assert!(coupon.fixing().fixing_time >= expiry - 1e-12, "exercise {k}");
            }
        }
    }

    #[test]
    fn test_weekend_expiry_is_adjusted() {
        let generator = SwapGenerator::eur("Funding", "Forward");
        let reference = date(2011, 7, 7);
        let s = generator
            .swaption_physical(reference, date(2013, 7, 7), Tenor::from_years(2), 1e8, 0.0325, true, true)
            .unwrap();
        assert_relative_eq!(s.expiry_time(), time_between(reference, date(2013, 7, 8)), epsilon = 1e-12);
        assert_relative_eq!(s.settlement_time(), time_between(reference, date(2013, 7, 10)), epsilon = 1e-12);
        assert!(s.underlying().ibor_leg()[0].fixing().fixing_time >= s.expiry_time());
    }

    #[test]
    fn test_invalid_notional() {
        let generator = SwapGenerator::eur("Funding", "Forward");
        let err = generator
            .swap(date(2011, 7, 7), date(2011, 7, 11), Tenor::from_years(1), -1.0, 0.03, true)
            .unwrap_err();
        assert_eq!(err, InstrumentError::InvalidNotional { notional: -1.0 });
    }
}
