//! Fixed and ibor coupons with times resolved against the reference date.

use pricer_core::market_data::{YieldCurve, YieldCurveBundle};
use pricer_core::types::{Currency, PricingError};

/// A fixed rate coupon.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponFixed {
    currency: Currency,
    payment_time: f64,
    funding_curve: String,
    accrual_factor: f64,
    notional: f64,
    fixed_rate: f64,
}

impl CouponFixed {
    /// Creates a fixed coupon. A negative notional pays the coupon.
    pub fn new(
        currency: Currency,
        payment_time: f64,
        funding_curve: impl Into<String>,
        accrual_factor: f64,
        notional: f64,
        fixed_rate: f64,
    ) -> Self {
        Self {
            currency,
            payment_time,
            funding_curve: funding_curve.into(),
            accrual_factor,
            notional,
            fixed_rate,
        }
    }

    /// Payment currency.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Payment time.
    #[inline]
    pub fn payment_time(&self) -> f64 {
        self.payment_time
    }

    /// Discounting curve name.
    #[inline]
    pub fn funding_curve(&self) -> &str {
        &self.funding_curve
    }

    /// Accrual factor.
    #[inline]
    pub fn accrual_factor(&self) -> f64 {
        self.accrual_factor
    }

    /// Signed notional.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Coupon rate.
    #[inline]
    pub fn fixed_rate(&self) -> f64 {
        self.fixed_rate
    }

    /// Paid amount N·δ·K.
    #[inline]
    pub fn amount(&self) -> f64 {
        self.notional * self.accrual_factor * self.fixed_rate
    }

    /// The same coupon with another rate.
    pub fn with_rate(&self, fixed_rate: f64) -> Self {
        Self {
            fixed_rate,
            ..self.clone()
        }
    }

    /// The same coupon with the notional scaled by `factor`.
    pub fn with_scaled_notional(&self, factor: f64) -> Self {
        Self {
            notional: self.notional * factor,
            ..self.clone()
        }
    }
}

/// Fixing details of an ibor coupon.
#[derive(Debug, Clone, PartialEq)]
pub struct IborFixing {
    /// Fixing time.
    pub fixing_time: f64,
    /// Start of the forward rate period.
    pub start_time: f64,
    /// End of the forward rate period.
    pub end_time: f64,
    /// Accrual factor of the forward rate period.
    pub accrual_factor: f64,
    /// Forward projection curve name.
    pub forward_curve: String,
}

/// A floating coupon paying the ibor forward plus a spread.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponIbor {
    currency: Currency,
    payment_time: f64,
    funding_curve: String,
    accrual_factor: f64,
    notional: f64,
    fixing: IborFixing,
    spread: f64,
}

impl CouponIbor {
    /// Creates an ibor coupon. A negative notional pays the coupon.
    pub fn new(
        currency: Currency,
        payment_time: f64,
        funding_curve: impl Into<String>,
        accrual_factor: f64,
        notional: f64,
        fixing: IborFixing,
        spread: f64,
    ) -> Self {
        Self {
            currency,
            payment_time,
            funding_curve: funding_curve.into(),
            accrual_factor,
            notional,
            fixing,
            spread,
        }
    }

    /// Payment currency.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Payment time.
    #[inline]
    pub fn payment_time(&self) -> f64 {
        self.payment_time
    }

    /// Discounting curve name.
    #[inline]
    pub fn funding_curve(&self) -> &str {
        &self.funding_curve
    }

    /// Payment accrual factor.
    #[inline]
    pub fn accrual_factor(&self) -> f64 {
        self.accrual_factor
    }

    /// Signed notional.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Fixing details.
    #[inline]
    pub fn fixing(&self) -> &IborFixing {
        &self.fixing
    }

    /// Spread over the ibor rate.
    #[inline]
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// The same coupon with the notional scaled by `factor`.
    pub fn with_scaled_notional(&self, factor: f64) -> Self {
        Self {
            notional: self.notional * factor,
            ..self.clone()
        }
    }

    /// Simply compounded forward rate on the fixing period, and the ratio
    /// P_fwd(start)/P_fwd(end) it is built from.
    pub fn forward_rate(&self, curves: &YieldCurveBundle) -> Result<(f64, f64), PricingError> {
        let curve = curves.curve(&self.fixing.forward_curve)?;
        let ratio = curve.discount_factor(self.fixing.start_time)?
            / curve.discount_factor(self.fixing.end_time)?;
        Ok(((ratio - 1.0) / self.fixing.accrual_factor, ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::CurveEnum;

    #[test]
    fn test_fixed_amount_and_rate_change() {
        let c = CouponFixed::new(Currency::EUR, 5.5, "Funding", 0.5, -1e8, 0.0325);
        assert_relative_eq!(c.amount(), -1_625_000.0, epsilon = 1e-6);
        assert_eq!(c.with_rate(0.04).fixed_rate(), 0.04);
        assert_eq!(c.with_scaled_notional(2.0).notional(), -2e8);
    }

    #[test]
    fn test_forward_rate_flat_curve() {
        let curves = YieldCurveBundle::new().with_curve("Forward", CurveEnum::flat(0.04));
        let fixing = IborFixing {
            fixing_time: 4.99,
            start_time: 5.0,
            end_time: 5.25,
            accrual_factor: 0.25,
            forward_curve: "Forward".to_string(),
        };
        let c = CouponIbor::new(Currency::EUR, 5.25, "Funding", 0.25, 1e8, fixing, 0.0);
        let (forward, ratio) = c.forward_rate(&curves).unwrap();
        assert_relative_eq!(ratio, (0.04_f64 * 0.25).exp(), epsilon = 1e-14);
        assert_relative_eq!(forward, ((0.01_f64).exp() - 1.0) / 0.25, epsilon = 1e-14);
    }
}
