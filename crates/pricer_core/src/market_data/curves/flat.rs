//! Flat yield curve implementation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Curve with a single continuously compounded rate for all maturities.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{FlatCurve, YieldCurve};
///
/// let funding = FlatCurve::new(0.05_f64);
/// assert_eq!(funding.rate(), 0.05);
/// assert_eq!(funding.discount_factor(0.0).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCurve<T: Float> {
    rate: T,
}

impl<T: Float> FlatCurve<T> {
    /// Creates a flat curve. Negative rates are allowed.
    #[inline]
    pub fn new(rate: T) -> Self {
        Self { rate }
    }

    /// The curve rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// The same curve with every rate moved by `shift`.
    #[inline]
    pub fn shifted(&self, shift: T) -> Self {
        Self::new(self.rate + shift)
    }
}

impl<T: Float> YieldCurve<T> for FlatCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok((-self.rate * t).exp())
    }

    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(self.rate)
    }

    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        if t2 <= t1 {
            return Err(MarketDataError::InvalidMaturity {
                t: (t2 - t1).to_f64().unwrap_or(0.0),
            });
        }
        Ok(self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_discount_factor() {
        let curve = FlatCurve::new(0.05_f64);
        assert_relative_eq!(curve.discount_factor(10.0).unwrap(), (-0.5_f64).exp());
        assert!(curve.discount_factor(-0.1).is_err());
    }

    #[test]
    fn test_zero_rate_defined_at_origin() {
        let curve = FlatCurve::new(0.04_f64);
        assert_eq!(curve.zero_rate(0.0).unwrap(), 0.04);
    }

    #[test]
    fn test_shifted() {
        let curve = FlatCurve::new(0.04_f64).shifted(1e-4);
        assert_relative_eq!(curve.rate(), 0.0401, epsilon = 1e-15);
    }
}
