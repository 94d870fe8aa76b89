//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Discount curve addressed by model time.
///
/// Implementations are generic over `T: Float`; the pricing layer works
/// in `f64`.
///
/// # Contract
///
/// - `discount_factor(t)` returns P(0, t), with P(0, 0) = 1
/// - `zero_rate(t)` returns the continuously compounded rate r(t), P = exp(-r t)
/// - `forward_rate(t1, t2)` returns the continuously compounded forward
///
/// Curve sensitivities throughout the workspace are expressed against
/// `zero_rate` at the sensitivity time: dP(t)/dr(t) = -t P(t).
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - (-0.05_f64).exp()).abs() < 1e-14);
/// assert!((curve.forward_rate(1.0, 2.0).unwrap() - 0.05).abs() < 1e-12);
/// ```
pub trait YieldCurve<T: Float> {
    /// Discount factor for maturity `t`.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` if `t < 0`.
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Continuously compounded zero rate for maturity `t > 0`.
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        let df = self.discount_factor(t)?;
        Ok(-df.ln() / t)
    }

    /// Continuously compounded forward rate between `t1` and `t2`.
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        let dt = t2 - t1;
        if dt <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: dt.to_f64().unwrap_or(0.0),
            });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok(-(df2 / df1).ln() / dt)
    }
}
