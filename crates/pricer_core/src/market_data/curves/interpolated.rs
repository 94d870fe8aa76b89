//! Interpolated yield curve implementation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use crate::math::interpolators::{Interpolator, LinearInterpolator};
use num_traits::Float;

/// Zero-rate curve, linear in rate between nodes and flat outside them.
///
/// Node bumps (`with_node_shift`) are what curve-node sensitivities are
/// measured against.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{InterpolatedCurve, YieldCurve};
///
/// let curve = InterpolatedCurve::new(&[1.0_f64, 5.0, 10.0], &[0.02, 0.03, 0.035]).unwrap();
/// assert!((curve.zero_rate(3.0).unwrap() - 0.025).abs() < 1e-12);
/// assert!((curve.zero_rate(20.0).unwrap() - 0.035).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedCurve<T: Float> {
    interpolator: LinearInterpolator<T>,
}

impl<T: Float> InterpolatedCurve<T> {
    /// Builds a curve from node times and continuously compounded zero rates.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` if no node is given or lengths differ
    /// - `InvalidMaturity` if a node time is negative
    /// - `Interpolation` if node times repeat
    pub fn new(times: &[T], rates: &[T]) -> Result<Self, MarketDataError> {
        if times.is_empty() || times.len() != rates.len() {
            return Err(MarketDataError::InsufficientData {
                got: rates.len(),
                need: times.len().max(1),
            });
        }
        if let Some(&t) = times.iter().find(|&&t| t < T::zero()) {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        let interpolator = LinearInterpolator::flat_extrapolated(times, rates)?;
        Ok(Self { interpolator })
    }

    /// Samples another curve's zero rates at the given times.
    pub fn sampled<C: YieldCurve<T>>(curve: &C, times: &[T]) -> Result<Self, MarketDataError> {
        let rates = times
            .iter()
            .map(|&t| sampled_rate(curve, t))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(times, &rates)
    }

    /// Node times.
    #[inline]
    pub fn times(&self) -> &[T] {
        self.interpolator.xs()
    }

    /// Node zero rates.
    #[inline]
    pub fn rates(&self) -> &[T] {
        self.interpolator.ys()
    }

    /// The same curve with the rate at node `index` moved by `shift`.
    pub fn with_node_shift(&self, index: usize, shift: T) -> Result<Self, MarketDataError> {
        if index >= self.times().len() {
            return Err(MarketDataError::UnsupportedBump(format!(
                "node {} out of range for {} nodes",
                index,
                self.times().len()
            )));
        }
        let mut rates = self.rates().to_vec();
        rates[index] = rates[index] + shift;
        Self::new(self.times(), &rates)
    }

    /// The same curve with every node rate moved by `shift`.
    pub fn with_parallel_shift(&self, shift: T) -> Result<Self, MarketDataError> {
        let rates: Vec<T> = self.rates().iter().map(|&r| r + shift).collect();
        Self::new(self.times(), &rates)
    }

    /// Linear weights of the node rates entering `zero_rate(t)`.
    pub fn node_weights(&self, t: T) -> Result<Vec<(usize, T)>, MarketDataError> {
        Ok(self.interpolator.weights(t)?)
    }
}

/// Zero rate with the short end taken from a small positive time.
fn sampled_rate<T: Float, C: YieldCurve<T>>(curve: &C, t: T) -> Result<T, MarketDataError> {
    let floor = T::from(1e-6).unwrap_or_else(T::epsilon);
    curve.zero_rate(t.max(floor))
}

impl<T: Float> YieldCurve<T> for InterpolatedCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        if t == T::zero() {
            return Ok(T::one());
        }
        let rate = self.interpolator.interpolate(t)?;
        Ok((-rate * t).exp())
    }

    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(self.interpolator.interpolate(t)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::curves::FlatCurve;
    use approx::assert_relative_eq;

    fn curve() -> InterpolatedCurve<f64> {
        InterpolatedCurve::new(&[0.5, 1.0, 2.0, 5.0], &[0.01, 0.015, 0.02, 0.03]).unwrap()
    }

    #[test]
    fn test_discount_factor_uses_interpolated_rate() {
        let c = curve();
        let df = c.discount_factor(1.5).unwrap();
        assert_relative_eq!(df, (-0.0175_f64 * 1.5).exp(), epsilon = 1e-15);
        assert_eq!(c.discount_factor(0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_empty_rejected() {
        let empty: [f64; 0] = [];
        assert!(InterpolatedCurve::new(&empty, &empty).is_err());
    }

    #[test]
    fn test_negative_node_rejected() {
        assert!(matches!(
            InterpolatedCurve::new(&[-1.0_f64, 1.0], &[0.01, 0.02]),
            Err(MarketDataError::InvalidMaturity { .. })
        ));
    }

    #[test]
    fn test_node_shift_is_local() {
        let c = curve();
        let bumped = c.with_node_shift(2, 1e-4).unwrap();
        assert_relative_eq!(bumped.zero_rate(2.0).unwrap(), 0.0201, epsilon = 1e-15);
        assert_relative_eq!(bumped.zero_rate(1.0).unwrap(), 0.015, epsilon = 1e-15);
        assert_relative_eq!(bumped.zero_rate(5.0).unwrap(), 0.03, epsilon = 1e-15);
        assert!(c.with_node_shift(9, 1e-4).is_err());
    }

    #[test]
    fn test_sampled_flat_curve_is_flat() {
        let flat = FlatCurve::new(0.04_f64);
        let sampled = InterpolatedCurve::sampled(&flat, &[0.0, 1.0, 7.5]).unwrap();
        for t in [0.3, 1.0, 4.0, 12.0] {
            assert_relative_eq!(
                sampled.discount_factor(t).unwrap(),
                flat.discount_factor(t).unwrap(),
                epsilon = 1e-14
            );
        }
    }
}
