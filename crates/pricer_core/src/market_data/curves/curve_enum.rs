//! Static dispatch over the concrete curve implementations.

use super::{FlatCurve, InterpolatedCurve, YieldCurve};
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Node times closer than this are treated as the same node.
const NODE_TIME_TOLERANCE: f64 = 1e-10;

/// Curve held in a [`YieldCurveBundle`](super::YieldCurveBundle).
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{CurveEnum, YieldCurve};
///
/// let curve = CurveEnum::flat(0.05_f64);
/// let nodes = curve.with_nodes(&[1.0, 2.0, 5.0]).unwrap();
/// let bumped = nodes.with_single_shift(2.0, 1e-4).unwrap();
/// assert!((bumped.zero_rate(2.0).unwrap() - 0.0501).abs() < 1e-14);
/// assert!((bumped.zero_rate(5.0).unwrap() - 0.05).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub enum CurveEnum<T: Float> {
    /// Constant rate curve
    Flat(FlatCurve<T>),
    /// Node-based zero-rate curve
    Interpolated(InterpolatedCurve<T>),
}

impl<T: Float> CurveEnum<T> {
    /// A flat curve at `rate`.
    #[inline]
    pub fn flat(rate: T) -> Self {
        CurveEnum::Flat(FlatCurve::new(rate))
    }

    /// Resamples the curve onto explicit nodes so that single-node bumps are possible.
    pub fn with_nodes(&self, times: &[T]) -> Result<Self, MarketDataError> {
        Ok(CurveEnum::Interpolated(InterpolatedCurve::sampled(
            self, times,
        )?))
    }

    /// Zero-rate bump localised at time `t`.
    ///
    /// On an interpolated curve the node at `t` is moved; when `t` is not a
    /// node a new node carrying the bumped rate is inserted. A flat curve has
    /// no nodes: resample it with [`CurveEnum::with_nodes`] first.
    pub fn with_single_shift(&self, t: T, shift: T) -> Result<Self, MarketDataError> {
        match self {
            CurveEnum::Flat(_) => Err(MarketDataError::UnsupportedBump(
                "flat curve has no nodes to shift".to_string(),
            )),
            CurveEnum::Interpolated(curve) => {
                let tolerance = T::from(NODE_TIME_TOLERANCE).unwrap_or_else(T::epsilon);
                if let Some(index) = curve
                    .times()
                    .iter()
                    .position(|&node| (node - t).abs() < tolerance)
                {
                    return Ok(CurveEnum::Interpolated(curve.with_node_shift(index, shift)?));
                }
                let mut times = curve.times().to_vec();
                let mut rates = curve.rates().to_vec();
                let position = times.partition_point(|&node| node < t);
                times.insert(position, t);
                rates.insert(position, curve.zero_rate(t)? + shift);
                Ok(CurveEnum::Interpolated(InterpolatedCurve::new(&times, &rates)?))
            }
        }
    }

    /// The curve with every zero rate moved by `shift`.
    pub fn with_parallel_shift(&self, shift: T) -> Result<Self, MarketDataError> {
        match self {
            CurveEnum::Flat(curve) => Ok(CurveEnum::Flat(curve.shifted(shift))),
            CurveEnum::Interpolated(curve) => {
                Ok(CurveEnum::Interpolated(curve.with_parallel_shift(shift)?))
            }
        }
    }
}

impl<T: Float> YieldCurve<T> for CurveEnum<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        match self {
            CurveEnum::Flat(curve) => curve.discount_factor(t),
            CurveEnum::Interpolated(curve) => curve.discount_factor(t),
        }
    }

    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        match self {
            CurveEnum::Flat(curve) => curve.zero_rate(t),
            CurveEnum::Interpolated(curve) => curve.zero_rate(t),
        }
    }

    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        match self {
            CurveEnum::Flat(curve) => curve.forward_rate(t1, t2),
            CurveEnum::Interpolated(curve) => curve.forward_rate(t1, t2),
        }
    }
}

impl<T: Float> From<FlatCurve<T>> for CurveEnum<T> {
    fn from(curve: FlatCurve<T>) -> Self {
        CurveEnum::Flat(curve)
    }
}

impl<T: Float> From<InterpolatedCurve<T>> for CurveEnum<T> {
    fn from(curve: InterpolatedCurve<T>) -> Self {
        CurveEnum::Interpolated(curve)
    }
}
