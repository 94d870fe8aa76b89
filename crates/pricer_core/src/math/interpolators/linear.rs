//! Linear interpolation with optional flat extrapolation.

use super::Interpolator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear interpolator.
///
/// Nodes are sorted on construction. With flat extrapolation enabled the
/// first and last values are held outside the node range, and a single
/// node is accepted (a constant function).
///
/// # Example
///
/// ```
/// use pricer_core::math::interpolators::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(&[1.0_f64, 2.0], &[0.02, 0.04]).unwrap();
/// assert!((interp.interpolate(1.5).unwrap() - 0.03).abs() < 1e-15);
/// assert!(interp.interpolate(3.0).is_err());
///
/// let flat = LinearInterpolator::flat_extrapolated(&[1.0_f64, 2.0], &[0.02, 0.04]).unwrap();
/// assert_eq!(flat.interpolate(3.0).unwrap(), 0.04);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator<T: Float> {
    xs: Vec<T>,
    ys: Vec<T>,
    flat_extrapolation: bool,
}

impl<T: Float> LinearInterpolator<T> {
    /// Creates an interpolator that rejects queries outside the node range.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if lengths differ or two nodes coincide
    /// - `InsufficientData` with fewer than two nodes
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        Self::build(xs, ys, false, 2)
    }

    /// Creates an interpolator holding the boundary values outside the node range.
    pub fn flat_extrapolated(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        Self::build(xs, ys, true, 1)
    }

    fn build(
        xs: &[T],
        ys: &[T],
        flat_extrapolation: bool,
        need: usize,
    ) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "xs and ys must have same length: got {} and {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < need {
            return Err(InterpolationError::InsufficientData {
                got: xs.len(),
                need,
            });
        }

        let mut pairs: Vec<(T, T)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        if let Some(index) = pairs.windows(2).position(|w| w[1].0 <= w[0].0) {
            return Err(InterpolationError::NonMonotonicData { index: index + 1 });
        }
        let (xs, ys): (Vec<T>, Vec<T>) = pairs.into_iter().unzip();

        Ok(Self {
            xs,
            ys,
            flat_extrapolation,
        })
    }

    /// Node abscissas.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Node values.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Interpolation weights: the value at `x` is `Σ w_i ys[i]`.
    ///
    /// At most two weights are non-zero. Used to project point
    /// sensitivities onto nodes.
    pub fn weights(&self, x: T) -> Result<Vec<(usize, T)>, InterpolationError> {
        let n = self.xs.len();
        let (x_min, x_max) = self.domain();
        if x < x_min || x > x_max {
            if !self.flat_extrapolation {
                return Err(self.out_of_bounds(x));
            }
            let index = if x < x_min { 0 } else { n - 1 };
            return Ok(vec![(index, T::one())]);
        }
        if n == 1 {
            return Ok(vec![(0, T::one())]);
        }
        let i = self.find_segment(x);
        let u = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        Ok(vec![(i, T::one() - u), (i + 1, u)])
    }

    #[inline]
    fn find_segment(&self, x: T) -> usize {
        let pos = self.xs.partition_point(|&xi| xi <= x);
        if pos == 0 {
            0
        } else if pos >= self.xs.len() {
            self.xs.len() - 2
        } else {
            pos - 1
        }
    }

    fn out_of_bounds(&self, x: T) -> InterpolationError {
        let (x_min, x_max) = self.domain();
        InterpolationError::OutOfBounds {
            x: x.to_f64().unwrap_or(f64::NAN),
            min: x_min.to_f64().unwrap_or(f64::NAN),
            max: x_max.to_f64().unwrap_or(f64::NAN),
        }
    }
}

impl<T: Float> Interpolator<T> for LinearInterpolator<T> {
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        Ok(self
            .weights(x)?
            .into_iter()
            .fold(T::zero(), |acc, (i, w)| acc + w * self.ys[i]))
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
