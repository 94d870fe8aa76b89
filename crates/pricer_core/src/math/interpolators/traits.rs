//! One-dimensional interpolator trait.

use crate::types::InterpolationError;
use num_traits::Float;

/// A one-dimensional interpolation rule over sorted nodes.
pub trait Interpolator<T: Float> {
    /// Interpolated value at `x`.
    fn interpolate(&self, x: T) -> Result<T, InterpolationError>;

    /// First and last node abscissa.
    fn domain(&self) -> (T, T);
}
