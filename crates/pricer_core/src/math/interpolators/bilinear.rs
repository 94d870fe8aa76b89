//! Bilinear interpolation on a rectangular grid with flat extrapolation.

use crate::types::InterpolationError;
use num_traits::Float;

/// Bilinear interpolator over `(x, y)` nodes.
///
/// Used for parameter surfaces indexed by (expiry, tenor). Queries outside
/// the grid are clamped to the boundary on each axis independently.
///
/// # Example
///
/// ```
/// use pricer_core::math::interpolators::BilinearInterpolator;
///
/// let expiries = [0.0, 10.0];
/// let tenors = [0.0, 10.0];
/// let grid: [&[f64]; 2] = [&[0.05, 0.06], &[0.05, 0.06]];
/// let surface = BilinearInterpolator::new(&expiries, &tenors, &grid).unwrap();
/// assert!((surface.interpolate(5.0, 5.0) - 0.055).abs() < 1e-15);
/// assert!((surface.interpolate(20.0, 30.0) - 0.06).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BilinearInterpolator<T: Float> {
    xs: Vec<T>,
    ys: Vec<T>,
    zs: Vec<Vec<T>>,
}

impl<T: Float> BilinearInterpolator<T> {
    /// Creates a bilinear interpolator; `zs[i][j]` is the value at `(xs[i], ys[j])`.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` if an axis has fewer than two nodes
    /// - `NonMonotonicData` if an axis is not strictly increasing
    /// - `InvalidInput` if the grid shape does not match the axes
    pub fn new(xs: &[T], ys: &[T], zs: &[&[T]]) -> Result<Self, InterpolationError> {
        for axis in [xs, ys] {
            if axis.len() < 2 {
                return Err(InterpolationError::InsufficientData {
                    got: axis.len(),
                    need: 2,
                });
            }
            if let Some(index) = axis.windows(2).position(|w| w[1] <= w[0]) {
                return Err(InterpolationError::NonMonotonicData { index: index + 1 });
            }
        }

        if zs.len() != xs.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "Grid rows ({}) must match x-axis length ({})",
                zs.len(),
                xs.len()
            )));
        }
        for (i, row) in zs.iter().enumerate() {
            if row.len() != ys.len() {
                return Err(InterpolationError::InvalidInput(format!(
                    "Grid row {} length ({}) must match y-axis length ({})",
                    i,
                    row.len(),
                    ys.len()
                )));
            }
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            zs: zs.iter().map(|row| row.to_vec()).collect(),
        })
    }

    /// Interpolated value at `(x, y)`; never fails once constructed.
    pub fn interpolate(&self, x: T, y: T) -> T {
        let (i, u) = locate(&self.xs, x);
        let (j, v) = locate(&self.ys, y);

        let z00 = self.zs[i][j];
        let z10 = self.zs[i + 1][j];
        let z01 = self.zs[i][j + 1];
        let z11 = self.zs[i + 1][j + 1];

        let one = T::one();
        (one - u) * (one - v) * z00 + u * (one - v) * z10 + (one - u) * v * z01 + u * v * z11
    }

    /// The same surface with every node value moved by `shift`.
    pub fn shifted(&self, shift: T) -> Self {
        Self {
            xs: self.xs.clone(),
            ys: self.ys.clone(),
            zs: self
                .zs
                .iter()
                .map(|row| row.iter().map(|&z| z + shift).collect())
                .collect(),
        }
    }

    /// x-axis nodes.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// y-axis nodes.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }
}

/// Cell index and clamped local coordinate in `[0, 1]`.
fn locate<T: Float>(nodes: &[T], x: T) -> (usize, T) {
    let n = nodes.len();
    if x <= nodes[0] {
        return (0, T::zero());
    }
    if x >= nodes[n - 1] {
        return (n - 2, T::one());
    }
    let pos = nodes.partition_point(|&xi| xi <= x);
    let i = pos - 1;
    (i, (x - nodes[i]) / (nodes[i + 1] - nodes[i]))
}
