//! Interpolation methods for curves and parameter surfaces.
//!
//! - [`LinearInterpolator`]: Piecewise linear, optional flat extrapolation,
//!   with node weights for sensitivity projection
//! - [`BilinearInterpolator`]: 2D grid interpolation for (expiry, tenor) surfaces
//!
//! All interpolators are generic over `T: num_traits::Float`.
//!
//! ## Example
//!
//! ```
//! use pricer_core::math::interpolators::{Interpolator, LinearInterpolator};
//!
//! let xs = [0.0_f64, 1.0, 2.0, 3.0];
//! let ys = [0.0, 1.0, 4.0, 9.0];
//!
//! let interp = LinearInterpolator::new(&xs, &ys).unwrap();
//! assert_eq!(interp.domain(), (0.0, 3.0));
//! assert!((interp.interpolate(1.5).unwrap() - 2.5).abs() < 1e-10);
//! ```

mod bilinear;
mod linear;
mod traits;

pub use bilinear::BilinearInterpolator;
pub use linear::LinearInterpolator;
pub use traits::Interpolator;
