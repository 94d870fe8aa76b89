//! Numerical building blocks shared by pricing and calibration.
//!
//! - [`interpolators`]: Linear and bilinear interpolation
//! - [`quadrature`]: Gauss-Legendre and Gauss-Hermite rules
//! - [`solvers`]: Brent root finding and Levenberg-Marquardt least squares

pub mod interpolators;
pub mod quadrature;
pub mod solvers;
