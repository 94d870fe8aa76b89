//! Closed-form option formulas used by the swaption methods.
//!
//! This module provides:
//! - [`norm_cdf`] / [`norm_pdf`]: standard normal distribution
//! - Black (lognormal) price, adjoint, second order derivatives and implied volatility
//! - Bachelier (normal) price and vega
//! - [`AnalyticalError`]: error type for formula failures
//!
//! # Example
//!
//! ```
//! use pricer_models::analytical::{black_price_adjoint, norm_cdf};
//!
//! let adj = black_price_adjoint(0.03, 0.03, 1.0, 0.2, true);
//! assert!((adj.forward - norm_cdf(0.1)).abs() < 1e-12);
//! ```

mod bachelier;
mod black;
mod distributions;
mod error;

pub use bachelier::{bachelier_price, bachelier_vega};
pub use black::{
    black_implied_volatility, black_price, black_price_adjoint, black_price_second_order,
    BlackAdjoint, BlackSecondOrder,
};
pub use distributions::{norm_cdf, norm_pdf, FRAC_1_SQRT_2PI};
pub use error::AnalyticalError;
