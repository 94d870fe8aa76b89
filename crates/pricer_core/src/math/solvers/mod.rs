//! Root-finding and least-squares solvers used by calibration and pricing.
//!
//! ## Available Solvers
//!
//! - [`BrentSolver`]: Bracketing root finder, with optional bracket expansion
//! - [`LevenbergMarquardtSolver`]: Nonlinear least-squares with box limits
//!
//! Root finders use [`SolverConfig`] (`tolerance`, `max_iterations`);
//! the LM solver uses [`LMConfig`]. Both accept fallible objectives so
//! pricing errors propagate out of a calibration step unchanged.
//!
//! ## Example
//!
//! ```
//! use pricer_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x.cos() - x, 0.0, 1.0).unwrap();
//! assert!((root.cos() - root).abs() < 1e-9);
//! ```

mod brent;
mod config;
mod levenberg_marquardt;

pub use brent::BrentSolver;
pub use config::SolverConfig;
pub use levenberg_marquardt::{LMConfig, LMResult, LevenbergMarquardtSolver};
