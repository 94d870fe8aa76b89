//! Successive swaption calibration.
//!
//! # Architecture
//!
//! ```text
//! SuccessiveRootFinderCalibration<O>         SuccessiveLeastSquareCalibration
//! ├── instruments (swaption + target price)  ├── baskets (swaptions + target prices)
//! ├── O: CalibrationObjective                ├── LMM-DD periods per basket
//! │   ├── HullWhiteObjective                 └── Levenberg-Marquardt on
//! │   ├── G2ppObjective                          (volatility factor, displacement)
//! │   └── LmmDdObjective
//! └── Brent root per instrument
//! ```
//!
//! Both engines walk their instruments in insertion order. Step `k` solves
//! the parameters attached to instrument `k` with the values of steps
//! `0..k` fixed, so later instruments never move earlier prices.
//!
//! Target prices are computed once per `calibrate` call; with the
//! `parallel` feature they are evaluated on the rayon pool. The solves
//! themselves are sequential.
//!
//! A failed step returns a [`CalibrationError`](pricer_core::types::CalibrationError)
//! carrying the failing instrument, the values solved so far followed by the
//! last iterate, and the residual. No parameter object is returned.

mod config;
mod g2pp;
mod hull_white;
mod instrument;
mod least_square;
mod lmm_dd;
mod objective;
mod root_finder;

pub use config::CalibrationConfig;
pub use g2pp::G2ppObjective;
pub use hull_white::HullWhiteObjective;
pub use least_square::SuccessiveLeastSquareCalibration;
pub use lmm_dd::LmmDdObjective;
pub use objective::CalibrationObjective;
pub use root_finder::{CalibrationState, SuccessiveRootFinderCalibration};
