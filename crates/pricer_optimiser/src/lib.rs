//! # pricer_optimiser
//!
//! Successive calibration of swaption models.
//!
//! This crate sits between Models (L2) and Pricing (L3) in the architecture,
//! solving inverse problems to construct model parameters that reprice a
//! set of swaptions.
//!
//! ## Architecture Position
//!
//! Layer 2.5 of the pricer workspace. Depends on `pricer_core` (L1) for
//! solvers and errors, `pricer_models` (L2) for instruments and parameters,
//! and `pricer_pricing` (L3) for the swaption methods used both as targets
//! and as model prices.
//!
//! ## Modules
//!
//! - `calibration`: successive root-finder and least-square engines with
//!   one objective per model (Hull-White, G2++, LMM-DD)
//! - `basket`: calibration baskets built from a swaption's fixed leg and the
//!   basket pricing method
//!
//! ## Example
//!
//! ```rust,ignore
//! use pricer_optimiser::calibration::{
//!     CalibrationConfig, HullWhiteObjective, SuccessiveRootFinderCalibration,
//! };
//! use pricer_pricing::analytical::SwaptionSabrMethod;
//!
//! let objective = HullWhiteObjective::new(0.01, 0.01);
//! let mut calibration = SuccessiveRootFinderCalibration::new(objective, CalibrationConfig::default());
//! calibration.add_instruments(components, &SwaptionSabrMethod, &sabr);
//! let hull_white = calibration.calibrate(&curves)?;
//! ```

#![warn(missing_docs)]

pub mod basket;
pub mod calibration;

#[cfg(test)]
mod test_support;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::basket::{calibration_basket_fixed_leg_period, BasketStrikes, SwaptionBasketMethod};
    pub use crate::calibration::*;
}
