//! # Swaption pricing methods (Layer 3)
//!
//! Prices European physical, European cash-settled and Bermudan swaptions
//! with the models of `pricer_models`:
//!
//! - [`analytical`]: Black, SABR (with right-wing extrapolation), Hull-White
//!   and the G2++ and LMM-DD approximations
//! - [`integration`]: Gaussian quadrature in Hull-White and G2++, including
//!   the Hull-White Bermudan backward induction
//! - [`mc`]: seeded Monte Carlo in Hull-White, G2++ and LMM-DD
//! - [`finite_difference`]: bump-and-reprice curve and parameter sensitivities
//! - [`schedule`]: exercise decision schedules shared by numerical methods
//!
//! Every method implements [`SwaptionPricer`] and answers
//! `UnsupportedInstrument` for the variants it does not price.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use pricer_pricing::analytical::SwaptionHullWhiteMethod;
//! use pricer_pricing::SwaptionPricer;
//!
//! let pv = SwaptionHullWhiteMethod.present_value(&swaption, &curves, &hull_white)?;
//! println!("{} {}", pv.currency(), pv.amount());
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): payoffs of a Monte Carlo block are evaluated on
//!   the rayon pool. Draws and sums stay sequential, so results do not
//!   depend on the feature.
//! - `serde`: serialisation of the configurations and estimates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![allow(unknown_lints)]

pub mod analytical;
pub mod finite_difference;
pub mod integration;
pub mod mc;
pub mod rng;
pub mod schedule;

mod cash;
mod method;

#[cfg(test)]
mod test_support;

pub use integration::IntegrationConfig;
pub use mc::{MonteCarloConfig, MonteCarloEstimate};
pub use method::SwaptionPricer;
pub use schedule::{decision_schedule, DecisionSchedule, ExerciseDecision};
