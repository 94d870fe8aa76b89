//! Monte Carlo swaption pricing.
//!
//! # Architecture
//!
//! ```text
//! *MonteCarloMethod
//! ├── MonteCarloConfig   (paths, steps, seed, antithetic)
//! ├── NormalGenerator    (injected, PricerRng by default)
//! └── simulation
//!     ├── sequential normal draws, block by block
//!     └── payoffs per path (rayon with the `parallel` feature)
//! ```
//!
//! Each method prices European swaptions only and answers
//! `UnsupportedInstrument` for Bermudans. `present_value` seeds a
//! [`PricerRng`](crate::rng::PricerRng) from the configuration, so two
//! calls with the same configuration agree bit for bit;
//! `present_value_with` takes any [`NormalGenerator`](crate::rng::NormalGenerator).
//!
//! # Examples
//!
//! ```rust,ignore
//! use pricer_pricing::mc::{HullWhiteMonteCarloMethod, MonteCarloConfig};
//!
//! let config = MonteCarloConfig::builder()
//!     .n_paths(12_500)
//!     .seed(42)
//!     .build()?;
//! let method = HullWhiteMonteCarloMethod::new(config);
//! let pv = method.present_value(&swaption, &curves, &hull_white)?;
//! ```

mod config;
mod error;
mod g2pp;
mod hull_white;
mod lmm;
mod simulation;

pub use config::{MonteCarloConfig, MonteCarloConfigBuilder, MAX_PATHS, MAX_STEPS};
pub use error::ConfigError;
pub use g2pp::G2ppMonteCarloMethod;
pub use hull_white::HullWhiteMonteCarloMethod;
pub use lmm::LmmMonteCarloMethod;
pub use simulation::MonteCarloEstimate;
