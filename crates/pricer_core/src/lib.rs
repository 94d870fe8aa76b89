//! # pricer_core: Foundation layer of the swaption engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace and provides:
//! - Time types: `Date`, `Tenor`, `DayCountConvention`, `BusinessDayConvention` (`types::time`)
//! - Currency types: `Currency` (`types::currency`)
//! - Error types: `PricingError`, `SolverError`, `CalibrationError` (`types::error`)
//! - Yield curves and the named curve bundle (`market_data`)
//! - Solvers, interpolators and quadrature rules (`math`)
//! - Present value and sensitivity containers (`sensitivity`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates:
//! - num-traits: Generic floating point curves and solvers
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::{CurveEnum, YieldCurve, YieldCurveBundle};
//! use pricer_core::sensitivity::CurveSensitivity;
//! use pricer_core::types::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2011, 7, 7).unwrap();
//! let end = Date::from_ymd(2016, 7, 7).unwrap();
//! let tau = DayCountConvention::Actual365Fixed.year_fraction(start, end);
//!
//! let bundle = YieldCurveBundle::new().with_curve("Funding", CurveEnum::flat(0.05));
//! let df = bundle.curve("Funding").unwrap().discount_factor(tau).unwrap();
//! let delta = CurveSensitivity::of("Funding", vec![(tau, -tau * df)]);
//! assert!(delta.total() < 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for dates, currencies, configs and sensitivities

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod sensitivity;
pub mod types;
