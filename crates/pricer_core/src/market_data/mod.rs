//! Market data structures for swaption pricing.
//!
//! # Components
//!
//! - [`curves`]: Yield curve trait, implementations and the named curve bundle
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::{CurveEnum, YieldCurve, YieldCurveBundle};
//!
//! let bundle = YieldCurveBundle::new().with_curve("Funding", CurveEnum::flat(0.05));
//! let df = bundle.curve("Funding").unwrap().discount_factor(1.0).unwrap();
//! assert!((df - 0.951229).abs() < 1e-5);
//! ```

pub mod curves;
pub mod error;

pub use curves::{CurveEnum, FlatCurve, InterpolatedCurve, YieldCurve, YieldCurveBundle};
pub use error::MarketDataError;
