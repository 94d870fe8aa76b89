//! Yield curves and the named curve bundle.
//!
//! This module provides:
//! - [`YieldCurve`]: Generic trait for discount factor and rate calculations
//! - [`FlatCurve`]: Constant rate yield curve
//! - [`InterpolatedCurve`]: Node-based zero-rate curve
//! - [`CurveEnum`]: Static dispatch enum with bump constructors
//! - [`YieldCurveBundle`]: Immutable name → curve container

mod bundle;
mod curve_enum;
mod flat;
mod interpolated;
mod traits;

pub use bundle::YieldCurveBundle;
pub use curve_enum::CurveEnum;
pub use flat::FlatCurve;
pub use interpolated::InterpolatedCurve;
pub use traits::YieldCurve;
