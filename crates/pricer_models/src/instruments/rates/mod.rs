//! Interest rate instruments.
//!
//! - [`CouponFixed`] and [`CouponIbor`]: coupons with resolved payment times
//! - [`FixedIborSwap`]: fixed against ibor swap, direction carried by notional signs
//! - [`SwaptionPhysical`], [`SwaptionCash`], [`SwaptionBermudan`]: options on swaps,
//!   wrapped in the [`Swaption`] enum for static dispatch
//! - [`SwapGenerator`]: market conventions turning dates into the above
//!
//! # Examples
//!
//! ```
//! use pricer_core::market_data::{CurveEnum, YieldCurveBundle};
//! use pricer_core::types::time::{Date, Tenor};
//! use pricer_models::instruments::rates::SwapGenerator;
//!
//! let reference = Date::from_ymd(2011, 7, 7).unwrap();
//! let start = Date::from_ymd(2011, 7, 11).unwrap();
//! let swap = SwapGenerator::eur("Funding", "Forward")
//!     .swap(reference, start, Tenor::from_years(5), 1e6, 0.03, true)
//!     .unwrap();
//!
//! let curves = YieldCurveBundle::new()
//!     .with_curve("Funding", CurveEnum::flat(0.03))
//!     .with_curve("Forward", CurveEnum::flat(0.03));
//! let par = swap.par_rate(&curves).unwrap();
//! assert!(par > 0.02 && par < 0.04);
//! ```

mod coupon;
mod generator;
mod swap;
mod swaption;

pub use coupon::{CouponFixed, CouponIbor, IborFixing};
pub use generator::SwapGenerator;
pub use swap::{CashFlowEquivalents, FixedIborSwap};
pub use swaption::{Swaption, SwaptionBermudan, SwaptionCash, SwaptionPhysical};
