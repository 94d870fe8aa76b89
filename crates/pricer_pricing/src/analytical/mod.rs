//! Closed-form and approximate swaption pricing.
//!
//! | Method | Parameters | Swaptions |
//! |---|---|---|
//! | [`SwaptionBlackMethod`] | Black or normal surface | physical, cash |
//! | [`SwaptionSabrMethod`] | SABR surfaces | physical, cash |
//! | [`SwaptionSabrExtrapolationMethod`] | SABR surfaces | physical, cash |
//! | [`SwaptionHullWhiteMethod`] | Hull-White | physical, cash |
//! | [`SwaptionG2ppApproximationMethod`] | G2++ | physical, cash |
//! | [`SwaptionLmmDdMethod`] | LMM-DD | physical |
//!
//! Bermudan swaptions are priced by the numerical integration methods.
//!
//! ```rust,ignore
//! use pricer_pricing::analytical::SwaptionHullWhiteMethod;
//!
//! let pv = SwaptionHullWhiteMethod.present_value(&swaption, &curves, &hull_white)?;
//! let vega = SwaptionHullWhiteMethod.present_value_hull_white_sensitivity(&swaption, &curves, &hull_white)?;
//! ```

mod black;
pub(crate) mod g2pp;
pub(crate) mod hull_white;
pub(crate) mod lmm_dd;
mod sabr;
mod sabr_extrapolation;

pub use black::SwaptionBlackMethod;
pub use g2pp::SwaptionG2ppApproximationMethod;
pub use hull_white::SwaptionHullWhiteMethod;
pub use lmm_dd::SwaptionLmmDdMethod;
pub use sabr::{PresentValueSabrSensitivity, SwaptionSabrMethod};
pub use sabr_extrapolation::SwaptionSabrExtrapolationMethod;
