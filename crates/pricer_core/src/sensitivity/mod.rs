//! Value types returned by pricing methods.
//!
//! - [`CurrencyAmount`]: present value with its currency
//! - [`CurveSensitivity`]: curve name → (time, ∂PV/∂r) entries
//! - [`SurfaceSensitivity`]: (expiry, tenor) or (expiry, strike) → ∂PV/∂parameter
//!
//! These are short-lived values created per pricing call. Combining
//! sensitivities never merges duplicate nodes implicitly; call `cleaned`.

mod amount;
mod curve;
mod surface;

pub use amount::CurrencyAmount;
pub use curve::CurveSensitivity;
pub use surface::SurfaceSensitivity;
