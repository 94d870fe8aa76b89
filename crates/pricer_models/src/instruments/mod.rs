//! Instrument definitions.
//!
//! Swaptions are priced from model times: every coupon, fixing and expiry
//! is stored as a year fraction from the reference date, so the pricing
//! layer never touches calendars. [`rates::SwapGenerator`] is the one place
//! where dates are turned into times.

mod error;
pub mod rates;

pub use error::InstrumentError;
