//! Interest rate model parameters and their closed-form kernels.
//!
//! - [`hull_white`]: one-factor Hull-White with piecewise-constant volatility
//! - [`g2pp`]: two-factor Gaussian G2++ model
//! - [`lmm_dd`]: Libor market model with displaced diffusion
//! - [`sabr`]: SABR smile parameters and Hagan volatility
//! - [`sabr_extrapolation`]: SABR with a power-law right tail
//! - [`black`]: flat Black/Bachelier volatility surfaces
//!
//! Parameter objects are immutable values. Bumping and calibration
//! produce new objects through `with_*` methods.

pub mod black;
mod error;
pub mod g2pp;
pub mod hull_white;
pub mod lmm_dd;
pub mod sabr;
pub mod sabr_extrapolation;

pub use black::{BlackVolatilitySurface, VolatilityKind};
pub use error::ModelError;
pub use g2pp::G2ppParameters;
pub use hull_white::HullWhiteParameters;
pub use lmm_dd::LmmDdParameters;
pub use sabr::{SabrFormula, SabrParameter, SabrParameters, SabrPoint, SabrVolatilityAdjoint};
pub use sabr_extrapolation::SabrExtrapolationRight;

/// Below this rate the exponential integral degenerates to the interval length.
const SMALL_RATE: f64 = 1e-12;

/// Pieces of `[start, end]` cut at the volatility knots, with the index of
/// the volatility that applies on each piece.
///
/// Volatility `i` applies on `[knots[i - 1], knots[i])`, with implicit
/// `knots[-1] = -inf` and `knots[n] = +inf`.
pub(crate) fn piecewise_segments(knots: &[f64], start: f64, end: f64) -> Vec<(usize, f64, f64)> {
    if end <= start {
        return Vec::new();
    }
    let first = knots.partition_point(|&k| k <= start);
    let mut segments = Vec::new();
    let mut lo = start;
    for (index, &knot) in knots.iter().enumerate().skip(first) {
        if knot >= end {
            segments.push((index, lo, end));
            return segments;
        }
        segments.push((index, lo, knot));
        lo = knot;
    }
    segments.push((knots.len(), lo, end));
    segments
}

/// `∫_lo^hi exp(rate·s) ds`.
#[inline]
pub(crate) fn exp_integral(rate: f64, lo: f64, hi: f64) -> f64 {
    if rate.abs() < SMALL_RATE {
        hi - lo
    } else {
        ((rate * hi).exp() - (rate * lo).exp()) / rate
    }
}

/// `∫_start^end σ_a(s)·σ_b(s)·exp(rate·s) ds` for two piecewise-constant
/// volatilities sharing `knots`.
pub(crate) fn piecewise_exp_integral(
    knots: &[f64],
    vol_a: &[f64],
    vol_b: &[f64],
    rate: f64,
    start: f64,
    end: f64,
) -> f64 {
    piecewise_segments(knots, start, end)
        .into_iter()
        .map(|(i, lo, hi)| vol_a[i] * vol_b[i] * exp_integral(rate, lo, hi))
        .sum()
}

/// Checks a knot/volatility pair: knots positive and strictly increasing,
/// `vols.len() == knots.len() + 1`, every volatility finite and non-negative.
pub(crate) fn validate_piecewise(knots: &[f64], vols: &[f64]) -> Result<(), ModelError> {
    if vols.len() != knots.len() + 1 {
        return Err(ModelError::DimensionMismatch {
            message: format!("{} volatilities for {} knots", vols.len(), knots.len()),
        });
    }
    if let Some(&k) = knots.first() {
        if k.is_nan() || k < 0.0 {
            return Err(ModelError::NonIncreasingKnots { index: 0 });
        }
    }
    if let Some(index) = knots.windows(2).position(|w| w[1] <= w[0]) {
        return Err(ModelError::NonIncreasingKnots { index: index + 1 });
    }
    if let Some((index, &value)) = vols
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(ModelError::InvalidVolatility { index, value });
    }
    Ok(())
}
