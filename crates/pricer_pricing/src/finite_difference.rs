//! Bump-and-reprice sensitivities.
//!
//! Used where no analytic sensitivity exists and as the reference the
//! analytic sensitivities are tested against. Both helpers take central
//! differences.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::sensitivity::CurveSensitivity;
use pricer_core::types::PricingError;
use pricer_models::instruments::rates::{FixedIborSwap, Swaption};
use pricer_models::models::ModelError;

/// Two times closer than this are one curve node.
const NODE_TOLERANCE: f64 = 1e-10;

fn check_shift(shift: f64) -> Result<(), PricingError> {
    if !(shift > 0.0 && shift.is_finite()) {
        return Err(PricingError::InvalidInput(format!("bump size must be positive, got {shift}")));
    }
    Ok(())
}

/// Sensitivity of `pv` to the zero rate of curve `name` at each of `times`.
///
/// The curve is first resampled with nodes at `times`, so the result is
/// comparable with the analytic `∂PV/∂r(t)` when `times` contains every
/// time the price reads the curve at. Non-positive times carry no
/// sensitivity and are skipped.
///
/// # Errors
///
/// `InvalidInput` for a non-positive shift or an unknown curve, and any
/// error of `pv`.
pub fn curve_node_sensitivity<F>(
    curves: &YieldCurveBundle,
    name: &str,
    times: &[f64],
    shift: f64,
    mut pv: F,
) -> Result<CurveSensitivity, PricingError>
where
    F: FnMut(&YieldCurveBundle) -> Result<f64, PricingError>,
{
    check_shift(shift)?;
    let mut nodes: Vec<f64> = times.iter().copied().filter(|&t| t > 0.0).collect();
    nodes.sort_by(f64::total_cmp);
    nodes.dedup_by(|a, b| (*a - *b).abs() < NODE_TOLERANCE);
    if nodes.is_empty() {
        return Ok(CurveSensitivity::new());
    }
    let base = curves.curve(name)?.with_nodes(&nodes)?;
    let mut entries = Vec::with_capacity(nodes.len());
    for &t in &nodes {
        let up = curves.with_replaced(name, base.with_single_shift(t, shift)?)?;
        let down = curves.with_replaced(name, base.with_single_shift(t, -shift)?)?;
        entries.push((t, (pv(&up)? - pv(&down)?) / (2.0 * shift)));
    }
    Ok(CurveSensitivity::of(name, entries))
}

/// Sensitivity of `pv` to each of `count` model parameters.
///
/// `bump(params, i, h)` returns a copy of the parameters with parameter `i`
/// moved by `h`.
///
/// # Errors
///
/// `InvalidInput` for a non-positive shift or a rejected bump, and any
/// error of `pv`.
pub fn parameter_sensitivity<P, B, F>(
    params: &P,
    count: usize,
    shift: f64,
    bump: B,
    mut pv: F,
) -> Result<Vec<f64>, PricingError>
where
    B: Fn(&P, usize, f64) -> Result<P, ModelError>,
    F: FnMut(&P) -> Result<f64, PricingError>,
{
    check_shift(shift)?;
    (0..count)
        .map(|i| {
            let up = pv(&bump(params, i, shift)?)?;
            let down = pv(&bump(params, i, -shift)?)?;
            Ok((up - down) / (2.0 * shift))
        })
        .collect()
}

/// Every time a swap reads its curves at.
pub(crate) fn swap_times(swap: &FixedIborSwap) -> Vec<f64> {
    let mut times = vec![swap.settlement_time()];
    times.extend(swap.fixed_leg().iter().map(|c| c.payment_time()));
    for c in swap.ibor_leg() {
        let fixing = c.fixing();
        times.extend([c.payment_time(), fixing.start_time, fixing.end_time]);
    }
    times
}

/// Node sensitivity of a swaption price to every curve it uses, with
/// nodes at the expiries and at every swap time.
pub(crate) fn swaption_curve_sensitivity<F>(
    swaption: &Swaption,
    curves: &YieldCurveBundle,
    shift: f64,
    mut pv: F,
) -> Result<CurveSensitivity, PricingError>
where
    F: FnMut(&YieldCurveBundle) -> Result<f64, PricingError>,
{
    let mut times = match swaption {
        Swaption::Bermudan(s) => {
            let mut times = s.expiry_times().to_vec();
            times.extend(s.underlyings().iter().flat_map(swap_times));
            times
        }
        other => {
            let mut times = swap_times(other.underlying());
            times.push(other.expiry_time());
            times
        }
    };
    times.sort_by(f64::total_cmp);
    let mut result = CurveSensitivity::new();
    for name in swaption.curve_names() {
        result = result.plus(&curve_node_sensitivity(curves, name, &times, shift, &mut pv)?);
    }
    Ok(result)
}
