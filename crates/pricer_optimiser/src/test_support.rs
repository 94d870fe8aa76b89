//! Market and trades shared by the unit tests.

use pricer_core::market_data::{CurveEnum, YieldCurveBundle};
use pricer_core::math::interpolators::BilinearInterpolator;
use pricer_core::types::time::{time_between, Date, Tenor};
use pricer_models::instruments::rates::{SwapGenerator, Swaption, SwaptionPhysical};
use pricer_models::models::{G2ppParameters, LmmDdParameters, SabrParameters};

pub(crate) const NOTIONAL: f64 = 1e8;
pub(crate) const STRIKE: f64 = 0.0325;

pub(crate) fn reference_date() -> Date {
    Date::from_ymd(2011, 7, 7).unwrap()
}

fn expiry_date() -> Date {
    Date::from_ymd(2016, 7, 7).unwrap()
}

pub(crate) fn curves() -> YieldCurveBundle {
    YieldCurveBundle::new()
        .with_curve("Funding", CurveEnum::flat(0.05))
        .with_curve("Forward", CurveEnum::flat(0.04))
        .with_reference_date(reference_date())
}

fn generator() -> SwapGenerator {
    SwapGenerator::eur("Funding", "Forward")
}

/// Held 5Y×5Y physical swaption.
pub(crate) fn physical(is_payer: bool) -> Swaption {
    generator()
        .swaption_physical(reference_date(), expiry_date(), Tenor::from_years(5), NOTIONAL, STRIKE, is_payer, true)
        .unwrap()
        .into()
}

/// Held 5Y×5Y cash-settled swaption.
pub(crate) fn cash(is_payer: bool) -> Swaption {
    generator()
        .swaption_cash(reference_date(), expiry_date(), Tenor::from_years(5), NOTIONAL, STRIKE, is_payer, true)
        .unwrap()
        .into()
}

/// Held 5Y×5Y physical payer on a notional amortising by 5% a period.
pub(crate) fn amortising() -> Swaption {
    let g = generator();
    let notionals: Vec<f64> = (0..10).map(|i| NOTIONAL * (1.0 - 0.05 * i as f64)).collect();
    let start = g.settlement_date(expiry_date()).unwrap();
    let swap = g
        .amortising_swap(reference_date(), start, Tenor::from_years(5), &notionals, STRIKE, true)
        .unwrap();
    SwaptionPhysical::new(time_between(reference_date(), expiry_date()), swap, true)
        .unwrap()
        .with_reference_date(reference_date())
        .into()
}

/// Coterminal European payers exercisable yearly from 1Y into swaps ending 10Y.
pub(crate) fn bermudan_components() -> Vec<Swaption> {
    let expiries: Vec<Date> = (1..10).map(|i| Date::from_ymd(2011 + i, 7, 7).unwrap()).collect();
    let bermudan = generator()
        .swaption_bermudan(reference_date(), &expiries, Tenor::from_years(9), NOTIONAL, STRIKE, true, true)
        .unwrap();
    (0..expiries.len())
        .filter_map(|i| bermudan.european(i))
        .map(Swaption::from)
        .collect()
}

/// Two-factor G2++ with constant volatilities.
pub(crate) fn g2pp() -> G2ppParameters {
    G2ppParameters::new([0.01, 0.30], [vec![0.01], vec![0.006]], Vec::new(), -0.30).unwrap()
}

/// SABR surfaces on a 3×3 (expiry, tenor) grid with a mild slope.
pub(crate) fn sabr() -> SabrParameters {
    let axis = [1.0, 5.0, 10.0];
    let surface = |base: f64, step: f64| {
        let rows: Vec<Vec<f64>> = (0..3)
            .map(|i| (0..3).map(|j| base + step * (i + j) as f64).collect())
            .collect();
        let slices: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();
        BilinearInterpolator::new(&axis, &axis, &slices).unwrap()
    };
    SabrParameters::new(
        surface(0.05, 0.002),
        surface(0.5, 0.0),
        surface(-0.25, 0.01),
        surface(0.5, -0.02),
    )
}

/// Two-factor LMM-DD on the ibor periods of the swaption underlying.
pub(crate) fn lmm(swaption: &Swaption) -> LmmDdParameters {
    LmmDdParameters::from_ibor_leg(swaption.underlying().ibor_leg(), 0.10, 0.02, |t| {
        let angle = 0.05 * t;
        vec![0.08 * angle.cos(), 0.08 * angle.sin()]
    })
    .unwrap()
}
