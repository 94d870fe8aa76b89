//! Market and trades shared by the integration tests.
#![allow(dead_code)]

use pricer_core::market_data::{CurveEnum, YieldCurveBundle};
use pricer_core::math::interpolators::BilinearInterpolator;
use pricer_core::types::time::{Date, Tenor};
use pricer_models::instruments::rates::{SwapGenerator, Swaption};
use pricer_models::models::{G2ppParameters, HullWhiteParameters, LmmDdParameters, SabrParameters};

pub const NOTIONAL: f64 = 100_000_000.0;
pub const STRIKE: f64 = 0.0325;

pub fn reference_date() -> Date {
    Date::from_ymd(2011, 7, 7).unwrap()
}

pub fn curves() -> YieldCurveBundle {
    YieldCurveBundle::new()
        .with_curve("EUR Discounting", CurveEnum::flat(0.05))
        .with_curve("EUR Euribor 3M", CurveEnum::flat(0.04))
        .with_reference_date(reference_date())
}

pub fn generator() -> SwapGenerator {
    SwapGenerator::eur("EUR Discounting", "EUR Euribor 3M")
}

fn expiry(years: i32) -> Date {
    Date::from_ymd(2011 + years, 7, 7).unwrap()
}

pub fn physical(notional: f64, is_payer: bool, is_long: bool) -> Swaption {
    generator()
        .swaption_physical(reference_date(), expiry(5), Tenor::from_years(5), notional, STRIKE, is_payer, is_long)
        .unwrap()
        .into()
}

pub fn cash(notional: f64, is_payer: bool, is_long: bool) -> Swaption {
    generator()
        .swaption_cash(reference_date(), expiry(5), Tenor::from_years(5), notional, STRIKE, is_payer, is_long)
        .unwrap()
        .into()
}

/// Exercisable yearly from 2Y into a swap ending 10Y from the first spot date.
pub fn bermudan(is_payer: bool, is_long: bool) -> Swaption {
    let expiries: Vec<Date> = (2..10).map(expiry).collect();
    generator()
        .swaption_bermudan(reference_date(), &expiries, Tenor::from_years(8), NOTIONAL, STRIKE, is_payer, is_long)
        .unwrap()
        .into()
}

/// The European components of [`bermudan`].
pub fn bermudan_components(is_payer: bool) -> Vec<Swaption> {
    match bermudan(is_payer, true) {
        Swaption::Bermudan(b) => (0..b.expiry_times().len())
            .filter_map(|i| b.european(i))
            .map(Swaption::from)
            .collect(),
        _ => unreachable!(),
    }
}

pub fn hull_white() -> HullWhiteParameters {
    HullWhiteParameters::new(0.01, vec![0.01, 0.011, 0.012, 0.013, 0.014], vec![0.5, 1.0, 2.0, 5.0]).unwrap()
}

pub fn g2pp() -> G2ppParameters {
    G2ppParameters::new(
        [0.01, 0.30],
        [vec![0.01, 0.0105, 0.011], vec![0.005, 0.006, 0.007]],
        vec![1.0, 3.0],
        -0.30,
    )
    .unwrap()
}

pub fn lmm(swaption: &Swaption) -> LmmDdParameters {
    LmmDdParameters::from_ibor_leg(swaption.underlying().ibor_leg(), 0.10, 0.02, |t| {
        let angle = 0.05 * t;
        vec![0.08 * angle.cos(), 0.08 * angle.sin()]
    })
    .unwrap()
}

pub fn sabr() -> SabrParameters {
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
