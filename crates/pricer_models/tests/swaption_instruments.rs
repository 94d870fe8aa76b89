//! Instruments built from trade dates, valued against flat curves.

use approx::assert_relative_eq;
use pricer_core::market_data::{CurveEnum, YieldCurve, YieldCurveBundle};
use pricer_core::types::time::{Date, Tenor};
use pricer_models::instruments::rates::SwapGenerator;
use pricer_models::models::{SabrParameters, SabrPoint};

fn curves() -> YieldCurveBundle {
    YieldCurveBundle::new()
        .with_curve("Funding", CurveEnum::flat(0.05))
        .with_curve("Forward", CurveEnum::flat(0.04))
}

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

#[test]
fn test_swap_at_par_rate_has_zero_value() {
    let generator = SwapGenerator::eur("Funding", "Forward");
    let reference = date(2011, 7, 7);
    let swaption = generator
        .swaption_physical(reference, date(2016, 7, 7), Tenor::from_years(5), 1e8, 0.0325, true, true)
        .unwrap();
    let curves = curves();
    let par = swaption.underlying().par_rate(&curves).unwrap();
    let at_par = swaption.underlying().with_fixed_rate(par);
    assert!(at_par.present_value(&curves).unwrap().amount().abs() < 1e-6);
}

#[test]
fn test_cash_flow_equivalents_reprice_swap() {
    let generator = SwapGenerator::eur("Funding", "Forward");
    let swap = generator
        .swap(date(2011, 7, 7), date(2011, 7, 11), Tenor::from_years(10), 1e6, 0.03, false)
        .unwrap();
    let curves = curves();
    let cfe = swap.cash_flow_equivalents(&curves).unwrap();
    let funding = curves.curve("Funding").unwrap();
    let pv: f64 = cfe
        .times()
        .iter()
        .zip(cfe.amounts())
        .map(|(&t, &a)| a * funding.discount_factor(t).unwrap())
        .sum();
    assert_relative_eq!(pv, swap.present_value(&curves).unwrap().amount(), epsilon = 1e-6);
    // Receiver swap: the first equivalent flow is paid.
    assert!(cfe.amounts()[0] < 0.0);
}

#[test]
fn test_payer_and_receiver_values_offset() {
    let generator = SwapGenerator::eur("Funding", "Forward");
    let reference = date(2011, 7, 7);
    let start = date(2012, 1, 9);
    let curves = curves();
    let payer = generator.swap(reference, start, Tenor::from_years(5), 1e6, 0.035, true).unwrap();
    let receiver = generator.swap(reference, start, Tenor::from_years(5), 1e6, 0.035, false).unwrap();
    assert_relative_eq!(
        payer.present_value(&curves).unwrap().amount(),
        -receiver.present_value(&curves).unwrap().amount(),
        epsilon = 1e-8
    );
}

#[test]
fn test_sabr_surface_lookup_at_swaption_coordinates() {
    let generator = SwapGenerator::eur("Funding", "Forward");
    let swaption = generator
        .swaption_physical(date(2011, 7, 7), date(2016, 7, 7), Tenor::from_years(5), 1e8, 0.0325, true, true)
        .unwrap();
    let point = SabrPoint { alpha: 0.05, beta: 0.5, rho: -0.25, nu: 0.5 };
    let sabr = SabrParameters::flat(point).unwrap();
    let forward = swaption.underlying().par_rate(&curves()).unwrap();
    let vol = sabr.volatility(
        swaption.expiry_time(),
        swaption.underlying().tenor_time(),
        forward,
        swaption.strike(),
    );
    assert!(vol > 0.1 && vol < 0.5);
}
