//! Benchmarks for pricer_optimiser.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::market_data::{CurveEnum, YieldCurveBundle};
use pricer_core::math::interpolators::BilinearInterpolator;
use pricer_core::types::time::{Date, Tenor};
use pricer_models::instruments::rates::{SwapGenerator, Swaption};
use pricer_models::models::{G2ppParameters, LmmDdParameters, SabrParameters};
use pricer_optimiser::basket::{calibration_basket_fixed_leg_period, BasketStrikes};
use pricer_optimiser::calibration::{
    CalibrationConfig, G2ppObjective, HullWhiteObjective, LmmDdObjective, SuccessiveLeastSquareCalibration,
    SuccessiveRootFinderCalibration,
};
use pricer_pricing::analytical::SwaptionSabrMethod;

fn reference_date() -> Date {
    Date::from_ymd(2011, 7, 7).unwrap()
}

fn curves() -> YieldCurveBundle {
    YieldCurveBundle::new()
        .with_curve("Funding", CurveEnum::flat(0.05))
        .with_curve("Forward", CurveEnum::flat(0.04))
}

fn generator() -> SwapGenerator {
    SwapGenerator::eur("Funding", "Forward")
}

fn sabr() -> SabrParameters {
    let axis = [1.0, 5.0, 10.0];
    let surface = |value: f64| {
        let rows = vec![vec![value; 3]; 3];
        let slices: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();
        BilinearInterpolator::new(&axis, &axis, &slices).unwrap()
    };
    SabrParameters::new(surface(0.05), surface(0.5), surface(-0.25), surface(0.5))
}

/// Coterminal payers exercisable yearly into swaps ending `years + 1` years out.
fn coterminal(years: i32) -> Vec<Swaption> {
    let expiries: Vec<Date> = (1..=years).map(|y| Date::from_ymd(2011 + y, 7, 7).unwrap()).collect();
    let bermudan = generator()
        .swaption_bermudan(reference_date(), &expiries, Tenor::from_years(years as u32), 1e8, 0.0325, true, true)
        .unwrap();
    (0..expiries.len())
        .filter_map(|i| bermudan.european(i))
        .map(Swaption::from)
        .collect()
}

fn physical(tenor: u32) -> Swaption {
    generator()
        .swaption_physical(
            reference_date(),
            Date::from_ymd(2016, 7, 7).unwrap(),
            Tenor::from_years(tenor),
            1e8,
            0.0325,
            true,
            true,
        )
        .unwrap()
        .into()
}

fn lmm(swaption: &Swaption) -> LmmDdParameters {
    LmmDdParameters::from_ibor_leg(swaption.underlying().ibor_leg(), 0.10, 0.02, |_| vec![0.08, 0.02]).unwrap()
}

fn benchmark_root_finder(c: &mut Criterion) {
    let (market, sabr) = (curves(), sabr());
    let mut group = c.benchmark_group("root_finder");
    for years in [5, 10] {
        let instruments = coterminal(years);
        group.bench_with_input(BenchmarkId::new("hull_white", years), &instruments, |b, instruments| {
            b.iter(|| {
                let mut calibration =
                    SuccessiveRootFinderCalibration::new(HullWhiteObjective::new(0.01, 0.01), CalibrationConfig::default());
                calibration.add_instruments(instruments.iter().cloned(), &SwaptionSabrMethod, &sabr);
                black_box(calibration.calibrate(&market))
            })
        });
        let template = G2ppParameters::new([0.01, 0.30], [vec![0.01], vec![0.006]], Vec::new(), -0.30).unwrap();
        group.bench_with_input(BenchmarkId::new("g2pp", years), &instruments, |b, instruments| {
            b.iter(|| {
                let mut calibration =
                    SuccessiveRootFinderCalibration::new(G2ppObjective::new(template.clone()), CalibrationConfig::default());
                calibration.add_instruments(instruments.iter().cloned(), &SwaptionSabrMethod, &sabr);
                black_box(calibration.calibrate(&market))
            })
        });
    }
    group.finish();
}

fn benchmark_lmm(c: &mut Criterion) {
    let (market, sabr) = (curves(), sabr());
    let mut group = c.benchmark_group("lmm");
    group.sample_size(10);
    for tenor in [2, 5] {
        let swaption = physical(tenor);
        let basket = calibration_basket_fixed_leg_period(&swaption, BasketStrikes::Original).unwrap();
        let initial = lmm(&swaption);
        group.bench_with_input(BenchmarkId::new("root_finder", tenor), &basket, |b, basket| {
            b.iter(|| {
                let mut calibration =
                    SuccessiveRootFinderCalibration::new(LmmDdObjective::new(initial.clone()), CalibrationConfig::default());
                calibration.add_instruments(basket.iter().cloned(), &SwaptionSabrMethod, &sabr);
                black_box(calibration.calibrate(&market))
            })
        });
        let offsets = [-0.005, 0.0, 0.005];
        let strikes = calibration_basket_fixed_leg_period(
            &swaption,
            BasketStrikes::ParOffsets { offsets: &offsets, curves: &market },
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::new("least_square", tenor), &strikes, |b, strikes| {
            b.iter(|| {
                let mut calibration = SuccessiveLeastSquareCalibration::new(initial.clone(), CalibrationConfig::default());
                for period in strikes.chunks(offsets.len()) {
                    calibration.add_basket(period.to_vec(), &SwaptionSabrMethod, &sabr);
                }
                black_box(calibration.calibrate(&market))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_root_finder, benchmark_lmm);
criterion_main!(benches);
