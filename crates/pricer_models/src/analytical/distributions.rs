//! Standard normal distribution functions.
//!
//! `norm_cdf` uses Hart's double precision rational approximation
//! (absolute error below 1e-14), which the exercise-boundary kernels need:
//! Hull-White and G2++ prices are differences of large CDF-weighted sums.

use std::f64::consts::PI;

/// 1/√(2π)
pub const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

const HART_SWITCH: f64 = 7.071_067_811_865_47;
const HART_CUTOFF: f64 = 37.0;

/// Standard normal cumulative distribution function N(x).
///
/// # Examples
///
/// ```
/// use pricer_models::analytical::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
/// assert!((norm_cdf(1.0) - 0.841_344_746_068_542_9).abs() < 1e-14);
/// ```
pub fn norm_cdf(x: f64) -> f64 {
    let z = x.abs();
    let tail = if z > HART_CUTOFF {
        0.0
    } else {
        let e = (-0.5 * z * z).exp();
        if z < HART_SWITCH {
            let mut n = 3.526_249_659_989_11e-2 * z + 0.700_383_064_443_688;
            n = n * z + 6.373_962_203_531_65;
            n = n * z + 33.912_866_078_383;
            n = n * z + 112.079_291_497_871;
            n = n * z + 221.213_596_169_931;
            n = n * z + 220.206_867_912_376;
            let mut d = 8.838_834_764_831_84e-2 * z + 1.755_667_163_182_64;
            d = d * z + 16.064_177_579_207;
            d = d * z + 86.780_732_202_946_1;
            d = d * z + 296.564_248_779_674;
            d = d * z + 637.333_633_378_831;
            d = d * z + 793.826_512_519_948;
            d = d * z + 440.413_735_824_752;
            e * n / d
        } else {
            // continued fraction
            let mut b = z + 0.65;
            b = z + 4.0 / b;
            b = z + 3.0 / b;
            b = z + 2.0 / b;
            b = z + 1.0 / b;
            e / b / (2.0 * PI).sqrt()
        }
    };
    if x > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Standard normal density φ(x).
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}
