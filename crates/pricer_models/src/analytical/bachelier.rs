//! Bachelier (normal) option formulas for normal-volatility swaption surfaces.
//!
//! **Call Price**: C = (F − K)·N(d) + σ√T·φ(d)
//! **Put Price**: P = (K − F)·N(−d) + σ√T·φ(d)
//!
//! with d = (F − K)/(σ√T). Forwards and strikes may be negative.

use super::distributions::{norm_cdf, norm_pdf};

/// Undiscounted Bachelier price.
///
/// # Examples
/// ```
/// use pricer_models::analytical::bachelier_price;
///
/// let call = bachelier_price(0.01, 0.01, 1.0, 0.005, true);
/// let put = bachelier_price(0.01, 0.01, 1.0, 0.005, false);
/// assert!((call - put).abs() < 1e-15);
/// ```
pub fn bachelier_price(
    forward: f64,
    strike: f64,
    expiry: f64,
    volatility: f64,
    is_call: bool,
) -> f64 {
    let w = if is_call { 1.0 } else { -1.0 };
    let std_dev = volatility * expiry.max(0.0).sqrt();
    if std_dev <= 0.0 {
        return (w * (forward - strike)).max(0.0);
    }
    let d = (forward - strike) / std_dev;
    w * (forward - strike) * norm_cdf(w * d) + std_dev * norm_pdf(d)
}

/// ∂price/∂σ of the Bachelier price, identical for calls and puts.
pub fn bachelier_vega(forward: f64, strike: f64, expiry: f64, volatility: f64) -> f64 {
    let sqrt_t = expiry.max(0.0).sqrt();
    let std_dev = volatility * sqrt_t;
    if std_dev <= 0.0 {
        return 0.0;
    }
    sqrt_t * norm_pdf((forward - strike) / std_dev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_atm_price() {
        // ATM: σ√T/√(2π)
        let price = bachelier_price(0.02, 0.02, 4.0, 0.01, true);
        assert_relative_eq!(price, 0.02 / (2.0 * std::f64::consts::PI).sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn test_put_call_parity_negative_forward() {
        let (f, k) = (-0.003, 0.001);
        let call = bachelier_price(f, k, 2.0, 0.007, true);
        let put = bachelier_price(f, k, 2.0, 0.007, false);
        assert_relative_eq!(call - put, f - k, epsilon = 1e-15);
    }

    #[test]
    fn test_vega_matches_finite_difference() {
        let h = 1e-8;
        let fd = (bachelier_price(0.02, 0.025, 3.0, 0.008 + h, true)
            - bachelier_price(0.02, 0.025, 3.0, 0.008 - h, true))
            / (2.0 * h);
        assert_relative_eq!(bachelier_vega(0.02, 0.025, 3.0, 0.008), fd, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_volatility() {
        assert_relative_eq!(bachelier_price(0.03, 0.02, 1.0, 0.0, true), 0.01, epsilon = 1e-16);
        assert_eq!(bachelier_vega(0.03, 0.02, 1.0, 0.0), 0.0);
    }
}
