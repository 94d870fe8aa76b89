//! Black (lognormal forward) option formulas.
//!
//! All prices are undiscounted and per unit numeraire: the swaption
//! methods multiply by the annuity (physical delivery) or the discounted
//! cash annuity (cash settlement).
//!
//! ## Formulas
//!
//! **Call**: F·N(d1) − K·N(d2)
//! **Put**: K·N(−d2) − F·N(−d1)
//!
//! with d1 = (ln(F/K) + σ²T/2)/(σ√T) and d2 = d1 − σ√T.

use pricer_core::math::solvers::{BrentSolver, SolverConfig};
use pricer_core::types::SolverError;

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;

/// Below this total standard deviation the price is the intrinsic value.
const MIN_STD_DEV: f64 = 1e-14;

const MAX_IMPLIED_VOLATILITY: f64 = 10.0;

/// Black price with its first order derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackAdjoint {
    /// Undiscounted option price.
    pub price: f64,
    /// ∂price/∂forward
    pub forward: f64,
    /// ∂price/∂strike
    pub strike: f64,
    /// ∂price/∂volatility
    pub volatility: f64,
}

/// Strike and volatility derivatives up to second order.
///
/// Used to match a tail parametrisation in value, slope and curvature at
/// a cut-off strike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackSecondOrder {
    /// Undiscounted option price.
    pub price: f64,
    /// ∂price/∂K
    pub strike: f64,
    /// ∂²price/∂K²
    pub strike_strike: f64,
    /// ∂price/∂σ
    pub volatility: f64,
    /// ∂²price/∂σ²
    pub volatility_volatility: f64,
    /// ∂²price/∂K∂σ
    pub strike_volatility: f64,
}

#[inline]
fn omega(is_call: bool) -> f64 {
    if is_call {
        1.0
    } else {
        -1.0
    }
}

#[inline]
fn intrinsic(forward: f64, strike: f64, is_call: bool) -> f64 {
    (omega(is_call) * (forward - strike)).max(0.0)
}

/// Undiscounted Black price.
///
/// A non-positive strike makes the call a forward and the put worthless;
/// a zero total standard deviation gives the intrinsic value.
///
/// # Examples
///
/// ```
/// use pricer_models::analytical::black_price;
///
/// let call = black_price(0.03, 0.03, 5.0, 0.2, true);
/// let put = black_price(0.03, 0.03, 5.0, 0.2, false);
/// assert!((call - put).abs() < 1e-15);
/// assert!(call > 0.0);
/// ```
pub fn black_price(forward: f64, strike: f64, expiry: f64, volatility: f64, is_call: bool) -> f64 {
    black_price_adjoint(forward, strike, expiry, volatility, is_call).price
}

/// Black price with forward, strike and volatility derivatives.
pub fn black_price_adjoint(
    forward: f64,
    strike: f64,
    expiry: f64,
    volatility: f64,
    is_call: bool,
) -> BlackAdjoint {
    let w = omega(is_call);
    if strike <= 0.0 {
        return if is_call {
            BlackAdjoint {
                price: forward - strike,
                forward: 1.0,
                strike: -1.0,
                volatility: 0.0,
            }
        } else {
            BlackAdjoint {
                price: 0.0,
                forward: 0.0,
                strike: 0.0,
                volatility: 0.0,
            }
        };
    }
    let sqrt_t = expiry.max(0.0).sqrt();
    let std_dev = volatility * sqrt_t;
    if std_dev < MIN_STD_DEV || forward <= 0.0 {
        let in_the_money = if w * (forward - strike) > 0.0 { 1.0 } else { 0.0 };
        return BlackAdjoint {
            price: intrinsic(forward, strike, is_call),
            forward: w * in_the_money,
            strike: -w * in_the_money,
            volatility: 0.0,
        };
    }
    let d1 = ((forward / strike).ln() + 0.5 * std_dev * std_dev) / std_dev;
    let d2 = d1 - std_dev;
    let n1 = norm_cdf(w * d1);
    let n2 = norm_cdf(w * d2);
    BlackAdjoint {
        price: w * (forward * n1 - strike * n2),
        forward: w * n1,
        strike: -w * n2,
        volatility: forward * norm_pdf(d1) * sqrt_t,
    }
}

/// Black price with second order strike/volatility derivatives.
///
/// Requires positive forward, strike, expiry and volatility.
pub fn black_price_second_order(
    forward: f64,
    strike: f64,
    expiry: f64,
    volatility: f64,
    is_call: bool,
) -> BlackSecondOrder {
    let w = omega(is_call);
    let sqrt_t = expiry.sqrt();
    let std_dev = volatility * sqrt_t;
    let d1 = ((forward / strike).ln() + 0.5 * std_dev * std_dev) / std_dev;
    let d2 = d1 - std_dev;
    let pdf2 = norm_pdf(d2);
    let vega = forward * norm_pdf(d1) * sqrt_t;
    BlackSecondOrder {
        price: w * (forward * norm_cdf(w * d1) - strike * norm_cdf(w * d2)),
        strike: -w * norm_cdf(w * d2),
        strike_strike: pdf2 / (strike * std_dev),
        volatility: vega,
        volatility_volatility: vega * d1 * d2 / volatility,
        strike_volatility: pdf2 * d1 / volatility,
    }
}

/// Black volatility reproducing an undiscounted option price.
///
/// # Errors
///
/// - `AnalyticalError::PriceOutOfBounds` when the price is below intrinsic
///   value or above the forward (call) / strike (put)
/// - `AnalyticalError::NumericalInstability` if the root search fails
///
/// # Examples
///
/// ```
/// use pricer_models::analytical::{black_implied_volatility, black_price};
///
/// let price = black_price(0.04, 0.035, 2.0, 0.25, false);
/// let vol = black_implied_volatility(price, 0.04, 0.035, 2.0, false).unwrap();
/// assert!((vol - 0.25).abs() < 1e-8);
/// ```
pub fn black_implied_volatility(
    price: f64,
    forward: f64,
    strike: f64,
    expiry: f64,
    is_call: bool,
) -> Result<f64, AnalyticalError> {
    let lower = intrinsic(forward, strike, is_call);
    let upper = if is_call { forward } else { strike };
    if !(price >= lower && price < upper) || expiry <= 0.0 {
        return Err(AnalyticalError::PriceOutOfBounds {
            price,
            lower,
            upper,
        });
    }
    if price == lower {
        return Ok(0.0);
    }
    let solver = BrentSolver::new(SolverConfig::new(1e-12, 200));
    solver
        .find_root_bracketed(
            |vol| Ok::<_, SolverError>(black_price(forward, strike, expiry, vol, is_call) - price),
            0.05,
            0.5,
            0.0,
            MAX_IMPLIED_VOLATILITY,
        )
        .map_err(|err| AnalyticalError::NumericalInstability {
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_put_call_parity() {
        let (f, k, t, vol) = (0.035, 0.0325, 5.0, 0.2);
        let call = black_price(f, k, t, vol, true);
        let put = black_price(f, k, t, vol, false);
        assert_relative_eq!(call - put, f - k, epsilon = 1e-15);
    }

    #[test]
    fn test_zero_volatility_is_intrinsic() {
        assert_relative_eq!(black_price(0.04, 0.03, 1.0, 0.0, true), 0.01, epsilon = 1e-16);
        assert_eq!(black_price(0.04, 0.03, 1.0, 0.0, false), 0.0);
        let adj = black_price_adjoint(0.04, 0.03, 1.0, 0.0, true);
        assert_eq!((adj.forward, adj.strike, adj.volatility), (1.0, -1.0, 0.0));
    }

    #[test]
    fn test_negative_strike() {
        assert_relative_eq!(black_price(0.01, -0.01, 1.0, 0.3, true), 0.02, epsilon = 1e-16);
        assert_eq!(black_price(0.01, -0.01, 1.0, 0.3, false), 0.0);
    }

    #[test]
    fn test_adjoint_matches_finite_differences() {
        let (f, k, t, vol) = (0.03, 0.034, 4.0, 0.22);
        let h = 1e-7;
        for &is_call in &[true, false] {
            let adj = black_price_adjoint(f, k, t, vol, is_call);
            let dfwd = (black_price(f + h, k, t, vol, is_call) - black_price(f - h, k, t, vol, is_call)) / (2.0 * h);
            let dk = (black_price(f, k + h, t, vol, is_call) - black_price(f, k - h, t, vol, is_call)) / (2.0 * h);
            let dvol = (black_price(f, k, t, vol + h, is_call) - black_price(f, k, t, vol - h, is_call)) / (2.0 * h);
            assert_relative_eq!(adj.forward, dfwd, epsilon = 1e-7);
            assert_relative_eq!(adj.strike, dk, epsilon = 1e-7);
            assert_relative_eq!(adj.volatility, dvol, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_second_order_matches_finite_differences() {
        let (f, k, t, vol) = (0.03, 0.05, 5.0, 0.25);
        let h = 1e-5;
        let so = black_price_second_order(f, k, t, vol, true);
        let dk = |k: f64, vol: f64| black_price_adjoint(f, k, t, vol, true).strike;
        let vega = |vol: f64| black_price_adjoint(f, k, t, vol, true).volatility;
        assert_relative_eq!(so.strike_strike, (dk(k + h, vol) - dk(k - h, vol)) / (2.0 * h), max_relative = 1e-5);
        assert_relative_eq!(so.strike_volatility, (dk(k, vol + h) - dk(k, vol - h)) / (2.0 * h), max_relative = 1e-5);
        assert_relative_eq!(so.volatility_volatility, (vega(vol + h) - vega(vol - h)) / (2.0 * h), max_relative = 1e-5);
    }

    #[test]
    fn test_implied_volatility_out_of_bounds() {
        assert!(matches!(
            black_implied_volatility(0.05, 0.04, 0.03, 1.0, true),
            Err(AnalyticalError::PriceOutOfBounds { .. })
        ));
        assert!(black_implied_volatility(0.001, 0.04, 0.03, 1.0, true).is_err());
    }

    proptest! {
        #[test]
        fn prop_implied_volatility_inverts_price(
            vol in 0.05f64..1.0,
            moneyness in 0.7f64..1.4,
            expiry in 0.25f64..10.0,
            is_call in any::<bool>()
        ) {
            let forward = 0.03;
            let strike = forward * moneyness;
            let price = black_price(forward, strike, expiry, vol, is_call);
            prop_assume!(price - intrinsic(forward, strike, is_call) > 1e-10);
            let implied = black_implied_volatility(price, forward, strike, expiry, is_call).unwrap();
            prop_assert!((implied - vol).abs() < 1e-6);
        }
    }
}
