//! SABR smile with a power-law right tail.
//!
//! Below the cut-off strike prices follow SABR/Black. Above it the call
//! price is
//! ```text
//! f(K) = K^{-μ} · exp(a + b/K + c/K²)
//! ```
//! with `a`, `b`, `c` matching value, first and second strike derivative
//! of the SABR price at the cut-off. Prices are undiscounted with a unit
//! numeraire.

use crate::analytical::{black_price, black_price_adjoint, black_price_second_order};

use super::sabr::{hagan_volatility, hagan_volatility_adjoint, SabrPoint};
use super::ModelError;

/// Below this expiry the tail is flat at zero.
const SMALL_EXPIRY: f64 = 1e-6;
/// Prices and derivatives below this level give a zero tail.
const SMALL_PRICE: f64 = 1e-15;
/// Relative step of the central difference on `∂σ/∂K`.
const STRIKE_STEP: f64 = 1e-4;

/// SABR prices extrapolated beyond a cut-off strike.
#[derive(Debug, Clone, PartialEq)]
pub struct SabrExtrapolationRight {
    forward: f64,
    point: SabrPoint,
    cutoff: f64,
    expiry: f64,
    mu: f64,
    parameters: [f64; 3],
}

impl SabrExtrapolationRight {
    /// Fits the tail at `cutoff`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` unless forward, cut-off and `mu` are positive and
    /// the expiry non-negative.
    pub fn new(forward: f64, point: SabrPoint, cutoff: f64, expiry: f64, mu: f64) -> Result<Self, ModelError> {
        for (name, value) in [("forward", forward), ("cut-off strike", cutoff), ("mu", mu)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ModelError::InvalidParameter { name, value });
            }
        }
        if !(expiry >= 0.0) {
            return Err(ModelError::InvalidParameter {
                name: "expiry",
                value: expiry,
            });
        }
        let parameters = fit_tail(forward, &point, cutoff, expiry, mu);
        Ok(Self {
            forward,
            point,
            cutoff,
            expiry,
            mu,
            parameters,
        })
    }

    /// Cut-off strike.
    #[inline]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Tail decay exponent.
    #[inline]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Fitted `[a, b, c]`.
    #[inline]
    pub fn parameters(&self) -> [f64; 3] {
        self.parameters
    }

    /// Undiscounted option price.
    pub fn price(&self, strike: f64, is_call: bool) -> f64 {
        if strike <= self.cutoff {
            let vol = hagan_volatility(self.forward, strike, self.expiry, &self.point);
            return black_price(self.forward, strike, self.expiry, vol, is_call);
        }
        let call = self.tail(strike);
        if is_call {
            call
        } else {
            call - self.forward + strike
        }
    }

    /// `∂price/∂K`.
    pub fn price_strike_derivative(&self, strike: f64, is_call: bool) -> f64 {
        if strike <= self.cutoff {
            let smile = hagan_volatility_adjoint(self.forward, strike, self.expiry, &self.point);
            let black = black_price_adjoint(self.forward, strike, self.expiry, smile.volatility, is_call);
            return black.strike + black.volatility * smile.strike;
        }
        let [_, b, c] = self.parameters;
        let derivative = -self.tail(strike) * (self.mu + (b + 2.0 * c / strike) / strike) / strike;
        if is_call {
            derivative
        } else {
            derivative + 1.0
        }
    }

    fn tail(&self, strike: f64) -> f64 {
        let [a, b, c] = self.parameters;
        strike.powf(-self.mu) * (a + b / strike + c / (strike * strike)).exp()
    }
}

fn fit_tail(forward: f64, point: &SabrPoint, cutoff: f64, expiry: f64, mu: f64) -> [f64; 3] {
    const DEGENERATE: [f64; 3] = [-100.0, 0.0, 0.0];
    if expiry <= SMALL_EXPIRY {
        return DEGENERATE;
    }
    let smile = hagan_volatility_adjoint(forward, cutoff, expiry, point);
    let vol = hagan_volatility(forward, cutoff, expiry, point);
    let h = cutoff * STRIKE_STEP;
    let vol_kk = (hagan_volatility_adjoint(forward, cutoff + h, expiry, point).strike
        - hagan_volatility_adjoint(forward, cutoff - h, expiry, point).strike)
        / (2.0 * h);
    let black = black_price_second_order(forward, cutoff, expiry, vol, true);
    let p = black.price;
    let dp = black.strike + black.volatility * smile.strike;
    let d2p = black.strike_strike
        + 2.0 * black.strike_volatility * smile.strike
        + black.volatility_volatility * smile.strike * smile.strike
        + black.volatility * vol_kk;
    if !(p > SMALL_PRICE) || (dp.abs() < SMALL_PRICE && d2p.abs() < SMALL_PRICE) {
        return DEGENERATE;
    }
    let k = cutoff;
    let r1 = dp / p;
    let r2 = d2p / p - r1 * r1;
    let first = -k * k * (r1 + mu / k);
    let second = k * k * k * (r2 - mu / (k * k)) / 2.0;
    let c = k * (second - first);
    let b = 3.0 * first - 2.0 * second;
    let a = p.ln() + mu * k.ln() - b / k - c / (k * k);
    [a, b, c]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const POINT: SabrPoint = SabrPoint {
        alpha: 0.05,
        beta: 0.5,
        rho: -0.25,
        nu: 0.5,
    };

    fn smile() -> SabrExtrapolationRight {
        SabrExtrapolationRight::new(0.03, POINT, 0.08, 5.0, 2.5).unwrap()
    }

    #[test]
    fn test_matches_sabr_below_cutoff() {
        let s = smile();
        for k in [0.01, 0.03, 0.06, 0.08] {
            let vol = hagan_volatility(0.03, k, 5.0, &POINT);
            assert_relative_eq!(s.price(k, true), black_price(0.03, k, 5.0, vol, true), max_relative = 1e-14);
        }
    }

    #[test]
    fn test_smooth_at_cutoff() {
        let s = smile();
        let k = s.cutoff();
        let eps = 1e-7;
        for is_call in [true, false] {
            assert_relative_eq!(s.price(k - eps, is_call), s.price(k + eps, is_call), max_relative = 1e-5);
            assert_relative_eq!(
                s.price_strike_derivative(k - eps, is_call),
                s.price_strike_derivative(k + eps, is_call),
                max_relative = 1e-4
            );
        }
    }

    #[test]
    fn test_tail_decays() {
        let s = smile();
        let prices: Vec<f64> = [0.1, 0.2, 0.4, 0.8].iter().map(|&k| s.price(k, true)).collect();
        assert!(prices.windows(2).all(|w| w[1] < w[0] && w[1] > 0.0));
    }

    #[test]
    fn test_strike_derivative_matches_finite_difference() {
        let s = smile();
        let h = 1e-6;
        for k in [0.05, 0.12] {
            for is_call in [true, false] {
                let fd = (s.price(k + h, is_call) - s.price(k - h, is_call)) / (2.0 * h);
                assert_relative_eq!(s.price_strike_derivative(k, is_call), fd, max_relative = 1e-4);
            }
        }
    }

    #[test]
    fn test_put_call_parity_in_tail() {
        let s = smile();
        let k = 0.15;
        assert_relative_eq!(s.price(k, true) - s.price(k, false), 0.03 - k, epsilon = 1e-14);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(SabrExtrapolationRight::new(0.03, POINT, 0.0, 5.0, 2.5).is_err());
        assert!(SabrExtrapolationRight::new(0.03, POINT, 0.08, 5.0, -1.0).is_err());
        assert!(SabrExtrapolationRight::new(0.03, POINT, 0.08, f64::NAN, 2.5).is_err());
    }

    #[test]
    fn test_zero_expiry_tail() {
        let s = SabrExtrapolationRight::new(0.03, POINT, 0.08, 0.0, 2.5).unwrap();
        assert_eq!(s.parameters(), [-100.0, 0.0, 0.0]);
    }
}
