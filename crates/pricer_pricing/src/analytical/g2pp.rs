//! G2++ swaption approximation.
//!
//! The swap rate at expiry is a smooth function `S(X)` of the Gaussian
//! factors. It is linearised at the mean `X̄` of the factors under the
//! annuity measure; the projected rate is normal with variance
//! `∇S(X̄)ᵀ Γ ∇S(X̄)` and the option is priced with the Bachelier formula.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::sensitivity::CurrencyAmount;
use pricer_core::types::PricingError;
use pricer_models::analytical::bachelier_price;
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::g2pp::{factor_covariance, maturity_loadings, quadratic_form};
use pricer_models::models::G2ppParameters;

use crate::cash::CashSettledLegs;
use crate::finite_difference::parameter_sensitivity;
use crate::method::{EuropeanTerms, SwaptionPricer};

const METHOD: &str = "G2++ approximation";
/// Volatility bump of the parameter sensitivity.
const VOLATILITY_SHIFT: f64 = 1e-6;

/// Loadings `α(t) = H(t) − H(θ)` of the bonds at `times` seen from `expiry`.
pub(crate) fn loadings(params: &G2ppParameters, expiry: f64, times: &[f64]) -> Vec<[f64; 2]> {
    let base = maturity_loadings(params, &[expiry])[0];
    maturity_loadings(params, times)
        .into_iter()
        .map(|h| [h[0] - base[0], h[1] - base[1]])
        .collect()
}

/// `exp(−αᵀx − αᵀΓα/2)`.
#[inline]
pub(crate) fn bond_factor(alpha: &[f64; 2], gamma: &[[f64; 2]; 2], x: &[f64; 2]) -> f64 {
    (-alpha[0] * x[0] - alpha[1] * x[1] - 0.5 * quadratic_form(alpha, gamma, alpha)).exp()
}

/// Normal volatility of the swap rate of `legs` under the annuity measure.
fn normal_volatility(legs: &CashSettledLegs<'_>, params: &G2ppParameters, expiry: f64) -> f64 {
    let gamma = factor_covariance(params, 0.0, expiry);
    let alpha_fixed = loadings(params, expiry, &legs.fixed_times);
    let alpha_ibor = loadings(params, expiry, &legs.ibor_times);
    let total: f64 = legs.fixed_discounted.iter().sum();
    let mut beta_bar = [0.0; 2];
    for (d, b) in legs.fixed_discounted.iter().zip(&alpha_fixed) {
        beta_bar[0] += d / total * b[0];
        beta_bar[1] += d / total * b[1];
    }
    let x_bar = [
        -(gamma[0][0] * beta_bar[0] + gamma[0][1] * beta_bar[1]),
        -(gamma[1][0] * beta_bar[0] + gamma[1][1] * beta_bar[1]),
    ];
    let mut floating = 0.0;
    let mut floating_gradient = [0.0; 2];
    for (c, a) in legs.ibor_discounted.iter().zip(&alpha_ibor) {
        let term = c * bond_factor(a, &gamma, &x_bar);
        floating += term;
        floating_gradient[0] -= a[0] * term;
        floating_gradient[1] -= a[1] * term;
    }
    let mut annuity = 0.0;
    let mut annuity_gradient = [0.0; 2];
    for (d, b) in legs.fixed_discounted.iter().zip(&alpha_fixed) {
        let term = d * bond_factor(b, &gamma, &x_bar);
        annuity += term;
        annuity_gradient[0] -= b[0] * term;
        annuity_gradient[1] -= b[1] * term;
    }
    let gradient = [
        (floating_gradient[0] * annuity - floating * annuity_gradient[0]) / (annuity * annuity),
        (floating_gradient[1] * annuity - floating * annuity_gradient[1]) / (annuity * annuity),
    ];
    let variance = quadratic_form(&gradient, &gamma, &gradient);
    if expiry > 0.0 {
        (variance.max(0.0) / expiry).sqrt()
    } else {
        0.0
    }
}

/// European swaptions in G2++ by the projected normal approximation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwaptionG2ppApproximationMethod;

impl SwaptionG2ppApproximationMethod {
    /// Present value.
    pub fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &G2ppParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        let terms = EuropeanTerms::new(swaption, curves, METHOD)?;
        let legs = CashSettledLegs::new(terms.swap, curves)?;
        let vol = normal_volatility(&legs, params, terms.expiry);
        let price = bachelier_price(terms.forward, terms.strike, terms.expiry, vol, terms.is_call);
        Ok(terms.present_value(price))
    }

    /// Normal volatility implied by the approximation.
    pub fn implied_normal_volatility(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &G2ppParameters,
    ) -> Result<f64, PricingError> {
        let terms = EuropeanTerms::new(swaption, curves, METHOD)?;
        let legs = CashSettledLegs::new(terms.swap, curves)?;
        Ok(normal_volatility(&legs, params, terms.expiry))
    }

    /// Sensitivity to each piecewise volatility of both factors.
    pub fn present_value_g2pp_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &G2ppParameters,
    ) -> Result<[Vec<f64>; 2], PricingError> {
        EuropeanTerms::new(swaption, curves, METHOD)?;
        let pieces = params.number_of_pieces();
        let all = parameter_sensitivity(
            params,
            2 * pieces,
            VOLATILITY_SHIFT,
            |p, i, h| p.with_bumped_knot(i / pieces, i % pieces, h),
            |p| Ok(self.present_value(swaption, curves, p)?.amount()),
        )?;
        Ok([all[..pieces].to_vec(), all[pieces..].to_vec()])
    }
}

impl SwaptionPricer for SwaptionG2ppApproximationMethod {
    type Parameters = G2ppParameters;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &G2ppParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        SwaptionG2ppApproximationMethod::present_value(self, swaption, curves, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{cash, curves, g2pp, physical};
    use approx::assert_relative_eq;

    #[test]
    fn test_payer_receiver_parity() {
        let (c, p) = (curves(), g2pp());
        let m = SwaptionG2ppApproximationMethod;
        let payer = m.present_value(&physical(true, true), &c, &p).unwrap().amount();
        let receiver = m.present_value(&physical(false, true), &c, &p).unwrap().amount();
        let swap = physical(true, true).underlying().present_value(&c).unwrap().amount();
        assert_relative_eq!(payer - receiver, swap, max_relative = 1e-9);
    }

    #[test]
    fn test_volatility_is_positive_and_scales() {
        let (c, p) = (curves(), g2pp());
        let m = SwaptionG2ppApproximationMethod;
        let swaption = physical(true, true);
        let vol = m.implied_normal_volatility(&swaption, &c, &p).unwrap();
        assert!(vol > 0.001 && vol < 0.02);
        let [v0, v1] = p.volatilities().clone();
        let double = |v: Vec<f64>| v.into_iter().map(|x| 2.0 * x).collect::<Vec<f64>>();
        let doubled = G2ppParameters::new(
            p.mean_reversions(),
            [double(v0), double(v1)],
            p.knot_times().to_vec(),
            p.correlation(),
        )
        .unwrap();
        let vol2 = m.implied_normal_volatility(&swaption, &c, &doubled).unwrap();
        assert_relative_eq!(vol2, 2.0 * vol, max_relative = 1e-2);
    }

    #[test]
    fn test_sensitivity_shape() {
        let (c, p) = (curves(), g2pp());
        let m = SwaptionG2ppApproximationMethod;
        let [first, second] = m.present_value_g2pp_sensitivity(&cash(false, true), &c, &p).unwrap();
        assert_eq!(first.len(), p.number_of_pieces());
        assert_eq!(second.len(), p.number_of_pieces());
        assert!(first.iter().sum::<f64>() > 0.0);
    }
}
