//! Hull-White one-factor closed forms for European swaptions.
//!
//! Physical delivery is exact: with `κ` the exercise boundary of the
//! Gaussian factor,
//! ```text
//! PV = Σ dcf_i N(ω(κ + α_i))
//! ```
//! with `ω = -1` for a payer and `+1` for a receiver. Cash settlement
//! expands the settlement payoff to third order in the factor around zero
//! and integrates the expansion on the exercise region.

use pricer_core::market_data::{YieldCurve, YieldCurveBundle};
use pricer_core::sensitivity::{CurrencyAmount, CurveSensitivity};
use pricer_core::types::PricingError;
use pricer_models::analytical::{norm_cdf, norm_pdf};
use pricer_models::instruments::rates::{FixedIborSwap, Swaption};
use pricer_models::models::hull_white::{alpha, alpha_volatility_adjoint, kappa, swap_rate_derivatives};
use pricer_models::models::HullWhiteParameters;

use crate::cash::CashSettledLegs;
use crate::finite_difference::swaption_curve_sensitivity;
use crate::method::{check_market, european_only, long_sign, SwaptionPricer};

const METHOD: &str = "Hull-White method";
/// Zero-rate bump of the cash-settled curve sensitivity.
const CURVE_SHIFT: f64 = 1e-6;
/// Below this factor volatility the option is worth its intrinsic value.
const MIN_ALPHA: f64 = 1e-12;

/// Discounted cash-flow equivalents with their factor loadings.
#[derive(Debug)]
pub(crate) struct PhysicalSetup {
    pub times: Vec<f64>,
    pub amounts: Vec<f64>,
    pub discounts: Vec<f64>,
    pub alphas: Vec<f64>,
}

impl PhysicalSetup {
    pub(crate) fn new(
        swap: &FixedIborSwap,
        expiry: f64,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
    ) -> Result<Self, PricingError> {
        let cfe = swap.cash_flow_equivalents(curves)?;
        let funding = curves.curve(swap.funding_curve())?;
        let discounts = cfe
            .times()
            .iter()
            .map(|&t| funding.discount_factor(t))
            .collect::<Result<Vec<_>, _>>()?;
        let alphas = cfe.times().iter().map(|&t| alpha(params, 0.0, expiry, expiry, t)).collect();
        Ok(Self {
            times: cfe.times().to_vec(),
            amounts: cfe.amounts().to_vec(),
            discounts,
            alphas,
        })
    }

    pub(crate) fn discounted(&self) -> Vec<f64> {
        self.amounts.iter().zip(&self.discounts).map(|(c, p)| c * p).collect()
    }

    pub(crate) fn is_degenerate(&self) -> bool {
        self.alphas.iter().all(|a| a.abs() < MIN_ALPHA)
    }

    /// Exercise boundary of the factor.
    pub(crate) fn kappa(&self) -> Result<f64, PricingError> {
        Ok(kappa(&self.discounted(), &self.alphas)?)
    }
}

/// `-1` for a payer, `+1` for a receiver.
#[inline]
pub(crate) fn omega(is_payer: bool) -> f64 {
    if is_payer {
        -1.0
    } else {
        1.0
    }
}

/// Physical price with the normal probabilities `N(ω(κ + α_i))`.
fn physical_price(setup: &PhysicalSetup, is_payer: bool) -> Result<(f64, Vec<f64>, f64), PricingError> {
    let dcf = setup.discounted();
    if setup.is_degenerate() {
        let value: f64 = dcf.iter().sum();
        let exercised = if value > 0.0 { 1.0 } else { 0.0 };
        return Ok((value.max(0.0), vec![exercised; dcf.len()], 0.0));
    }
    let k = setup.kappa()?;
    let w = omega(is_payer);
    let probabilities: Vec<f64> = setup.alphas.iter().map(|a| norm_cdf(w * (k + a))).collect();
    let price = dcf.iter().zip(&probabilities).map(|(d, n)| d * n).sum();
    Ok((price, probabilities, k))
}

/// Third-order expansion of the cash-settled receiver payoff, integrated
/// on the exercise region of the factor.
fn cash_price(legs: &CashSettledLegs<'_>, params: &HullWhiteParameters, expiry: f64, k: f64) -> f64 {
    let alpha_fixed: Vec<f64> = legs.fixed_times.iter().map(|&t| alpha(params, 0.0, expiry, expiry, t)).collect();
    let alpha_ibor: Vec<f64> = legs.ibor_times.iter().map(|&t| alpha(params, 0.0, expiry, expiry, t)).collect();
    let a = alpha(params, 0.0, expiry, expiry, legs.settlement_time);
    let [s, s1, s2, s3] =
        swap_rate_derivatives(0.0, &legs.fixed_discounted, &alpha_fixed, &legs.ibor_discounted, &alpha_ibor);
    let [c0, c1, c2, c3] = legs.cash_annuity_derivatives(s);
    let h = legs.strike - s;
    // Taylor coefficients of A(S(x))·(K − S(x)) at x = 0.
    let u0 = c0 * h;
    let u1 = h * c1 * s1 - c0 * s1;
    let u2 = h * (c1 * s2 + c2 * s1 * s1) - 2.0 * c1 * s1 * s1 - c0 * s2;
    let u3 = h * (c3 * s1 * s1 * s1 + 3.0 * c2 * s1 * s2 + c1 * s3)
        - 3.0 * c2 * s1 * s1 * s1
        - 6.0 * c1 * s1 * s2
        - c0 * s3;
    let kt = k + a;
    let normal_part = u0 - u1 * a + u2 * (1.0 + a * a) / 2.0 - u3 * (a * a * a + 3.0 * a) / 6.0;
    let density_part =
        -u1 - u2 * (kt - 2.0 * a) / 2.0 + u3 * (-3.0 * a * a + 3.0 * a * kt - kt * kt - 2.0) / 6.0;
    let expectation = if legs.is_payer {
        -normal_part * norm_cdf(-kt) + density_part * norm_pdf(kt)
    } else {
        normal_part * norm_cdf(kt) + density_part * norm_pdf(kt)
    };
    legs.notional * legs.settlement_discount * expectation
}

/// European swaptions in the Hull-White one-factor model.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwaptionHullWhiteMethod;

impl SwaptionHullWhiteMethod {
    /// Present value; cash settlement uses the third-order expansion.
    pub fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        check_market(swaption, curves)?;
        let sign = long_sign(swaption.is_long());
        let value = match swaption {
            Swaption::Physical(s) => {
                let setup = PhysicalSetup::new(s.underlying(), s.expiry_time(), curves, params)?;
                physical_price(&setup, s.is_call())?.0
            }
            Swaption::Cash(s) => {
                let setup = PhysicalSetup::new(s.underlying(), s.expiry_time(), curves, params)?;
                let legs = CashSettledLegs::new(s.underlying(), curves)?;
                if setup.is_degenerate() {
                    let rate = legs.rate(&vec![1.0; legs.fixed_times.len()], &vec![1.0; legs.ibor_times.len()]);
                    legs.settlement_discount * legs.payoff(rate)
                } else {
                    cash_price(&legs, params, s.expiry_time(), setup.kappa()?)
                }
            }
            Swaption::Bermudan(_) => return Err(european_only(METHOD)),
        };
        Ok(CurrencyAmount::new(swaption.currency(), sign * value))
    }

    /// Curve sensitivity. Exact for physical delivery; cash settlement
    /// differentiates the expansion numerically.
    pub fn present_value_curve_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
    ) -> Result<CurveSensitivity, PricingError> {
        check_market(swaption, curves)?;
        match swaption {
            Swaption::Physical(s) => {
                let swap = s.underlying();
                let setup = PhysicalSetup::new(swap, s.expiry_time(), curves, params)?;
                let (_, probabilities, _) = physical_price(&setup, s.is_call())?;
                let amount_sensitivities = swap.cash_flow_equivalents_curve_sensitivity(curves)?;
                let mut funding = Vec::with_capacity(setup.times.len());
                let mut result = CurveSensitivity::new();
                for (i, &t) in setup.times.iter().enumerate() {
                    let weight = probabilities[i];
                    funding.push((t, -t * setup.discounts[i] * setup.amounts[i] * weight));
                    result = result.plus(&amount_sensitivities[i].multiplied_by(setup.discounts[i] * weight));
                }
                Ok(result
                    .plus(&CurveSensitivity::of(swap.funding_curve(), funding))
                    .multiplied_by(long_sign(s.is_long())))
            }
            Swaption::Cash(_) => swaption_curve_sensitivity(swaption, curves, CURVE_SHIFT, |bumped| {
                Ok(self.present_value(swaption, bumped, params)?.amount())
            }),
            Swaption::Bermudan(_) => Err(european_only(METHOD)),
        }
    }

    /// Sensitivity to each piecewise volatility, physical delivery only.
    pub fn present_value_hull_white_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
    ) -> Result<Vec<f64>, PricingError> {
        check_market(swaption, curves)?;
        let s = match swaption {
            Swaption::Physical(s) => s,
            _ => {
                return Err(PricingError::UnsupportedInstrument(
                    "Hull-White volatility sensitivity needs a physically settled European".to_string(),
                ))
            }
        };
        let expiry = s.expiry_time();
        let setup = PhysicalSetup::new(s.underlying(), expiry, curves, params)?;
        let mut result = vec![0.0; params.volatilities().len()];
        if setup.is_degenerate() {
            return Ok(result);
        }
        let k = setup.kappa()?;
        let w = omega(s.is_call());
        let sign = long_sign(s.is_long());
        for (i, &t) in setup.times.iter().enumerate() {
            let (a, derivatives) = alpha_volatility_adjoint(params, 0.0, expiry, expiry, t);
            let weight = sign * setup.amounts[i] * setup.discounts[i] * w * norm_pdf(k + a);
            for (r, d) in result.iter_mut().zip(&derivatives) {
                *r += weight * d;
            }
        }
        Ok(result)
    }
}

impl SwaptionPricer for SwaptionHullWhiteMethod {
    type Parameters = HullWhiteParameters;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        SwaptionHullWhiteMethod::present_value(self, swaption, curves, params)
    }
}
