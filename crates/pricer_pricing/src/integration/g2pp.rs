//! G2++ European swaptions by two-dimensional integration.
//!
//! With `x = L z`, `L Lᵀ = Γ(0, θ)` and `z` standard normal, the outer
//! integral runs over `z₁`. For each `z₁` the exercise boundary in `z₂` is
//! located by root search and only the exercised side is integrated.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::math::quadrature::GaussLegendre;
use pricer_core::math::solvers::{BrentSolver, SolverConfig};
use pricer_core::sensitivity::CurrencyAmount;
use pricer_core::types::PricingError;
use pricer_models::instruments::rates::{FixedIborSwap, Swaption};
use pricer_models::models::g2pp::{cholesky, factor_covariance};
use pricer_models::models::G2ppParameters;

use super::{standard_density, IntegrationConfig};
use crate::analytical::g2pp::{bond_factor, loadings};
use crate::cash::CashSettledLegs;
use crate::method::{check_market, european_only, long_sign, SwaptionPricer};

const METHOD: &str = "G2++ integration";

/// Gaussian factors of the model at expiry.
struct FactorMap {
    gamma: [[f64; 2]; 2],
    chol: [[f64; 2]; 2],
}

impl FactorMap {
    fn new(params: &G2ppParameters, expiry: f64) -> Self {
        let gamma = factor_covariance(params, 0.0, expiry);
        Self {
            gamma,
            chol: cholesky(&gamma),
        }
    }

    #[inline]
    fn x(&self, z1: f64, z2: f64) -> [f64; 2] {
        [self.chol[0][0] * z1, self.chol[1][0] * z1 + self.chol[1][1] * z2]
    }

    fn factors(&self, alphas: &[[f64; 2]], x: &[f64; 2]) -> Vec<f64> {
        alphas.iter().map(|a| bond_factor(a, &self.gamma, x)).collect()
    }
}

/// G2++ swaptions priced by numerical integration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwaptionG2ppIntegrationMethod {
    config: IntegrationConfig,
}

impl SwaptionG2ppIntegrationMethod {
    /// Method with the given discretisation; the Bermudan grid fields are
    /// not used.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the configuration is invalid.
    pub fn new(config: IntegrationConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The discretisation.
    #[inline]
    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Present value of a physical or cash-settled European.
    pub fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &G2ppParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        check_market(swaption, curves)?;
        let rule = self.config.rule()?;
        let value = match swaption {
            Swaption::Physical(s) => self.physical(&rule, s.underlying(), s.expiry_time(), curves, params)?,
            Swaption::Cash(s) => self.cash(&rule, s.underlying(), s.expiry_time(), curves, params)?,
            Swaption::Bermudan(_) => return Err(european_only(METHOD)),
        };
        Ok(CurrencyAmount::new(
            swaption.currency(),
            long_sign(swaption.is_long()) * value,
        ))
    }

    fn physical(
        &self,
        rule: &GaussLegendre,
        swap: &FixedIborSwap,
        expiry: f64,
        curves: &YieldCurveBundle,
        params: &G2ppParameters,
    ) -> Result<f64, PricingError> {
        let legs = CashSettledLegs::new(swap, curves)?;
        let map = FactorMap::new(params, expiry);
        let alpha_fixed = loadings(params, expiry, &legs.fixed_times);
        let alpha_ibor = loadings(params, expiry, &legs.ibor_times);
        // Holder value per unit notional: ±(floating − K·annuity).
        let direction = if legs.is_payer { 1.0 } else { -1.0 };
        let value = |x: &[f64; 2]| -> f64 {
            let floating: f64 = legs
                .ibor_discounted
                .iter()
                .zip(&alpha_ibor)
                .map(|(c, a)| c * bond_factor(a, &map.gamma, x))
                .sum();
            let annuity: f64 = legs
                .fixed_discounted
                .iter()
                .zip(&alpha_fixed)
                .map(|(d, a)| d * bond_factor(a, &map.gamma, x))
                .sum();
            direction * (floating - legs.strike * annuity)
        };
        let expectation = self.exercised_expectation(rule, &map, &value, &value)?;
        Ok(legs.notional * expectation)
    }

    fn cash(
        &self,
        rule: &GaussLegendre,
        swap: &FixedIborSwap,
        expiry: f64,
        curves: &YieldCurveBundle,
        params: &G2ppParameters,
    ) -> Result<f64, PricingError> {
        let legs = CashSettledLegs::new(swap, curves)?;
        let map = FactorMap::new(params, expiry);
        let alpha_fixed = loadings(params, expiry, &legs.fixed_times);
        let alpha_ibor = loadings(params, expiry, &legs.ibor_times);
        let alpha_settlement = loadings(params, expiry, &[legs.settlement_time])[0];
        let direction = if legs.is_payer { 1.0 } else { -1.0 };
        let rate = |x: &[f64; 2]| legs.rate(&map.factors(&alpha_fixed, x), &map.factors(&alpha_ibor, x));
        let moneyness = |x: &[f64; 2]| direction * (rate(x) - legs.strike);
        let settled = |x: &[f64; 2]| bond_factor(&alpha_settlement, &map.gamma, x) * legs.payoff(rate(x));
        let expectation = self.exercised_expectation(rule, &map, &moneyness, &settled)?;
        Ok(legs.settlement_discount * expectation)
    }

    /// `E[payoff(x) · 1{exercise(x) > 0}]` for `x` with covariance `Γ`.
    fn exercised_expectation(
        &self,
        rule: &GaussLegendre,
        map: &FactorMap,
        exercise: &dyn Fn(&[f64; 2]) -> f64,
        payoff: &dyn Fn(&[f64; 2]) -> f64,
    ) -> Result<f64, PricingError> {
        let range = self.config.range;
        let panels = self.config.panels;
        let solver = BrentSolver::new(SolverConfig::new(1e-12, 200));
        let mut outer = 0.0;
        for k in 0..panels {
            let width = 2.0 * range / panels as f64;
            let lo = -range + width * k as f64;
            for (z1, w1) in rule.mapped(lo, lo + width) {
                let boundary = |z2: f64| exercise(&map.x(z1, z2));
                let (low, high) = (boundary(-range), boundary(range));
                let region = if low > 0.0 && high > 0.0 {
                    Some((-range, range))
                } else if low <= 0.0 && high <= 0.0 {
                    None
                } else {
                    let root = solver.find_root(boundary, -range, range)?;
                    if high > 0.0 {
                        Some((root, range))
                    } else {
                        Some((-range, root))
                    }
                };
                if let Some((a, b)) = region {
                    let inner = rule.integrate_composite(
                        |z2| payoff(&map.x(z1, z2)) * standard_density(z2),
                        a,
                        b,
                        panels,
                    );
                    outer += w1 * standard_density(z1) * inner;
                }
            }
        }
        Ok(outer)
    }
}

impl SwaptionPricer for SwaptionG2ppIntegrationMethod {
    type Parameters = G2ppParameters;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &G2ppParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        SwaptionG2ppIntegrationMethod::present_value(self, swaption, curves, params)
    }
}
