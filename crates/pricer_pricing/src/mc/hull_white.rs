//! Hull-White Monte Carlo for European swaptions.
//!
//! Under the forward measure of the expiry one standard normal per path
//! gives every bond at expiry exactly, so no time stepping is needed.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::sensitivity::{CurrencyAmount, CurveSensitivity};
use pricer_core::types::PricingError;
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::hull_white::alpha;
use pricer_models::models::HullWhiteParameters;

use super::simulation::{estimate, mean_vector, MonteCarloEstimate};
use super::MonteCarloConfig;
use crate::analytical::hull_white::PhysicalSetup;
use crate::cash::CashSettledLegs;
use crate::finite_difference::swaption_curve_sensitivity;
use crate::method::{check_market, european_only, long_sign, SwaptionPricer};
use crate::rng::{NormalGenerator, PricerRng};

const METHOD: &str = "Hull-White Monte Carlo";
const CURVE_SHIFT: f64 = 1e-6;

#[inline]
fn bond_factor(alpha: f64, x: f64) -> f64 {
    (-alpha * x - 0.5 * alpha * alpha).exp()
}

/// Hull-White swaptions priced by simulation of the Gaussian factor.
#[derive(Debug, Clone, PartialEq)]
pub struct HullWhiteMonteCarloMethod {
    config: MonteCarloConfig,
}

impl HullWhiteMonteCarloMethod {
    /// Method simulating with `config`.
    pub fn new(config: MonteCarloConfig) -> Self {
        Self { config }
    }

    /// The simulation configuration.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Present value with the seeded default generator.
    pub fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        let mut rng = PricerRng::from_seed(self.config.seed());
        self.present_value_with(swaption, curves, params, &mut rng)
    }

    /// Present value drawing from `generator`.
    pub fn present_value_with<G: NormalGenerator + ?Sized>(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
        generator: &mut G,
    ) -> Result<CurrencyAmount, PricingError> {
        let estimate = self.estimate_with(swaption, curves, params, generator)?;
        Ok(CurrencyAmount::new(swaption.currency(), estimate.value))
    }

    /// Present value with its standard error.
    pub fn estimate_with<G: NormalGenerator + ?Sized>(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
        generator: &mut G,
    ) -> Result<MonteCarloEstimate, PricingError> {
        check_market(swaption, curves)?;
        tracing::debug!(
            paths = self.config.n_paths(),
            seed = self.config.seed(),
            antithetic = self.config.antithetic(),
            "Hull-White Monte Carlo"
        );
        let sign = long_sign(swaption.is_long());
        let result = match swaption {
            Swaption::Physical(s) => {
                let setup = PhysicalSetup::new(s.underlying(), s.expiry_time(), curves, params)?;
                let dcf = setup.discounted();
                let alphas = &setup.alphas;
                estimate(&self.config, generator, 1, |z| {
                    dcf.iter()
                        .zip(alphas)
                        .map(|(d, a)| d * bond_factor(*a, z[0]))
                        .sum::<f64>()
                        .max(0.0)
                })
            }
            Swaption::Cash(s) => {
                let expiry = s.expiry_time();
                let legs = CashSettledLegs::new(s.underlying(), curves)?;
                let loadings = |times: &[f64]| -> Vec<f64> {
                    times.iter().map(|&t| alpha(params, 0.0, expiry, expiry, t)).collect()
                };
                let alpha_fixed = loadings(&legs.fixed_times);
                let alpha_ibor = loadings(&legs.ibor_times);
                let alpha_settlement = alpha(params, 0.0, expiry, expiry, legs.settlement_time);
                estimate(&self.config, generator, 1, |z| {
                    let x = z[0];
                    let fixed: Vec<f64> = alpha_fixed.iter().map(|a| bond_factor(*a, x)).collect();
                    let ibor: Vec<f64> = alpha_ibor.iter().map(|a| bond_factor(*a, x)).collect();
                    bond_factor(alpha_settlement, x) * legs.payoff(legs.rate(&fixed, &ibor))
                })
                .scaled(legs.settlement_discount)
            }
            Swaption::Bermudan(_) => return Err(european_only(METHOD)),
        };
        Ok(result.scaled(sign))
    }

    /// Curve sensitivity. Physical delivery differentiates each path;
    /// cash settlement bumps the curves and reuses the seed.
    pub fn present_value_curve_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
    ) -> Result<CurveSensitivity, PricingError> {
        check_market(swaption, curves)?;
        let s = match swaption {
            Swaption::Physical(s) => s,
            Swaption::Cash(_) => {
                return swaption_curve_sensitivity(swaption, curves, CURVE_SHIFT, |bumped| {
                    Ok(self.present_value(swaption, bumped, params)?.amount())
                })
            }
            Swaption::Bermudan(_) => return Err(european_only(METHOD)),
        };
        let swap = s.underlying();
        let setup = PhysicalSetup::new(swap, s.expiry_time(), curves, params)?;
        let dcf = setup.discounted();
        let alphas = &setup.alphas;
        let mut rng = PricerRng::from_seed(self.config.seed());
        // E[1{exercise} · e_i(x)] for each cash flow.
        let weights = mean_vector(&self.config, &mut rng, 1, alphas.len(), |z| {
            let factors: Vec<f64> = alphas.iter().map(|a| bond_factor(*a, z[0])).collect();
            let value: f64 = dcf.iter().zip(&factors).map(|(d, e)| d * e).sum();
            if value > 0.0 {
                factors
            } else {
                vec![0.0; factors.len()]
            }
        });
        let amount_sensitivities = swap.cash_flow_equivalents_curve_sensitivity(curves)?;
        let mut funding = Vec::with_capacity(setup.times.len());
        let mut result = CurveSensitivity::new();
        for (i, &t) in setup.times.iter().enumerate() {
            funding.push((t, -t * setup.discounts[i] * setup.amounts[i] * weights[i]));
            result = result.plus(&amount_sensitivities[i].multiplied_by(setup.discounts[i] * weights[i]));
        }
        Ok(result
            .plus(&CurveSensitivity::of(swap.funding_curve(), funding))
            .multiplied_by(long_sign(s.is_long())))
    }
}

impl SwaptionPricer for HullWhiteMonteCarloMethod {
    type Parameters = HullWhiteParameters;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        HullWhiteMonteCarloMethod::present_value(self, swaption, curves, params)
    }
}
