//! G2++ Monte Carlo for European swaptions.
//!
//! Two independent normals per path are mapped to the correlated factors
//! at expiry by the Cholesky factor of their covariance.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::sensitivity::CurrencyAmount;
use pricer_core::types::PricingError;
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::g2pp::{cholesky, factor_covariance};
use pricer_models::models::G2ppParameters;

use super::simulation::{estimate, MonteCarloEstimate};
use super::MonteCarloConfig;
use crate::analytical::g2pp::{bond_factor, loadings};
use crate::cash::CashSettledLegs;
use crate::method::{check_market, european_only, long_sign, SwaptionPricer};
use crate::rng::{NormalGenerator, PricerRng};

const METHOD: &str = "G2++ Monte Carlo";

/// G2++ swaptions priced by simulation of the two factors at expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct G2ppMonteCarloMethod {
    config: MonteCarloConfig,
}

impl G2ppMonteCarloMethod {
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
        params: &G2ppParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        let mut rng = PricerRng::from_seed(self.config.seed());
        self.present_value_with(swaption, curves, params, &mut rng)
    }

    /// Present value drawing from `generator`.
    pub fn present_value_with<G: NormalGenerator + ?Sized>(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &G2ppParameters,
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
        params: &G2ppParameters,
        generator: &mut G,
    ) -> Result<MonteCarloEstimate, PricingError> {
        check_market(swaption, curves)?;
        let (swap, expiry, is_cash) = match swaption {
            Swaption::Physical(s) => (s.underlying(), s.expiry_time(), false),
            Swaption::Cash(s) => (s.underlying(), s.expiry_time(), true),
            Swaption::Bermudan(_) => return Err(european_only(METHOD)),
        };
        tracing::debug!(
            paths = self.config.n_paths(),
            seed = self.config.seed(),
            antithetic = self.config.antithetic(),
            cash = is_cash,
            "G2++ Monte Carlo"
        );
        let legs = CashSettledLegs::new(swap, curves)?;
        let gamma = factor_covariance(params, 0.0, expiry);
        let l = cholesky(&gamma);
        let alpha_fixed = loadings(params, expiry, &legs.fixed_times);
        let alpha_ibor = loadings(params, expiry, &legs.ibor_times);
        let alpha_settlement = loadings(params, expiry, &[legs.settlement_time])[0];
        let direction = if legs.is_payer { 1.0 } else { -1.0 };
        let result = estimate(&self.config, generator, 2, |z| {
            let x = [l[0][0] * z[0], l[1][0] * z[0] + l[1][1] * z[1]];
            let floating: f64 = legs
                .ibor_discounted
                .iter()
                .zip(&alpha_ibor)
                .map(|(c, a)| c * bond_factor(a, &gamma, &x))
                .sum();
            let annuity: f64 = legs
                .fixed_discounted
                .iter()
                .zip(&alpha_fixed)
                .map(|(d, a)| d * bond_factor(a, &gamma, &x))
                .sum();
            if is_cash {
                bond_factor(&alpha_settlement, &gamma, &x) * legs.payoff(floating / annuity)
            } else {
                legs.notional * (direction * (floating - legs.strike * annuity)).max(0.0)
            }
        });
        let discount = if is_cash { legs.settlement_discount } else { 1.0 };
        Ok(result.scaled(discount * long_sign(swaption.is_long())))
    }
}

impl SwaptionPricer for G2ppMonteCarloMethod {
    type Parameters = G2ppParameters;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &G2ppParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        G2ppMonteCarloMethod::present_value(self, swaption, curves, params)
    }
}
