//! LMM-DD Monte Carlo for European swaptions.
//!
//! The displaced rates `ln(L_j + a_j)` are stepped with a log-Euler
//! scheme from today to the expiry under the forward measure of the last
//! model time `T_N`, where
//! ```text
//! d ln(L_j + a_j) = (μ_j − |σ_j|²/2) dt + σ_j · dW,   σ_j(t) = e^{amr·t} γ_j
//! μ_j = −Σ_{k>j} δ_k (L_k + a_k)/(1 + δ_k L_k) σ_k · σ_j
//! ```
//! Bonds at expiry follow from `P(θ, T_j)/P(θ, T_N) = Π_{k≥j} (1 + δ_k L_k)`.

use pricer_core::market_data::{YieldCurve, YieldCurveBundle};
use pricer_core::sensitivity::CurrencyAmount;
use pricer_core::types::PricingError;
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::lmm_dd::TIME_TOLERANCE;
use pricer_models::models::LmmDdParameters;

use super::simulation::{estimate, MonteCarloEstimate};
use super::MonteCarloConfig;
use crate::cash::CashSettledLegs;
use crate::method::{check_market, european_only, long_sign, SwaptionPricer};
use crate::rng::{NormalGenerator, PricerRng};

const METHOD: &str = "LMM Monte Carlo";

/// Payoff of a path as a function of `P(θ, T_j)/P(θ, T_N)` for the
/// simulated model times.
enum Exercise<'a> {
    Physical {
        indices: Vec<usize>,
        amounts: Vec<f64>,
    },
    Cash {
        legs: CashSettledLegs<'a>,
        fixed: Vec<(usize, f64)>,
        ibor: Vec<(usize, f64)>,
        settlement: usize,
    },
}

/// The simulated part of the model, from the first period the swap needs.
struct Simulation<'a> {
    params: &'a LmmDdParameters,
    start: usize,
    initial: Vec<f64>,
    expiry: f64,
    steps: usize,
}

impl Simulation<'_> {
    fn periods(&self) -> usize {
        self.initial.len()
    }

    /// Bond ratios `P(θ, T_j)/P(θ, T_N)` for `j = start..=N`, relative to `start`.
    fn ratios(&self, z: &[f64]) -> Vec<f64> {
        let n = self.periods();
        let m = self.params.number_of_factors();
        let deltas = &self.params.accrual_factors()[self.start..];
        let displacements = &self.params.displacements()[self.start..];
        let gammas = &self.params.volatilities()[self.start..];
        let amr = self.params.mean_reversion();
        let h = self.expiry / self.steps as f64;
        let sqrt_h = h.sqrt();

        let mut y: Vec<f64> = self
            .initial
            .iter()
            .zip(displacements)
            .map(|(l, a)| (l + a).ln())
            .collect();
        let mut running = vec![0.0; m];
        for step in 0..self.steps {
            let scale = (amr * step as f64 * h).exp();
            let dw = &z[step * m..(step + 1) * m];
            let libors: Vec<f64> = y.iter().zip(displacements).map(|(v, a)| v.exp() - a).collect();
            running.iter_mut().for_each(|r| *r = 0.0);
            for j in (0..n).rev() {
                let gamma = &gammas[j];
                let coupling: f64 = running.iter().zip(gamma).map(|(r, g)| r * g).sum();
                let norm: f64 = gamma.iter().map(|g| g * g).sum();
                let shock: f64 = gamma.iter().zip(dw).map(|(g, w)| g * w).sum();
                y[j] += (-coupling - 0.5 * norm) * scale * scale * h + scale * shock * sqrt_h;
                let weight = deltas[j] * (libors[j] + displacements[j]) / (1.0 + deltas[j] * libors[j]);
                for (r, g) in running.iter_mut().zip(gamma) {
                    *r += weight * g;
                }
            }
        }

        let mut ratios = vec![1.0; n + 1];
        for j in (0..n).rev() {
            let libor = y[j].exp() - displacements[j];
            ratios[j] = ratios[j + 1] * (1.0 + deltas[j] * libor);
        }
        ratios
    }
}

/// European swaptions priced by simulating the LMM-DD forward rates.
#[derive(Debug, Clone, PartialEq)]
pub struct LmmMonteCarloMethod {
    config: MonteCarloConfig,
}

impl LmmMonteCarloMethod {
    /// Method simulating with `config`; `n_steps` is the number of
    /// Euler steps to the expiry.
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
        params: &LmmDdParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        let mut rng = PricerRng::from_seed(self.config.seed());
        self.present_value_with(swaption, curves, params, &mut rng)
    }

    /// Present value drawing from `generator`.
    pub fn present_value_with<G: NormalGenerator + ?Sized>(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &LmmDdParameters,
        generator: &mut G,
    ) -> Result<CurrencyAmount, PricingError> {
        let estimate = self.estimate_with(swaption, curves, params, generator)?;
        Ok(CurrencyAmount::new(swaption.currency(), estimate.value))
    }

    /// Present value with its standard error.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if a cash flow is not on the model grid or falls
    /// before the expiry; `UnsupportedInstrument` for a Bermudan.
    pub fn estimate_with<G: NormalGenerator + ?Sized>(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &LmmDdParameters,
        generator: &mut G,
    ) -> Result<MonteCarloEstimate, PricingError> {
        check_market(swaption, curves)?;
        let (swap, expiry) = match swaption {
            Swaption::Physical(s) => (s.underlying(), s.expiry_time()),
            Swaption::Cash(s) => (s.underlying(), s.expiry_time()),
            Swaption::Bermudan(_) => return Err(european_only(METHOD)),
        };
        let index = |t: f64| -> Result<usize, PricingError> {
            params
                .time_index(t)
                .ok_or_else(|| PricingError::InvalidInput(format!("time {t:.4} is not an LMM ibor time")))
        };
        let funding = curves.curve(swap.funding_curve())?;
        let (exercise, mut first) = match swaption {
            Swaption::Cash(_) => {
                let legs = CashSettledLegs::new(swap, curves)?;
                let undiscount = |times: &[f64], values: &[f64]| -> Result<Vec<(usize, f64)>, PricingError> {
                    times
                        .iter()
                        .zip(values)
                        .map(|(&t, &v)| Ok((index(t)?, v / funding.discount_factor(t)?)))
                        .collect()
                };
                let fixed = undiscount(&legs.fixed_times, &legs.fixed_discounted)?;
                let ibor = undiscount(&legs.ibor_times, &legs.ibor_discounted)?;
                let settlement = index(legs.settlement_time)?;
                let first = fixed
                    .iter()
                    .chain(&ibor)
                    .map(|(i, _)| *i)
                    .fold(settlement, usize::min);
                (Exercise::Cash { legs, fixed, ibor, settlement }, first)
            }
            _ => {
                let cfe = swap.cash_flow_equivalents(curves)?;
                let indices = cfe.times().iter().map(|&t| index(t)).collect::<Result<Vec<_>, _>>()?;
                let first = indices.iter().copied().min().unwrap_or(0);
                (
                    Exercise::Physical {
                        indices,
                        amounts: cfe.amounts().to_vec(),
                    },
                    first,
                )
            }
        };
        let times = params.ibor_times();
        if times[first] < expiry - TIME_TOLERANCE {
            return Err(PricingError::InvalidInput(format!(
                "cash flow at {:.4} before expiry {expiry:.4}",
                times[first]
            )));
        }
        first = first.min(times.len() - 2);
        let last = times.len() - 1;
        let discounts = times[first..=last]
            .iter()
            .map(|&t| funding.discount_factor(t))
            .collect::<Result<Vec<f64>, _>>()?;
        let initial: Vec<f64> = params.accrual_factors()[first..]
            .iter()
            .enumerate()
            .map(|(j, d)| (discounts[j] / discounts[j + 1] - 1.0) / d)
            .collect();
        let simulation = Simulation {
            params,
            start: first,
            initial,
            expiry,
            steps: self.config.n_steps(),
        };
        tracing::debug!(
            paths = self.config.n_paths(),
            steps = self.config.n_steps(),
            seed = self.config.seed(),
            periods = simulation.periods(),
            "LMM Monte Carlo"
        );
        let dim = self.config.n_steps() * params.number_of_factors();
        let result = estimate(&self.config, generator, dim, |z| {
            let ratios = simulation.ratios(z);
            match &exercise {
                Exercise::Physical { indices, amounts } => indices
                    .iter()
                    .zip(amounts)
                    .map(|(&i, c)| c * ratios[i - first])
                    .sum::<f64>()
                    .max(0.0),
                Exercise::Cash {
                    legs,
                    fixed,
                    ibor,
                    settlement,
                } => {
                    let annuity: f64 = fixed.iter().map(|&(i, d)| d * ratios[i - first]).sum();
                    let floating: f64 = ibor.iter().map(|&(i, c)| c * ratios[i - first]).sum();
                    ratios[settlement - first] * legs.payoff(floating / annuity)
                }
            }
        });
        let terminal = discounts[discounts.len() - 1];
        Ok(result.scaled(terminal * long_sign(swaption.is_long())))
    }
}

impl SwaptionPricer for LmmMonteCarloMethod {
    type Parameters = LmmDdParameters;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &LmmDdParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        LmmMonteCarloMethod::present_value(self, swaption, curves, params)
    }
}
