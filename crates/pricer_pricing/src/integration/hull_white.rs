//! Hull-White swaptions by integration over the Gaussian factor.
//!
//! Under the forward measure of the expiry the bonds are
//! `P(θ, t) = P(0, t)/P(0, θ) · exp(−α_t x − α_t²/2)` with `x ~ N(0, 1)`;
//! European prices integrate the exercised swap value against `φ(x)`.
//!
//! Bermudans are valued under the forward measure of the last cash flow
//! `M`. With `y(t)` the centred Gaussian state of variance
//! `V(t) = ∫_0^t σ(s)² e^{2as} ds`,
//! ```text
//! P(t, T)/P(t, M) = P(0, T)/P(0, M) · exp(g_T y − g_T² V(t)/2),
//! g_T = (e^{−aT} − e^{−aM})/a
//! ```
//! and the deflated option value is rolled back on a grid of `y`.

use pricer_core::market_data::{CurveEnum, YieldCurve, YieldCurveBundle};
use pricer_core::math::quadrature::GaussLegendre;
use pricer_core::sensitivity::CurrencyAmount;
use pricer_core::types::PricingError;
use pricer_models::instruments::rates::{FixedIborSwap, Swaption};
use pricer_models::models::hull_white::{alpha, factor_variance};
use pricer_models::models::HullWhiteParameters;

use super::{standard_density, IntegrationConfig};
use crate::analytical::hull_white::PhysicalSetup;
use crate::cash::CashSettledLegs;
use crate::method::{check_market, long_sign, SwaptionPricer};
use crate::schedule::{decision_schedule, DecisionSchedule};

/// Below this variance the state does not move.
const MIN_VARIANCE: f64 = 1e-300;

#[inline]
fn bond_factor(alpha: f64, x: f64) -> f64 {
    (-alpha * x - 0.5 * alpha * alpha).exp()
}

/// Integration bounds of the exercised side of `kappa`.
fn exercise_region(is_payer: bool, kappa: f64, range: f64) -> (f64, f64) {
    let k = kappa.clamp(-range, range);
    if is_payer {
        (k, range)
    } else {
        (-range, k)
    }
}

/// Piecewise-constant Hull-White swaptions priced by numerical integration.
///
/// Handles physical and cash-settled Europeans and physically settled
/// Bermudans.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwaptionHullWhiteIntegrationMethod {
    config: IntegrationConfig,
}

impl SwaptionHullWhiteIntegrationMethod {
    /// Method with the given discretisation.
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

    /// Present value.
    pub fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        check_market(swaption, curves)?;
        let rule = self.config.rule()?;
        let value = match swaption {
            Swaption::Physical(s) => self.physical(&rule, s.underlying(), s.expiry_time(), curves, params)?,
            Swaption::Cash(s) => self.cash(&rule, s.underlying(), s.expiry_time(), curves, params)?,
            Swaption::Bermudan(s) => {
                let funding = curves.curve(swaption.underlying().funding_curve())?;
                let schedule = decision_schedule(swaption, curves)?;
                tracing::debug!(
                    decisions = s.expiry_times().len(),
                    grid_points = self.config.grid_points,
                    "Hull-White Bermudan backward recursion"
                );
                self.bermudan(&schedule, funding, params)?
            }
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
        params: &HullWhiteParameters,
    ) -> Result<f64, PricingError> {
        let setup = PhysicalSetup::new(swap, expiry, curves, params)?;
        let dcf = setup.discounted();
        if setup.is_degenerate() {
            return Ok(dcf.iter().sum::<f64>().max(0.0));
        }
        let (lo, hi) = exercise_region(swap.is_payer(), setup.kappa()?, self.config.range);
        let swap_value = |x: f64| -> f64 {
            dcf.iter()
                .zip(&setup.alphas)
                .map(|(d, a)| d * bond_factor(*a, x))
                .sum::<f64>()
        };
        Ok(rule.integrate_composite(|x| swap_value(x) * standard_density(x), lo, hi, self.config.panels))
    }

    fn cash(
        &self,
        rule: &GaussLegendre,
        swap: &FixedIborSwap,
        expiry: f64,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
    ) -> Result<f64, PricingError> {
        let setup = PhysicalSetup::new(swap, expiry, curves, params)?;
        let legs = CashSettledLegs::new(swap, curves)?;
        let loadings = |times: &[f64]| -> Vec<f64> { times.iter().map(|&t| alpha(params, 0.0, expiry, expiry, t)).collect() };
        let alpha_fixed = loadings(&legs.fixed_times);
        let alpha_ibor = loadings(&legs.ibor_times);
        let alpha_settlement = alpha(params, 0.0, expiry, expiry, legs.settlement_time);
        let factors = |alphas: &[f64], x: f64| -> Vec<f64> { alphas.iter().map(|a| bond_factor(*a, x)).collect() };
        let settled = |x: f64| -> f64 {
            let rate = legs.rate(&factors(&alpha_fixed, x), &factors(&alpha_ibor, x));
            bond_factor(alpha_settlement, x) * legs.payoff(rate)
        };
        if setup.is_degenerate() {
            return Ok(legs.settlement_discount * settled(0.0));
        }
        let (lo, hi) = exercise_region(legs.is_payer, setup.kappa()?, self.config.range);
        let expectation = rule.integrate_composite(|x| settled(x) * standard_density(x), lo, hi, self.config.panels);
        Ok(legs.settlement_discount * expectation)
    }

    /// Holder value of exercising into the schedule, before the long/short sign.
    pub(crate) fn bermudan(
        &self,
        schedule: &DecisionSchedule,
        funding: &CurveEnum<f64>,
        params: &HullWhiteParameters,
    ) -> Result<f64, PricingError> {
        if schedule.is_empty() {
            return Err(PricingError::InvalidInput("empty exercise schedule".to_string()));
        }
        let terminal = schedule.last_impact_time();
        let a = params.mean_reversion();
        let terminal_discount = funding.discount_factor(terminal)?;
        let loading = |t: f64| ((-a * t).exp() - (-a * terminal).exp()) / a;

        // Exercise value per unit of P(t, M) at each grid point.
        let mut grids = Vec::with_capacity(schedule.len());
        let mut exercise = Vec::with_capacity(schedule.len());
        let mut variances = Vec::with_capacity(schedule.len());
        for decision in schedule.decisions() {
            let variance = factor_variance(params, 0.0, decision.decision_time);
            let grid = self.grid(variance);
            let mut flows = Vec::with_capacity(decision.impact_times.len());
            for (&t, &c) in decision.impact_times.iter().zip(&decision.impact_amounts) {
                let g = loading(t);
                flows.push((c * funding.discount_factor(t)? / terminal_discount, g));
            }
            let values: Vec<f64> = grid
                .iter()
                .map(|&y| flows.iter().map(|(c, g)| c * (g * y - 0.5 * g * g * variance).exp()).sum())
                .collect();
            grids.push(grid);
            exercise.push(values);
            variances.push(variance);
        }

        let last = schedule.len() - 1;
        let mut values: Vec<f64> = exercise[last].iter().map(|v| v.max(0.0)).collect();
        for k in (0..last).rev() {
            let step = variances[k + 1] - variances[k];
            let continuation = if step <= MIN_VARIANCE {
                values
            } else {
                convolve(&grids[k], &grids[k + 1], &values, step)
            };
            let mut exercised = 0usize;
            values = exercise[k]
                .iter()
                .zip(&continuation)
                .map(|(&e, &c)| {
                    if e > c {
                        exercised += 1;
                        e
                    } else {
                        c
                    }
                })
                .collect();
            tracing::trace!(decision = k, exercised, "Bermudan exercise step");
        }
        let expectation = if variances[0] <= MIN_VARIANCE {
            values[self.config.grid_points / 2]
        } else {
            let sd = variances[0].sqrt();
            let (mass, total) = grids[0]
                .iter()
                .zip(&values)
                .enumerate()
                .fold((0.0, 0.0), |(m, t), (j, (&y, &v))| {
                    let w = trapezoid_weight(j, grids[0].len()) * standard_density(y / sd);
                    (m + w, t + w * v)
                });
            total / mass
        };
        Ok(terminal_discount * expectation)
    }

    fn grid(&self, variance: f64) -> Vec<f64> {
        let n = self.config.grid_points;
        let half = self.config.grid_range * variance.max(0.0).sqrt();
        (0..n)
            .map(|j| -half + 2.0 * half * j as f64 / (n - 1) as f64)
            .collect()
    }
}

#[inline]
fn trapezoid_weight(index: usize, len: usize) -> f64 {
    if index == 0 || index + 1 == len {
        0.5
    } else {
        1.0
    }
}

/// `E[v(y + √step·Z)]` at each point of `from`, with `v` sampled on `to`.
fn convolve(from: &[f64], to: &[f64], values: &[f64], step: f64) -> Vec<f64> {
    let scale = 0.5 / step;
    from.iter()
        .map(|&y| {
            let (mass, total) = to.iter().zip(values).enumerate().fold((0.0, 0.0), |(m, t), (j, (&z, &v))| {
                let w = trapezoid_weight(j, to.len()) * (-(z - y) * (z - y) * scale).exp();
                (m + w, t + w * v)
            });
            if mass > 0.0 {
                total / mass
            } else {
                0.0
            }
        })
        .collect()
}

impl SwaptionPricer for SwaptionHullWhiteIntegrationMethod {
    type Parameters = HullWhiteParameters;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &HullWhiteParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        SwaptionHullWhiteIntegrationMethod::present_value(self, swaption, curves, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytical::SwaptionHullWhiteMethod;
    use crate::test_support::{bermudan, cash, curves, hull_white, physical};
    use approx::assert_relative_eq;

    fn method() -> SwaptionHullWhiteIntegrationMethod {
        SwaptionHullWhiteIntegrationMethod::default()
    }

    #[test]
    fn test_physical_matches_closed_form() {
        let (c, p) = (curves(), hull_white());
        for swaption in [physical(true, true), physical(false, false)] {
            let integrated = method().present_value(&swaption, &c, &p).unwrap().amount();
            let closed = SwaptionHullWhiteMethod.present_value(&swaption, &c, &p).unwrap().amount();
            assert_relative_eq!(integrated, closed, epsilon = 1.0);
        }
    }

    #[test]
    fn test_cash_matches_expansion() {
        let (c, p) = (curves(), hull_white());
        for is_payer in [true, false] {
            let swaption = cash(is_payer, true);
            let integrated = method().present_value(&swaption, &c, &p).unwrap().amount();
            let expanded = SwaptionHullWhiteMethod.present_value(&swaption, &c, &p).unwrap().amount();
            assert!(integrated > 0.0);
            assert_relative_eq!(integrated, expanded, max_relative = 1e-2);
        }
    }

    #[test]
    fn test_single_decision_recursion_matches_closed_form() {
        let (c, p) = (curves(), hull_white());
        let swaption = physical(false, true);
        let schedule = decision_schedule(&swaption, &c).unwrap();
        let funding = c.curve("Funding").unwrap();
        let rolled = method().bermudan(&schedule, funding, &p).unwrap();
        let closed = SwaptionHullWhiteMethod.present_value(&swaption, &c, &p).unwrap().amount();
        assert_relative_eq!(rolled, closed, max_relative = 2e-3);
    }

    #[test]
    fn test_bermudan_dominates_its_europeans() {
        let (c, p) = (curves(), hull_white());
        for is_payer in [true, false] {
            let swaption = bermudan(is_payer, true);
            let value = method().present_value(&swaption, &c, &p).unwrap().amount();
            let Swaption::Bermudan(b) = &swaption else {
                unreachable!()
            };
            for i in 0..b.expiry_times().len() {
                let european: Swaption = b.european(i).unwrap().into();
                let e = SwaptionHullWhiteMethod.present_value(&european, &c, &p).unwrap().amount();
                assert!(value >= e * (1.0 - 1e-3), "decision {i}: {value} < {e}");
            }
        }
    }

    #[test]
    fn test_bermudan_long_short() {
        let (c, p) = (curves(), hull_white());
        let long = method().present_value(&bermudan(true, true), &c, &p).unwrap().amount();
        let short = method().present_value(&bermudan(true, false), &c, &p).unwrap().amount();
        assert_relative_eq!(long, -short, epsilon = 1e-2);
    }

    #[test]
    fn test_zero_volatility_bermudan_is_best_intrinsic() {
        let c = curves();
        let p = HullWhiteParameters::constant(0.01, 0.0).unwrap();
        let swaption = bermudan(true, true);
        let value = method().present_value(&swaption, &c, &p).unwrap().amount();
        let Swaption::Bermudan(b) = &swaption else {
            unreachable!()
        };
        let best = b
            .underlyings()
            .iter()
            .map(|s| s.present_value(&c).unwrap().amount())
            .fold(0.0, f64::max);
        assert_relative_eq!(value, best, max_relative = 1e-9);
    }

    #[test]
    fn test_invalid_config() {
        let config = IntegrationConfig {
            grid_points: 1,
            ..IntegrationConfig::default()
        };
        assert!(SwaptionHullWhiteIntegrationMethod::new(config).is_err());
    }
}
