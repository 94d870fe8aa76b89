//! Cash-settled swaptions in Gaussian factor models.
//!
//! With bond prices at expiry written as
//! `P(θ, t) = P(0, t)/P(0, θ) · e_t(X)` for a model-specific factor `e_t`,
//! the swap rate at expiry is
//! ```text
//! S(X) = Σ c_i e_{t_i}(X) / Σ d_j e_{t_j}(X)
//! ```
//! and the present value is `N · P(0, t_s) · E[e_{t_s}(X) A(S) (ω(S − K))⁺]`.

use pricer_core::market_data::{YieldCurve, YieldCurveBundle};
use pricer_core::types::PricingError;
use pricer_models::instruments::rates::FixedIborSwap;

/// The discounted legs of a cash-settled swaption per unit notional.
#[derive(Debug, Clone)]
pub(crate) struct CashSettledLegs<'a> {
    swap: &'a FixedIborSwap,
    pub notional: f64,
    pub strike: f64,
    pub is_payer: bool,
    pub settlement_time: f64,
    pub settlement_discount: f64,
    pub fixed_times: Vec<f64>,
    /// `|N_j|/N · δ_j · P(0, t_j)`.
    pub fixed_discounted: Vec<f64>,
    pub ibor_times: Vec<f64>,
    /// Ibor cash-flow equivalents times `P(0, t_i)`, positive first amount.
    pub ibor_discounted: Vec<f64>,
}

impl<'a> CashSettledLegs<'a> {
    pub(crate) fn new(swap: &'a FixedIborSwap, curves: &YieldCurveBundle) -> Result<Self, PricingError> {
        let funding = curves.curve(swap.funding_curve())?;
        let notional = swap.notional();
        let mut fixed_times = Vec::with_capacity(swap.fixed_leg().len());
        let mut fixed_discounted = Vec::with_capacity(swap.fixed_leg().len());
        for c in swap.fixed_leg() {
            let t = c.payment_time();
            fixed_times.push(t);
            fixed_discounted.push(c.notional().abs() / notional * c.accrual_factor() * funding.discount_factor(t)?);
        }
        let ibor_sign = match swap.ibor_leg().first() {
            Some(c) if c.notional() < 0.0 => -1.0,
            _ => 1.0,
        };
        let ibor = swap.with_fixed_rate(0.0).cash_flow_equivalents(curves)?;
        let ibor_discounted = ibor
            .times()
            .iter()
            .zip(ibor.amounts())
            .map(|(&t, &c)| Ok(ibor_sign * c / notional * funding.discount_factor(t)?))
            .collect::<Result<Vec<f64>, PricingError>>()?;
        let settlement_time = swap.settlement_time();
        Ok(Self {
            swap,
            notional,
            strike: swap.fixed_rate(),
            is_payer: swap.is_payer(),
            settlement_time,
            settlement_discount: funding.discount_factor(settlement_time)?,
            fixed_times,
            fixed_discounted,
            ibor_times: ibor.times().to_vec(),
            ibor_discounted,
        })
    }

    /// Swap rate given the model factors at the fixed and ibor times.
    pub(crate) fn rate(&self, fixed_factors: &[f64], ibor_factors: &[f64]) -> f64 {
        let floating: f64 = self.ibor_discounted.iter().zip(ibor_factors).map(|(c, e)| c * e).sum();
        let annuity: f64 = self.fixed_discounted.iter().zip(fixed_factors).map(|(d, e)| d * e).sum();
        floating / annuity
    }

    /// `N · A(S) · (ω(S − K))⁺`, paid at settlement.
    pub(crate) fn payoff(&self, rate: f64) -> f64 {
        let intrinsic = if self.is_payer {
            rate - self.strike
        } else {
            self.strike - rate
        };
        if intrinsic <= 0.0 {
            return 0.0;
        }
        self.notional * self.swap.cash_annuity(rate) * intrinsic
    }

    /// Cash annuity and its derivatives at `rate`.
    pub(crate) fn cash_annuity_derivatives(&self, rate: f64) -> [f64; 4] {
        self.swap.cash_annuity_derivatives(rate)
    }
}
