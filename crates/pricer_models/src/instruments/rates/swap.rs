//! Fixed/ibor swap in time-indexed form and its curve analytics.
//!
//! The payer/receiver direction is carried by the notional signs: a payer
//! swap has negative fixed-leg notionals and positive ibor-leg notionals.
//!
//! Curve sensitivities are ∂/∂r(t) of continuously compounded zero rates,
//! so every discount factor P(t) contributes −t·P(t)·∂value/∂P.

use pricer_core::market_data::{YieldCurve, YieldCurveBundle};
use pricer_core::sensitivity::{CurrencyAmount, CurveSensitivity};
use pricer_core::types::{Currency, PricingError};

use super::coupon::{CouponFixed, CouponIbor};
use crate::instruments::InstrumentError;

/// Cash flows closer than this are merged into one equivalent.
const CASH_FLOW_TIME_TOLERANCE: f64 = 1e-10;

/// Deterministic cash flows with the same present value as a swap.
///
/// Under a deterministic spread between forward and funding curves an
/// ibor coupon is equivalent to a payment at its fixing period start and
/// one at its payment date, so a swap becomes a list of fixed amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowEquivalents {
    times: Vec<f64>,
    amounts: Vec<f64>,
}

impl CashFlowEquivalents {
    /// Payment times, strictly increasing.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Signed amounts, parallel to `times`.
    #[inline]
    pub fn amounts(&self) -> &[f64] {
        &self.amounts
    }

    /// Number of cash flows.
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether there is no cash flow.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

struct RawCashFlow {
    time: f64,
    amount: f64,
    sensitivity: CurveSensitivity,
}

/// A swap exchanging fixed coupons against ibor coupons.
///
/// # Example
///
/// ```
/// use pricer_models::instruments::rates::{CouponFixed, CouponIbor, FixedIborSwap, IborFixing};
/// use pricer_core::market_data::{CurveEnum, YieldCurveBundle};
/// use pricer_core::types::Currency;
///
/// let fixed = vec![CouponFixed::new(Currency::EUR, 1.0, "Funding", 1.0, -100.0, 0.04)];
/// let fixing = IborFixing {
///     fixing_time: 0.0,
///     start_time: 0.0,
///     end_time: 1.0,
///     accrual_factor: 1.0,
///     forward_curve: "Funding".to_string(),
/// };
/// let ibor = vec![CouponIbor::new(Currency::EUR, 1.0, "Funding", 1.0, 100.0, fixing, 0.0)];
/// let swap = FixedIborSwap::new(0.0, fixed, ibor).unwrap();
///
/// let curves = YieldCurveBundle::new().with_curve("Funding", CurveEnum::flat(0.03));
/// assert!(swap.is_payer());
/// let par = swap.par_rate(&curves).unwrap();
/// assert!((par - (0.03_f64.exp() - 1.0)).abs() < 1e-14);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixedIborSwap {
    settlement_time: f64,
    fixed_leg: Vec<CouponFixed>,
    ibor_leg: Vec<CouponIbor>,
}

impl FixedIborSwap {
    /// Creates a swap from its two legs.
    ///
    /// # Errors
    ///
    /// - `EmptyLeg` if the fixed leg is empty
    /// - `InvalidParameter` if currencies differ, payment times decrease or
    ///   both legs carry notionals of the same sign
    pub fn new(
        settlement_time: f64,
        fixed_leg: Vec<CouponFixed>,
        ibor_leg: Vec<CouponIbor>,
    ) -> Result<Self, InstrumentError> {
        let first = fixed_leg.first().ok_or(InstrumentError::EmptyLeg { leg: "fixed" })?;
        let currency = first.currency();
        if fixed_leg.iter().any(|c| c.currency() != currency)
            || ibor_leg.iter().any(|c| c.currency() != currency)
        {
            return Err(InstrumentError::InvalidParameter {
                message: "swap legs must share one currency".to_string(),
            });
        }
        if !non_decreasing(fixed_leg.iter().map(CouponFixed::payment_time))
            || !non_decreasing(ibor_leg.iter().map(CouponIbor::payment_time))
        {
            return Err(InstrumentError::InvalidParameter {
                message: "coupon payment times must be non-decreasing".to_string(),
            });
        }
        if let Some(ibor) = ibor_leg.first() {
            if ibor.notional() * first.notional() > 0.0 {
                return Err(InstrumentError::InvalidParameter {
                    message: "fixed and ibor notionals must have opposite signs".to_string(),
                });
            }
        }
        Ok(Self {
            settlement_time,
            fixed_leg,
            ibor_leg,
        })
    }

    /// Time at which the swap starts accruing.
    #[inline]
    pub fn settlement_time(&self) -> f64 {
        self.settlement_time
    }

    /// Fixed coupons in payment order.
    #[inline]
    pub fn fixed_leg(&self) -> &[CouponFixed] {
        &self.fixed_leg
    }

    /// Ibor coupons in payment order.
    #[inline]
    pub fn ibor_leg(&self) -> &[CouponIbor] {
        &self.ibor_leg
    }

    /// Currency of both legs.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.fixed_leg[0].currency()
    }

    /// Whether the fixed leg is paid.
    #[inline]
    pub fn is_payer(&self) -> bool {
        self.fixed_leg[0].notional() < 0.0
    }

    /// Rate of the first fixed coupon (the swaption strike).
    #[inline]
    pub fn fixed_rate(&self) -> f64 {
        self.fixed_leg[0].fixed_rate()
    }

    /// Absolute notional of the first fixed coupon.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.fixed_leg[0].notional().abs()
    }

    /// Discounting curve name.
    #[inline]
    pub fn funding_curve(&self) -> &str {
        self.fixed_leg[0].funding_curve()
    }

    /// Every curve name the swap needs.
    pub fn curve_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fixed_leg
            .iter()
            .map(CouponFixed::funding_curve)
            .chain(self.ibor_leg.iter().map(CouponIbor::funding_curve))
            .chain(self.ibor_leg.iter().map(|c| c.fixing().forward_curve.as_str()))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Last fixed payment time.
    #[inline]
    pub fn maturity_time(&self) -> f64 {
        self.fixed_leg[self.fixed_leg.len() - 1].payment_time()
    }

    /// Swap length used as the volatility lookup coordinate.
    #[inline]
    pub fn tenor_time(&self) -> f64 {
        self.maturity_time() - self.settlement_time
    }

    /// Number of fixed coupons per year, from the first accrual factor.
    pub fn fixed_frequency(&self) -> f64 {
        (1.0 / self.fixed_leg[0].accrual_factor()).round().max(1.0)
    }

    /// Present value of both legs.
    pub fn present_value(&self, curves: &YieldCurveBundle) -> Result<CurrencyAmount, PricingError> {
        let mut pv = 0.0;
        for c in &self.fixed_leg {
            pv += c.amount() * curves.curve(c.funding_curve())?.discount_factor(c.payment_time())?;
        }
        for c in &self.ibor_leg {
            let (forward, _) = c.forward_rate(curves)?;
            let df = curves.curve(c.funding_curve())?.discount_factor(c.payment_time())?;
            pv += c.notional() * c.accrual_factor() * (forward + c.spread()) * df;
        }
        Ok(CurrencyAmount::new(self.currency(), pv))
    }

    /// Curve sensitivity of the present value.
    pub fn present_value_curve_sensitivity(
        &self,
        curves: &YieldCurveBundle,
    ) -> Result<CurveSensitivity, PricingError> {
        let mut result = CurveSensitivity::new();
        for c in &self.fixed_leg {
            let t = c.payment_time();
            let df = curves.curve(c.funding_curve())?.discount_factor(t)?;
            result = result.plus(&CurveSensitivity::of(
                c.funding_curve(),
                vec![(t, -t * df * c.amount())],
            ));
        }
        for c in &self.ibor_leg {
            result = result.plus(&ibor_coupon_sensitivity(c, curves, c.notional())?);
        }
        Ok(result)
    }

    /// Annuity (present value of a basis point) Σ |N|·δ·P(t) of the fixed leg.
    pub fn annuity(&self, curves: &YieldCurveBundle) -> Result<f64, PricingError> {
        let mut annuity = 0.0;
        for c in &self.fixed_leg {
            let df = curves.curve(c.funding_curve())?.discount_factor(c.payment_time())?;
            annuity += c.notional().abs() * c.accrual_factor() * df;
        }
        Ok(annuity)
    }

    /// Curve sensitivity of the annuity.
    pub fn annuity_curve_sensitivity(
        &self,
        curves: &YieldCurveBundle,
    ) -> Result<CurveSensitivity, PricingError> {
        let mut result = CurveSensitivity::new();
        for c in &self.fixed_leg {
            let t = c.payment_time();
            let df = curves.curve(c.funding_curve())?.discount_factor(t)?;
            result = result.plus(&CurveSensitivity::of(
                c.funding_curve(),
                vec![(t, -t * df * c.notional().abs() * c.accrual_factor())],
            ));
        }
        Ok(result)
    }

    /// Present value of the ibor leg as received, per unit of sign.
    fn floating_value(&self, curves: &YieldCurveBundle) -> Result<f64, PricingError> {
        let mut value = 0.0;
        for c in &self.ibor_leg {
            let (forward, _) = c.forward_rate(curves)?;
            let df = curves.curve(c.funding_curve())?.discount_factor(c.payment_time())?;
            value += c.notional().abs() * c.accrual_factor() * (forward + c.spread()) * df;
        }
        Ok(value)
    }

    /// Par rate: the fixed rate giving a zero present value.
    pub fn par_rate(&self, curves: &YieldCurveBundle) -> Result<f64, PricingError> {
        Ok(self.floating_value(curves)? / self.annuity(curves)?)
    }

    /// Curve sensitivity of the par rate.
    pub fn par_rate_curve_sensitivity(
        &self,
        curves: &YieldCurveBundle,
    ) -> Result<CurveSensitivity, PricingError> {
        let annuity = self.annuity(curves)?;
        let par = self.floating_value(curves)? / annuity;
        let mut floating = CurveSensitivity::new();
        for c in &self.ibor_leg {
            floating = floating.plus(&ibor_coupon_sensitivity(c, curves, c.notional().abs())?);
        }
        Ok(floating
            .plus(&self.annuity_curve_sensitivity(curves)?.multiplied_by(-par))
            .multiplied_by(1.0 / annuity))
    }

    /// Cash annuity Σ_{i=1..n} (1/m)(1 + S/m)^−i used by cash settlement,
    /// with m the fixed frequency and n the number of fixed coupons.
    pub fn cash_annuity(&self, rate: f64) -> f64 {
        self.cash_annuity_derivatives(rate)[0]
    }

    /// Cash annuity and its first three derivatives with respect to the rate.
    pub fn cash_annuity_derivatives(&self, rate: f64) -> [f64; 4] {
        let m = self.fixed_frequency();
        let x = 1.0 + rate / m;
        let mut result = [0.0; 4];
        for i in 1..=self.fixed_leg.len() {
            let i = i as f64;
            let base = x.powf(-i) / m;
            result[0] += base;
            result[1] += -i / (m * x) * base;
            result[2] += i * (i + 1.0) / (m * m * x * x) * base;
            result[3] += -i * (i + 1.0) * (i + 2.0) / (m * m * m * x * x * x) * base;
        }
        result
    }

    fn raw_cash_flows(
        &self,
        curves: &YieldCurveBundle,
        with_sensitivity: bool,
    ) -> Result<Vec<RawCashFlow>, PricingError> {
        let mut flows = Vec::with_capacity(self.fixed_leg.len() + 2 * self.ibor_leg.len());
        for c in &self.fixed_leg {
            flows.push(RawCashFlow {
                time: c.payment_time(),
                amount: c.amount(),
                sensitivity: CurveSensitivity::new(),
            });
        }
        for c in &self.ibor_leg {
            let fixing = c.fixing();
            let funding = curves.curve(c.funding_curve())?;
            let (_, ratio) = c.forward_rate(curves)?;
            let (ts, te, tp) = (fixing.start_time, fixing.end_time, c.payment_time());
            let beta = ratio * funding.discount_factor(tp)? / funding.discount_factor(ts)?;
            let scale = c.notional() * c.accrual_factor() / fixing.accrual_factor;
            let start_amount = beta * scale;
            let sensitivity = if with_sensitivity {
                CurveSensitivity::of(
                    fixing.forward_curve.clone(),
                    vec![(ts, -ts * start_amount), (te, te * start_amount)],
                )
                .plus(&CurveSensitivity::of(
                    c.funding_curve(),
                    vec![(tp, -tp * start_amount), (ts, ts * start_amount)],
                ))
            } else {
                CurveSensitivity::new()
            };
            flows.push(RawCashFlow {
                time: ts,
                amount: start_amount,
                sensitivity,
            });
            flows.push(RawCashFlow {
                time: tp,
                amount: -scale + c.notional() * c.accrual_factor() * c.spread(),
                sensitivity: CurveSensitivity::new(),
            });
        }
        flows.sort_by(|a, b| a.time.total_cmp(&b.time));
        let mut merged: Vec<RawCashFlow> = Vec::with_capacity(flows.len());
        for flow in flows {
            match merged.last_mut() {
                Some(last) if (flow.time - last.time).abs() < CASH_FLOW_TIME_TOLERANCE => {
                    last.amount += flow.amount;
                    if with_sensitivity {
                        last.sensitivity = last.sensitivity.plus(&flow.sensitivity);
                    }
                }
                _ => merged.push(flow),
            }
        }
        Ok(merged)
    }

    /// Cash flow equivalents, sorted by time with coinciding flows merged.
    pub fn cash_flow_equivalents(
        &self,
        curves: &YieldCurveBundle,
    ) -> Result<CashFlowEquivalents, PricingError> {
        let flows = self.raw_cash_flows(curves, false)?;
        Ok(CashFlowEquivalents {
            times: flows.iter().map(|f| f.time).collect(),
            amounts: flows.iter().map(|f| f.amount).collect(),
        })
    }

    /// Curve sensitivity of each cash flow equivalent amount, parallel to
    /// [`FixedIborSwap::cash_flow_equivalents`].
    pub fn cash_flow_equivalents_curve_sensitivity(
        &self,
        curves: &YieldCurveBundle,
    ) -> Result<Vec<CurveSensitivity>, PricingError> {
        Ok(self
            .raw_cash_flows(curves, true)?
            .into_iter()
            .map(|f| f.sensitivity)
            .collect())
    }

    /// The swap without the coupons accruing before `time`.
    ///
    /// Ibor coupons accrue from their fixing period start. Fixed periods are
    /// contiguous: each accrues from the previous payment, the first from
    /// the settlement.
    ///
    /// # Errors
    ///
    /// `EmptyLeg` if no fixed coupon is left.
    pub fn trimmed_before(&self, time: f64) -> Result<Self, InstrumentError> {
        let cut = time - CASH_FLOW_TIME_TOLERANCE;
        let fixed_leg = self
            .fixed_leg
            .iter()
            .enumerate()
            .filter(|(i, _)| self.fixed_accrual_start(*i) >= cut)
            .map(|(_, c)| c.clone())
            .collect();
        let ibor_leg = self
            .ibor_leg
            .iter()
            .filter(|c| c.fixing().start_time >= cut)
            .cloned()
            .collect();
        Self::new(self.settlement_time.max(time), fixed_leg, ibor_leg)
    }

    /// Accrual start of the fixed coupon at `index`.
    pub fn fixed_accrual_start(&self, index: usize) -> f64 {
        index
            .checked_sub(1)
            .and_then(|i| self.fixed_leg.get(i))
            .map_or(self.settlement_time, CouponFixed::payment_time)
    }

    /// The swap without the coupons paid after `time`.
    ///
    /// # Errors
    ///
    /// `EmptyLeg` if no fixed coupon is left.
    pub fn trimmed_after(&self, time: f64) -> Result<Self, InstrumentError> {
        let cut = time + CASH_FLOW_TIME_TOLERANCE;
        Self::new(
            self.settlement_time,
            self.fixed_leg.iter().filter(|c| c.payment_time() <= cut).cloned().collect(),
            self.ibor_leg.iter().filter(|c| c.payment_time() <= cut).cloned().collect(),
        )
    }

    /// The swap with every fixed coupon at `rate`.
    pub fn with_fixed_rate(&self, rate: f64) -> Self {
        Self {
            settlement_time: self.settlement_time,
            fixed_leg: self.fixed_leg.iter().map(|c| c.with_rate(rate)).collect(),
            ibor_leg: self.ibor_leg.clone(),
        }
    }

    /// The swap with every notional scaled by `factor` (negative flips the direction).
    pub fn with_scaled_notional(&self, factor: f64) -> Self {
        Self {
            settlement_time: self.settlement_time,
            fixed_leg: self.fixed_leg.iter().map(|c| c.with_scaled_notional(factor)).collect(),
            ibor_leg: self.ibor_leg.iter().map(|c| c.with_scaled_notional(factor)).collect(),
        }
    }
}

fn non_decreasing(times: impl Iterator<Item = f64>) -> bool {
    let times: Vec<f64> = times.collect();
    times.windows(2).all(|w| w[0] <= w[1])
}

/// Curve sensitivity of N·δ·(F + s)·P(t_p) for one ibor coupon.
fn ibor_coupon_sensitivity(
    coupon: &CouponIbor,
    curves: &YieldCurveBundle,
    notional: f64,
) -> Result<CurveSensitivity, PricingError> {
    let fixing = coupon.fixing();
    let tp = coupon.payment_time();
    let df = curves.curve(coupon.funding_curve())?.discount_factor(tp)?;
    let (forward, ratio) = coupon.forward_rate(curves)?;
    let funding = CurveSensitivity::of(
        coupon.funding_curve(),
        vec![(tp, -tp * df * notional * coupon.accrual_factor() * (forward + coupon.spread()))],
    );
    let dforward = notional * coupon.accrual_factor() * df * ratio / fixing.accrual_factor;
    let forward = CurveSensitivity::of(
        fixing.forward_curve.clone(),
        vec![
            (fixing.start_time, -fixing.start_time * dforward),
            (fixing.end_time, fixing.end_time * dforward),
        ],
    );
    Ok(funding.plus(&forward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::rates::coupon::IborFixing;
    use approx::assert_relative_eq;
    use pricer_core::market_data::CurveEnum;

    fn curves() -> YieldCurveBundle {
        YieldCurveBundle::new()
            .with_curve("Funding", CurveEnum::flat(0.05))
            .with_curve("Forward", CurveEnum::flat(0.04))
    }

    /// 2Y payer swap, fixed semi-annual, ibor quarterly, starting at 1.0.
    fn swap(rate: f64) -> FixedIborSwap {
        let notional = 1e6;
        let fixed = (1..=4)
            .map(|i| {
                CouponFixed::new(Currency::EUR, 1.0 + 0.5 * i as f64, "Funding", 0.5, -notional, rate)
            })
            .collect();
        let ibor = (0..8)
            .map(|i| {
                let start = 1.0 + 0.25 * i as f64;
                let fixing = IborFixing {
                    fixing_time: start - 0.01,
                    start_time: start,
                    end_time: start + 0.25,
                    accrual_factor: 0.25,
                    forward_curve: "Forward".to_string(),
                };
                CouponIbor::new(Currency::EUR, start + 0.25, "Funding", 0.25, notional, fixing, 0.0)
            })
            .collect();
        FixedIborSwap::new(1.0, fixed, ibor).unwrap()
    }

    fn bumped_curves(name: &str, t: f64, shift: f64) -> YieldCurveBundle {
        let times = [0.5, 1.0, 1.25, 1.5, 1.75, 2.0, 2.25, 2.5, 2.75, 3.0];
        let base = curves();
        let curve = base.curve(name).unwrap().with_nodes(&times).unwrap();
        let bumped = curve.with_single_shift(t, shift).unwrap();
        let mut result = base.clone();
        for other in ["Funding", "Forward"] {
            let c = base.curve(other).unwrap().with_nodes(&times).unwrap();
            result = result.with_replaced(other, c).unwrap();
        }
        result.with_replaced(name, bumped).unwrap()
    }

    #[test]
    fn test_pv_at_par_rate_is_zero() {
        let s = swap(0.03);
        let par = s.par_rate(&curves()).unwrap();
        let pv = s.with_fixed_rate(par).present_value(&curves()).unwrap();
        assert_relative_eq!(pv.amount(), 0.0, epsilon = 1e-8);
        assert_eq!(pv.currency(), Currency::EUR);
    }

    #[test]
    fn test_payer_pv_is_annuity_times_rate_gap() {
        let s = swap(0.03);
        let c = curves();
        let expected = (s.par_rate(&c).unwrap() - 0.03) * s.annuity(&c).unwrap();
        assert_relative_eq!(s.present_value(&c).unwrap().amount(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_cash_flow_equivalents_reprice_swap() {
        let s = swap(0.035);
        let c = curves();
        let cfe = s.cash_flow_equivalents(&c).unwrap();
        let funding = c.curve("Funding").unwrap();
        let pv: f64 = cfe
            .times()
            .iter()
            .zip(cfe.amounts())
            .map(|(&t, &a)| a * funding.discount_factor(t).unwrap())
            .sum();
        assert_relative_eq!(pv, s.present_value(&c).unwrap().amount(), max_relative = 1e-12);
        // start, then one flow per quarter
        assert_eq!(cfe.len(), 9);
        assert!(cfe.amounts()[0] > 0.0);
        assert!(cfe.times().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_curve_sensitivities_match_finite_differences() {
        let s = swap(0.035);
        let c = curves();
        let shift = 1e-7;
        let pv_sens = s.present_value_curve_sensitivity(&c).unwrap().cleaned();
        let par_sens = s.par_rate_curve_sensitivity(&c).unwrap().cleaned();
        for name in ["Funding", "Forward"] {
            for &(t, value) in pv_sens.get(name).unwrap() {
                let up = s.present_value(&bumped_curves(name, t, shift)).unwrap().amount();
                let down = s.present_value(&bumped_curves(name, t, -shift)).unwrap().amount();
                assert_relative_eq!(value, (up - down) / (2.0 * shift), epsilon = 1e-2);
            }
            for &(t, value) in par_sens.get(name).unwrap() {
                let up = s.par_rate(&bumped_curves(name, t, shift)).unwrap();
                let down = s.par_rate(&bumped_curves(name, t, -shift)).unwrap();
                assert_relative_eq!(value, (up - down) / (2.0 * shift), epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_cash_flow_equivalent_sensitivity() {
        let s = swap(0.035);
        let c = curves();
        let shift = 1e-7;
        let sens = s.cash_flow_equivalents_curve_sensitivity(&c).unwrap();
        let first = sens[0].cleaned();
        for name in ["Funding", "Forward"] {
            for &(t, value) in first.get(name).unwrap() {
                let up = s.cash_flow_equivalents(&bumped_curves(name, t, shift)).unwrap().amounts()[0];
                let down = s.cash_flow_equivalents(&bumped_curves(name, t, -shift)).unwrap().amounts()[0];
                assert_relative_eq!(value, (up - down) / (2.0 * shift), epsilon = 1e-1);
            }
        }
    }

    #[test]
    fn test_cash_annuity_derivatives() {
        let s = swap(0.03);
        let h = 1e-5;
        let d = s.cash_annuity_derivatives(0.04);
        let d_up = s.cash_annuity_derivatives(0.04 + h);
        let d_down = s.cash_annuity_derivatives(0.04 - h);
        for k in 0..3 {
            assert_relative_eq!(d[k + 1], (d_up[k] - d_down[k]) / (2.0 * h), max_relative = 1e-6);
        }
        // zero rate: n/m
        assert_relative_eq!(s.cash_annuity(0.0), 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_trimming() {
        let s = swap(0.03);
        let tail = s.trimmed_before(2.0).unwrap();
        assert_eq!(tail.fixed_leg().len(), 2);
        assert_eq!(tail.ibor_leg().len(), 4);
        assert_eq!(tail.settlement_time(), 2.0);
        assert_eq!(tail.fixed_accrual_start(1), 2.5);
        // A coupon paid after 1.9 but accruing from 1.5 is not delivered.
        let late = s.trimmed_before(1.9).unwrap();
        assert_eq!(late.fixed_leg().len(), 2);
        assert_eq!(late.ibor_leg().len(), 4);
        assert!(late.ibor_leg().iter().all(|c| c.fixing().start_time >= 1.9));
        let head = s.trimmed_after(2.0).unwrap();
        assert_eq!(head.fixed_leg().len(), 2);
        assert_eq!(head.ibor_leg().len(), 4);
        assert_relative_eq!(head.tenor_time(), 1.0, epsilon = 1e-15);
        assert!(matches!(s.trimmed_before(3.0), Err(InstrumentError::EmptyLeg { .. })));
    }

    #[test]
    fn test_validation() {
        let fixed = vec![CouponFixed::new(Currency::EUR, 1.0, "Funding", 1.0, -1.0, 0.01)];
        let fixing = IborFixing {
            fixing_time: 0.0,
            start_time: 0.0,
            end_time: 1.0,
            accrual_factor: 1.0,
            forward_curve: "Forward".to_string(),
        };
        let same_sign = vec![CouponIbor::new(Currency::EUR, 1.0, "Funding", 1.0, -1.0, fixing, 0.0)];
        assert!(FixedIborSwap::new(0.0, fixed, same_sign).is_err());
        assert!(FixedIborSwap::new(0.0, vec![], vec![]).is_err());
    }

    #[test]
    fn test_curve_names_and_direction() {
        let s = swap(0.03);
        assert_eq!(s.curve_names(), vec!["Forward", "Funding"]);
        assert!(s.is_payer());
        assert!(!s.with_scaled_notional(-1.0).is_payer());
        assert_relative_eq!(s.fixed_frequency(), 2.0);
    }
}
