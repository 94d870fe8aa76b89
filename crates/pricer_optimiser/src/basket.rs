//! Calibration baskets built from a swaption's fixed leg.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::sensitivity::CurrencyAmount;
use pricer_core::types::{CalibrationError, PricingError};
use pricer_models::instruments::rates::{FixedIborSwap, Swaption, SwaptionPhysical};
use pricer_pricing::SwaptionPricer;

use crate::calibration::{CalibrationConfig, CalibrationObjective, SuccessiveRootFinderCalibration};

/// Strikes of the basket swaptions.
#[derive(Debug, Clone, Copy)]
pub enum BasketStrikes<'a> {
    /// The fixed rates of the original swap.
    Original,
    /// One swaption per offset from the par rate of each basket swap. An
    /// empty list keeps the original rates.
    ParOffsets {
        /// Offsets added to the par rate.
        offsets: &'a [f64],
        /// Curves giving the par rates.
        curves: &'a YieldCurveBundle,
    },
}

/// One physical swaption per fixed coupon of `swaption`'s underlying.
///
/// Swaption `k` has the original expiry and the swap cut after fixed
/// coupon `k`, with every notional set to the notional of coupon `k`. With
/// par offsets the swaptions of one coupon follow each other, so the
/// basket has `periods × max(1, offsets)` entries ordered by maturity.
///
/// # Errors
///
/// `UnsupportedInstrument` for a Bermudan; `InvalidInput` if a par rate
/// cannot be computed.
pub fn calibration_basket_fixed_leg_period(
    swaption: &Swaption,
    strikes: BasketStrikes<'_>,
) -> Result<Vec<Swaption>, PricingError> {
    let (expiry, swap) = match swaption {
        Swaption::Physical(s) => (s.expiry_time(), s.underlying()),
        Swaption::Cash(s) => (s.expiry_time(), s.underlying()),
        Swaption::Bermudan(_) => {
            return Err(PricingError::UnsupportedInstrument(
                "fixed leg baskets are built from European swaptions".to_string(),
            ))
        }
    };
    let width = match strikes {
        BasketStrikes::ParOffsets { offsets, .. } => offsets.len().max(1),
        BasketStrikes::Original => 1,
    };
    let mut basket = Vec::with_capacity(swap.fixed_leg().len() * width);
    for coupon in swap.fixed_leg() {
        let period_swap = with_single_notional(&swap.trimmed_after(coupon.payment_time())?, coupon.notional())?;
        let swaps = match strikes {
            BasketStrikes::ParOffsets { offsets, curves } if !offsets.is_empty() => {
                let par = period_swap.par_rate(curves)?;
                offsets.iter().map(|o| period_swap.with_fixed_rate(par + o)).collect()
            }
            _ => vec![period_swap],
        };
        for underlying in swaps {
            let mut option = SwaptionPhysical::new(expiry, underlying, swaption.is_long())?;
            if let Some(date) = swaption.reference_date() {
                option = option.with_reference_date(date);
            }
            basket.push(Swaption::Physical(option));
        }
    }
    Ok(basket)
}

/// `swap` with every fixed notional set to `notional` and every ibor
/// notional to its opposite.
fn with_single_notional(swap: &FixedIborSwap, notional: f64) -> Result<FixedIborSwap, PricingError> {
    let fixed = swap
        .fixed_leg()
        .iter()
        .map(|c| c.with_scaled_notional(notional / c.notional()))
        .collect();
    let ibor = swap
        .ibor_leg()
        .iter()
        .map(|c| c.with_scaled_notional((notional / c.notional()).abs()))
        .collect();
    Ok(FixedIborSwap::new(swap.settlement_time(), fixed, ibor)?)
}

/// Prices a swaption with a model calibrated to its fixed leg basket.
///
/// The basket keeps the original strikes and is priced for its targets by
/// `target` (typically a smile method). Objectives that split the model by
/// expiry need distinct expiries and reject the basket; the LMM-DD
/// objective splits by maturity and fits it.
#[derive(Debug, Clone)]
pub struct SwaptionBasketMethod<O, M> {
    objective: O,
    target: M,
    config: CalibrationConfig,
}

impl<O, M> SwaptionBasketMethod<O, M>
where
    O: CalibrationObjective + Clone,
    M: SwaptionPricer + Sync,
    M::Parameters: Sync,
{
    /// Method calibrating `objective` to prices from `target`.
    pub fn new(objective: O, target: M, config: CalibrationConfig) -> Self {
        Self {
            objective,
            target,
            config,
        }
    }

    /// Model parameters calibrated to the basket of `swaption`.
    pub fn calibrate(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        target_parameters: &M::Parameters,
    ) -> Result<O::Parameters, CalibrationError> {
        let basket = calibration_basket_fixed_leg_period(swaption, BasketStrikes::Original)?;
        let mut calibration = SuccessiveRootFinderCalibration::new(self.objective.clone(), self.config.clone());
        calibration.add_instruments(basket, &self.target, target_parameters);
        calibration.calibrate(curves)
    }

    /// Present value under the calibrated model.
    pub fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        target_parameters: &M::Parameters,
    ) -> Result<CurrencyAmount, PricingError> {
        let parameters = self.calibrate(swaption, curves, target_parameters)?;
        self.objective.method().present_value(swaption, curves, &parameters)
    }
}

impl<O, M> SwaptionPricer for SwaptionBasketMethod<O, M>
where
    O: CalibrationObjective + Clone,
    M: SwaptionPricer + Sync,
    M::Parameters: Sync,
{
    type Parameters = M::Parameters;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        parameters: &M::Parameters,
    ) -> Result<CurrencyAmount, PricingError> {
        SwaptionBasketMethod::present_value(self, swaption, curves, parameters)
    }
}
