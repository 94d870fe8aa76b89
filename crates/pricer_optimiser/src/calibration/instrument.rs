//! Calibration instruments and their target prices.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::types::{CalibrationError, PricingError};
use pricer_models::instruments::rates::Swaption;
use pricer_pricing::SwaptionPricer;

type TargetPrice<'a> =
    Box<dyn Fn(&Swaption, &YieldCurveBundle) -> Result<f64, PricingError> + Send + Sync + 'a>;

/// A swaption with the method and data giving its target price.
pub(crate) struct CalibrationInstrument<'a> {
    pub(crate) swaption: Swaption,
    target: TargetPrice<'a>,
}

impl<'a> CalibrationInstrument<'a> {
    pub(crate) fn new<M>(swaption: Swaption, method: &'a M, parameters: &'a M::Parameters) -> Self
    where
        M: SwaptionPricer + Sync,
        M::Parameters: Sync,
    {
        Self {
            swaption,
            target: Box::new(move |swaption, curves| {
                Ok(method.present_value(swaption, curves, parameters)?.amount())
            }),
        }
    }

    fn target_price(&self, curves: &YieldCurveBundle) -> Result<f64, PricingError> {
        (self.target)(&self.swaption, curves)
    }
}

/// Target price of every instrument, in insertion order. `offset` is the
/// index of the first instrument in the engine's numbering.
pub(crate) fn target_prices(
    instruments: &[CalibrationInstrument<'_>],
    curves: &YieldCurveBundle,
    offset: usize,
) -> Result<Vec<f64>, CalibrationError> {
    let price = |(k, instrument): (usize, &CalibrationInstrument<'_>)| {
        instrument
            .target_price(curves)
            .map_err(|err| CalibrationError::from(err).with_instrument(offset + k))
    };
    #[cfg(feature = "parallel")]
    {
        instruments.par_iter().enumerate().map(price).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        instruments.iter().enumerate().map(price).collect()
    }
}
