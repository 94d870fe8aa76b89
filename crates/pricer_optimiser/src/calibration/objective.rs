//! The model side of a successive calibration.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::types::{CalibrationError, PricingError};
use pricer_models::instruments::rates::Swaption;
use pricer_pricing::SwaptionPricer;

/// How one scalar per instrument maps onto model parameters.
///
/// The engine asks for the parameters of the whole instrument list once,
/// then for instrument `k` searches the value for which
/// `price(swaption_k, with_value(params, k, value))` meets its target. A
/// value set at `k` applies to the model pieces of instrument `k` and to
/// every later piece, so the next step starts from a consistent model.
pub trait CalibrationObjective {
    /// Model parameters produced by the calibration.
    type Parameters: Clone;

    /// Method pricing the instruments with the model.
    type Method: SwaptionPricer<Parameters = Self::Parameters>;

    /// The model pricing method.
    fn method(&self) -> &Self::Method;

    /// Parameters shaped for `instruments`, before any step.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the instruments cannot be mapped onto the
    /// model (unordered expiries, off-grid maturities, Bermudans).
    fn initial_parameters(&self, instruments: &[Swaption]) -> Result<Self::Parameters, CalibrationError>;

    /// Copy of `parameters` with the value of instrument `index` set to `value`.
    fn with_value(
        &self,
        parameters: &Self::Parameters,
        instruments: &[Swaption],
        index: usize,
        value: f64,
    ) -> Result<Self::Parameters, PricingError>;

    /// Starting guess of the first step. Later steps start from the
    /// previous solution.
    fn initial_value(&self) -> f64;

    /// Admissible range of a step value.
    fn bounds(&self) -> (f64, f64);

    /// Model price of `swaption`.
    fn price(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        parameters: &Self::Parameters,
    ) -> Result<f64, PricingError> {
        Ok(self.method().present_value(swaption, curves, parameters)?.amount())
    }
}

/// Expiry of each European instrument, checked strictly increasing.
pub(crate) fn increasing_expiries(instruments: &[Swaption], model: &str) -> Result<Vec<f64>, CalibrationError> {
    let mut expiries = Vec::with_capacity(instruments.len());
    for (k, swaption) in instruments.iter().enumerate() {
        if let Swaption::Bermudan(_) = swaption {
            return Err(CalibrationError::invalid_parameter(format!(
                "{model} calibration instruments must be European"
            ))
            .with_instrument(k));
        }
        let expiry = swaption.expiry_time();
        if expiries.last().is_some_and(|&previous| expiry <= previous) {
            return Err(CalibrationError::invalid_parameter(format!(
                "{model} calibration expiries must be strictly increasing"
            ))
            .with_instrument(k));
        }
        expiries.push(expiry);
    }
    Ok(expiries)
}

/// Volatility knots splitting the model at the expiries: the piece of
/// instrument `k` ends at its own expiry, the last piece is open.
pub(crate) fn expiry_knots(expiries: &[f64]) -> Vec<f64> {
    expiries[..expiries.len().saturating_sub(1)].to_vec()
}
