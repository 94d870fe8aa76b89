//! Hull-White volatility calibration.

use pricer_core::types::{CalibrationError, PricingError};
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::HullWhiteParameters;
use pricer_pricing::analytical::SwaptionHullWhiteMethod;
use pricer_pricing::SwaptionPricer;

use super::objective::{expiry_knots, increasing_expiries, CalibrationObjective};

const LOWER_VOLATILITY: f64 = 1e-6;
const UPPER_VOLATILITY: f64 = 1.0;

/// Piecewise-constant Hull-White volatility with a fixed mean reversion.
///
/// The volatility knots are the instrument expiries; instrument `k` fixes
/// the volatility on `[expiry_{k-1}, expiry_k)`, the last one on
/// `[expiry_{n-2}, ∞)`.
#[derive(Debug, Clone)]
pub struct HullWhiteObjective<M = SwaptionHullWhiteMethod> {
    mean_reversion: f64,
    initial_volatility: f64,
    method: M,
}

impl HullWhiteObjective {
    /// Objective priced with the closed-form method.
    pub fn new(mean_reversion: f64, initial_volatility: f64) -> Self {
        Self::with_method(mean_reversion, initial_volatility, SwaptionHullWhiteMethod)
    }
}

impl<M> HullWhiteObjective<M>
where
    M: SwaptionPricer<Parameters = HullWhiteParameters>,
{
    /// Objective priced with `method`.
    pub fn with_method(mean_reversion: f64, initial_volatility: f64, method: M) -> Self {
        Self {
            mean_reversion,
            initial_volatility,
            method,
        }
    }

    /// Fixed mean reversion.
    #[inline]
    pub fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }
}

impl<M> CalibrationObjective for HullWhiteObjective<M>
where
    M: SwaptionPricer<Parameters = HullWhiteParameters>,
{
    type Parameters = HullWhiteParameters;
    type Method = M;

    fn method(&self) -> &M {
        &self.method
    }

    fn initial_parameters(&self, instruments: &[Swaption]) -> Result<HullWhiteParameters, CalibrationError> {
        let expiries = increasing_expiries(instruments, "Hull-White")?;
        Ok(HullWhiteParameters::new(
            self.mean_reversion,
            vec![self.initial_volatility; expiries.len()],
            expiry_knots(&expiries),
        )?)
    }

    fn with_value(
        &self,
        parameters: &HullWhiteParameters,
        _instruments: &[Swaption],
        index: usize,
        value: f64,
    ) -> Result<HullWhiteParameters, PricingError> {
        let mut volatilities = parameters.volatilities().to_vec();
        let pieces = volatilities.get_mut(index..).ok_or_else(|| {
            PricingError::InvalidInput(format!("no Hull-White volatility for instrument {index}"))
        })?;
        pieces.fill(value);
        Ok(parameters.with_volatilities(volatilities)?)
    }

    fn initial_value(&self) -> f64 {
        self.initial_volatility
    }

    fn bounds(&self) -> (f64, f64) {
        (LOWER_VOLATILITY, UPPER_VOLATILITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bermudan_components, cash, curves};

    #[test]
    fn test_knots_at_expiries() {
        let instruments = bermudan_components();
        let params = HullWhiteObjective::new(0.01, 0.01).initial_parameters(&instruments).unwrap();
        assert_eq!(params.volatilities().len(), instruments.len());
        assert_eq!(params.knot_times().len(), instruments.len() - 1);
        for (knot, swaption) in params.knot_times().iter().zip(&instruments) {
            assert_eq!(*knot, swaption.expiry_time());
        }
    }

    #[test]
    fn test_value_fills_forward() {
        let instruments = bermudan_components();
        let objective = HullWhiteObjective::new(0.01, 0.01);
        let params = objective.initial_parameters(&instruments).unwrap();
        let bumped = objective.with_value(&params, &instruments, 2, 0.02).unwrap();
        assert_eq!(&bumped.volatilities()[..2], &params.volatilities()[..2]);
        assert!(bumped.volatilities()[2..].iter().all(|&v| v == 0.02));
    }

    #[test]
    fn test_later_value_leaves_earlier_price() {
        let instruments = bermudan_components();
        let objective = HullWhiteObjective::new(0.01, 0.01);
        let c = curves();
        let params = objective.initial_parameters(&instruments).unwrap();
        let bumped = objective.with_value(&params, &instruments, 3, 0.03).unwrap();
        for swaption in &instruments[..3] {
            let before = objective.price(swaption, &c, &params).unwrap();
            let after = objective.price(swaption, &c, &bumped).unwrap();
            assert!((before - after).abs() < 1e-6 * before.abs());
        }
        let moved = objective.price(&instruments[3], &c, &bumped).unwrap();
        assert!(moved > objective.price(&instruments[3], &c, &params).unwrap());
    }

    #[test]
    fn test_same_expiry_is_rejected() {
        let instruments = vec![cash(true), cash(false)];
        let err = HullWhiteObjective::new(0.01, 0.01).initial_parameters(&instruments).unwrap_err();
        assert_eq!(err.instrument_index, Some(1));
    }
}
