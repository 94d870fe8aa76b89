//! G2++ volatility level calibration.

use pricer_core::types::{CalibrationError, PricingError};
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::G2ppParameters;
use pricer_pricing::analytical::SwaptionG2ppApproximationMethod;
use pricer_pricing::SwaptionPricer;

use super::objective::{expiry_knots, increasing_expiries, CalibrationObjective};

/// Multiplicative level of the G2++ volatilities, one per expiry piece.
///
/// Mean reversions, correlation and the ratio between the two factor
/// volatilities come from a template; instrument `k` scales both base
/// volatilities on its expiry piece and every later one.
#[derive(Debug, Clone)]
pub struct G2ppObjective<M = SwaptionG2ppApproximationMethod> {
    template: G2ppParameters,
    base_volatilities: [f64; 2],
    method: M,
}

impl G2ppObjective {
    /// Objective priced with the projected one-factor approximation.
    pub fn new(template: G2ppParameters) -> Self {
        Self::with_method(template, SwaptionG2ppApproximationMethod)
    }
}

impl<M> G2ppObjective<M>
where
    M: SwaptionPricer<Parameters = G2ppParameters>,
{
    /// Objective priced with `method`. The base volatilities are those of
    /// the template's first piece.
    pub fn with_method(template: G2ppParameters, method: M) -> Self {
        let vols = template.volatilities();
        let base_volatilities = [vols[0][0], vols[1][0]];
        Self {
            template,
            base_volatilities,
            method,
        }
    }

    fn build(&self, volatilities: [Vec<f64>; 2], knot_times: Vec<f64>) -> Result<G2ppParameters, PricingError> {
        Ok(G2ppParameters::new(
            self.template.mean_reversions(),
            volatilities,
            knot_times,
            self.template.correlation(),
        )?)
    }
}

impl<M> CalibrationObjective for G2ppObjective<M>
where
    M: SwaptionPricer<Parameters = G2ppParameters>,
{
    type Parameters = G2ppParameters;
    type Method = M;

    fn method(&self) -> &M {
        &self.method
    }

    fn initial_parameters(&self, instruments: &[Swaption]) -> Result<G2ppParameters, CalibrationError> {
        let expiries = increasing_expiries(instruments, "G2++")?;
        let [v0, v1] = self.base_volatilities;
        let n = expiries.len();
        Ok(self.build([vec![v0; n], vec![v1; n]], expiry_knots(&expiries))?)
    }

    fn with_value(
        &self,
        parameters: &G2ppParameters,
        _instruments: &[Swaption],
        index: usize,
        value: f64,
    ) -> Result<G2ppParameters, PricingError> {
        if index >= parameters.number_of_pieces() {
            return Err(PricingError::InvalidInput(format!(
                "no G2++ volatility piece for instrument {index}"
            )));
        }
        let mut volatilities = parameters.volatilities().clone();
        for (vols, base) in volatilities.iter_mut().zip(self.base_volatilities) {
            vols[index..].fill(base * value);
        }
        self.build(volatilities, parameters.knot_times().to_vec())
    }

    fn initial_value(&self) -> f64 {
        1.0
    }

    fn bounds(&self) -> (f64, f64) {
        (1e-4, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bermudan_components, curves, g2pp};
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_level_is_the_template() {
        let instruments = bermudan_components();
        let objective = G2ppObjective::new(g2pp());
        let params = objective.initial_parameters(&instruments).unwrap();
        let c = curves();
        for swaption in &instruments {
            assert_relative_eq!(
                objective.price(swaption, &c, &params).unwrap(),
                objective.price(swaption, &c, &g2pp()).unwrap(),
                max_relative = 1e-10
            );
        }
    }

    #[test]
    fn test_level_scales_both_factors_forward() {
        let instruments = bermudan_components();
        let objective = G2ppObjective::new(g2pp());
        let params = objective.initial_parameters(&instruments).unwrap();
        let scaled = objective.with_value(&params, &instruments, 4, 1.5).unwrap();
        for f in 0..2 {
            let vols = &scaled.volatilities()[f];
            assert_eq!(&vols[..4], &params.volatilities()[f][..4]);
            assert!(vols[4..].iter().all(|&v| (v - 1.5 * params.volatilities()[f][0]).abs() < 1e-15));
        }
        assert_eq!(scaled.correlation(), g2pp().correlation());
    }

    #[test]
    fn test_index_past_the_pieces() {
        let instruments = bermudan_components();
        let objective = G2ppObjective::new(g2pp());
        let params = objective.initial_parameters(&instruments).unwrap();
        assert!(objective.with_value(&params, &instruments, instruments.len(), 1.0).is_err());
    }
}
