//! SABR swaption pricing with a power-law tail for high strikes.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::sensitivity::{CurrencyAmount, CurveSensitivity};
use pricer_core::types::PricingError;
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::{SabrExtrapolationRight, SabrParameters, SabrPoint};

use super::sabr::PresentValueSabrSensitivity;
use crate::method::{EuropeanTerms, SwaptionPricer};

const METHOD: &str = "SABR extrapolation method";
/// Forward bump of the price derivative.
const FORWARD_SHIFT: f64 = 1e-7;
/// Parameter bump of the SABR sensitivities.
const PARAMETER_SHIFT: f64 = 1e-6;

/// European swaptions priced with SABR below `cutoff` and the
/// [`SabrExtrapolationRight`] tail above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwaptionSabrExtrapolationMethod {
    cutoff: f64,
    mu: f64,
}

impl SwaptionSabrExtrapolationMethod {
    /// Method with the tail starting at `cutoff` and decaying with exponent `mu`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` unless both are positive.
    pub fn new(cutoff: f64, mu: f64) -> Result<Self, PricingError> {
        if !(cutoff > 0.0 && mu > 0.0) {
            return Err(PricingError::InvalidInput(format!(
                "cut-off {cutoff} and tail exponent {mu} must be positive"
            )));
        }
        Ok(Self { cutoff, mu })
    }

    /// Cut-off strike.
    #[inline]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Tail exponent.
    #[inline]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    fn price(&self, terms: &EuropeanTerms<'_>, forward: f64, point: SabrPoint) -> Result<f64, PricingError> {
        let smile = SabrExtrapolationRight::new(forward, point, self.cutoff, terms.expiry, self.mu)?;
        Ok(smile.price(terms.strike, terms.is_call))
    }

    /// Present value.
    pub fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        sabr: &SabrParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        let terms = EuropeanTerms::new(swaption, curves, METHOD)?;
        let point = sabr.point(terms.expiry, terms.tenor);
        Ok(terms.present_value(self.price(&terms, terms.forward, point)?))
    }

    /// Curve sensitivity; the smile moves with the forward.
    pub fn present_value_curve_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        sabr: &SabrParameters,
    ) -> Result<CurveSensitivity, PricingError> {
        let terms = EuropeanTerms::new(swaption, curves, METHOD)?;
        let point = sabr.point(terms.expiry, terms.tenor);
        let f = terms.forward;
        let price = self.price(&terms, f, point)?;
        let up = self.price(&terms, f + FORWARD_SHIFT, point)?;
        let down = self.price(&terms, f - FORWARD_SHIFT, point)?;
        terms.curve_sensitivity(curves, price, (up - down) / (2.0 * FORWARD_SHIFT))
    }

    /// Sensitivity to the SABR parameters at the swaption point.
    pub fn present_value_sabr_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        sabr: &SabrParameters,
    ) -> Result<PresentValueSabrSensitivity, PricingError> {
        let terms = EuropeanTerms::new(swaption, curves, METHOD)?;
        let point = sabr.point(terms.expiry, terms.tenor);
        let derivative = |update: fn(&mut SabrPoint, f64)| -> Result<f64, PricingError> {
            let mut up = point;
            update(&mut up, PARAMETER_SHIFT);
            let mut down = point;
            update(&mut down, -PARAMETER_SHIFT);
            let diff = self.price(&terms, terms.forward, up)? - self.price(&terms, terms.forward, down)?;
            Ok(terms.sign * terms.annuity * diff / (2.0 * PARAMETER_SHIFT))
        };
        Ok(PresentValueSabrSensitivity::at(
            (terms.expiry, terms.tenor),
            derivative(|p, h| p.alpha += h)?,
            derivative(|p, h| p.beta += h)?,
            derivative(|p, h| p.rho += h)?,
            derivative(|p, h| p.nu += h)?,
        ))
    }
}

impl SwaptionPricer for SwaptionSabrExtrapolationMethod {
    type Parameters = SabrParameters;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        sabr: &SabrParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        SwaptionSabrExtrapolationMethod::present_value(self, swaption, curves, sabr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytical::SwaptionSabrMethod;
    use crate::finite_difference::swaption_curve_sensitivity;
    use crate::test_support::{curves, expiry_date, generator, physical, reference_date, sabr, NOTIONAL};
    use approx::assert_relative_eq;
    use pricer_core::types::time::Tenor;
    use pricer_models::models::SabrParameter;

    fn high_strike(strike: f64, is_payer: bool) -> Swaption {
        generator()
            .swaption_physical(reference_date(), expiry_date(), Tenor::from_years(5), NOTIONAL, strike, is_payer, true)
            .unwrap()
            .into()
    }

    #[test]
    fn test_equals_sabr_below_cutoff() {
        let (c, s) = (curves(), sabr());
        let method = SwaptionSabrExtrapolationMethod::new(0.08, 2.5).unwrap();
        let swaption = physical(true, true);
        assert_relative_eq!(
            method.present_value(&swaption, &c, &s).unwrap().amount(),
            SwaptionSabrMethod.present_value(&swaption, &c, &s).unwrap().amount(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_tail_prices_decrease_with_strike() {
        let (c, s) = (curves(), sabr());
        let method = SwaptionSabrExtrapolationMethod::new(0.06, 10.0).unwrap();
        let mut previous = f64::INFINITY;
        for strike in [0.07, 0.09, 0.12] {
            let pv = method.present_value(&high_strike(strike, true), &c, &s).unwrap().amount();
            assert!(pv > 0.0 && pv < previous);
            previous = pv;
        }
    }

    #[test]
    fn test_curve_sensitivity_matches_finite_difference() {
        let (c, s) = (curves(), sabr());
        let method = SwaptionSabrExtrapolationMethod::new(0.06, 2.5).unwrap();
        let swaption = high_strike(0.08, false);
        let analytic = method.present_value_curve_sensitivity(&swaption, &c, &s).unwrap();
        let fd = swaption_curve_sensitivity(&swaption, &c, 1e-6, |bumped| {
            Ok(method.present_value(&swaption, bumped, &s)?.amount())
        })
        .unwrap();
        for name in ["Funding", "Forward"] {
            assert_relative_eq!(analytic.total_for(name), fd.total_for(name), max_relative = 1e-4);
        }
    }

    #[test]
    fn test_sabr_sensitivity_matches_surface_shift() {
        let (c, s) = (curves(), sabr());
        let method = SwaptionSabrExtrapolationMethod::new(0.06, 2.5).unwrap();
        let swaption = high_strike(0.08, true);
        let sensi = method.present_value_sabr_sensitivity(&swaption, &c, &s).unwrap();
        let h = 1e-5;
        let up = method.present_value(&swaption, &c, &s.with_shifted(SabrParameter::Nu, h)).unwrap();
        let down = method.present_value(&swaption, &c, &s.with_shifted(SabrParameter::Nu, -h)).unwrap();
        assert_relative_eq!(
            sensi.nu.total(),
            (up.amount() - down.amount()) / (2.0 * h),
            max_relative = 1e-3
        );
    }

    #[test]
    fn test_invalid_construction() {
        assert!(SwaptionSabrExtrapolationMethod::new(0.0, 2.5).is_err());
        assert!(SwaptionSabrExtrapolationMethod::new(0.06, -1.0).is_err());
    }
}
