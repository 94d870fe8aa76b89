//! Swaptions priced with Black volatilities implied by a SABR surface.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::sensitivity::{CurrencyAmount, CurveSensitivity, SurfaceSensitivity};
use pricer_core::types::PricingError;
use pricer_models::analytical::{black_price, black_price_adjoint};
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::sabr::hagan_volatility_adjoint;
use pricer_models::models::{SabrFormula, SabrParameters, SabrVolatilityAdjoint};

use crate::method::{EuropeanTerms, SwaptionPricer};

const METHOD: &str = "SABR method";

/// Present value sensitivity to the four SABR parameter surfaces, each
/// reported at the `(expiry, tenor)` of the swaption.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresentValueSabrSensitivity {
    /// ∂PV/∂α
    pub alpha: SurfaceSensitivity,
    /// ∂PV/∂β
    pub beta: SurfaceSensitivity,
    /// ∂PV/∂ρ
    pub rho: SurfaceSensitivity,
    /// ∂PV/∂ν
    pub nu: SurfaceSensitivity,
}

impl PresentValueSabrSensitivity {
    /// Sensitivity of a single point.
    pub fn at(point: (f64, f64), alpha: f64, beta: f64, rho: f64, nu: f64) -> Self {
        Self {
            alpha: SurfaceSensitivity::of(point, alpha),
            beta: SurfaceSensitivity::of(point, beta),
            rho: SurfaceSensitivity::of(point, rho),
            nu: SurfaceSensitivity::of(point, nu),
        }
    }

    /// Entry-wise sum.
    pub fn plus(&self, other: &Self) -> Self {
        Self {
            alpha: self.alpha.plus(&other.alpha),
            beta: self.beta.plus(&other.beta),
            rho: self.rho.plus(&other.rho),
            nu: self.nu.plus(&other.nu),
        }
    }

    /// Every value multiplied by `factor`.
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            alpha: self.alpha.multiplied_by(factor),
            beta: self.beta.multiplied_by(factor),
            rho: self.rho.multiplied_by(factor),
            nu: self.nu.multiplied_by(factor),
        }
    }
}

/// European swaptions priced with the SABR smile at `(expiry, tenor)`.
///
/// Sensitivities need the derivatives of the Hagan expansion; a surface
/// using [`SabrFormula::Obloj`] prices but rejects sensitivity requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwaptionSabrMethod;

impl SwaptionSabrMethod {
    fn adjoint(terms: &EuropeanTerms<'_>, sabr: &SabrParameters) -> Result<SabrVolatilityAdjoint, PricingError> {
        if sabr.formula() != SabrFormula::Hagan {
            return Err(PricingError::InvalidInput(
                "SABR sensitivities require the Hagan formula".to_string(),
            ));
        }
        let point = sabr.point(terms.expiry, terms.tenor);
        Ok(hagan_volatility_adjoint(terms.forward, terms.strike, terms.expiry, &point))
    }

    /// Present value.
    pub fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        sabr: &SabrParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        let terms = EuropeanTerms::new(swaption, curves, METHOD)?;
        let vol = sabr.volatility(terms.expiry, terms.tenor, terms.forward, terms.strike);
        Ok(terms.present_value(black_price(terms.forward, terms.strike, terms.expiry, vol, terms.is_call)))
    }

    /// Curve sensitivity including the move of the smile with the forward.
    pub fn present_value_curve_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        sabr: &SabrParameters,
    ) -> Result<CurveSensitivity, PricingError> {
        let terms = EuropeanTerms::new(swaption, curves, METHOD)?;
        let smile = Self::adjoint(&terms, sabr)?;
        let black = black_price_adjoint(terms.forward, terms.strike, terms.expiry, smile.volatility, terms.is_call);
        terms.curve_sensitivity(curves, black.price, black.forward + black.volatility * smile.forward)
    }

    /// Sensitivity to the SABR parameters.
    pub fn present_value_sabr_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        sabr: &SabrParameters,
    ) -> Result<PresentValueSabrSensitivity, PricingError> {
        let terms = EuropeanTerms::new(swaption, curves, METHOD)?;
        let smile = Self::adjoint(&terms, sabr)?;
        let black = black_price_adjoint(terms.forward, terms.strike, terms.expiry, smile.volatility, terms.is_call);
        let scale = terms.sign * terms.annuity * black.volatility;
        Ok(PresentValueSabrSensitivity::at(
            (terms.expiry, terms.tenor),
            scale * smile.alpha,
            scale * smile.beta,
            scale * smile.rho,
            scale * smile.nu,
        ))
    }
}

impl SwaptionPricer for SwaptionSabrMethod {
    type Parameters = SabrParameters;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        sabr: &SabrParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        SwaptionSabrMethod::present_value(self, swaption, curves, sabr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytical::SwaptionBlackMethod;
    use crate::finite_difference::swaption_curve_sensitivity;
    use crate::test_support::{cash, curves, physical, sabr};
    use approx::assert_relative_eq;
    use pricer_models::models::{BlackVolatilitySurface, SabrParameter, VolatilityKind};

    #[test]
    fn test_matches_black_at_sabr_volatility() {
        let (c, s) = (curves(), sabr());
        let swaption = physical(true, true);
        let terms = EuropeanTerms::new(&swaption, &c, "test").unwrap();
        let vol = s.volatility(terms.expiry, terms.tenor, terms.forward, terms.strike);
        let surface = BlackVolatilitySurface::flat(vol, VolatilityKind::Lognormal).unwrap();
        assert_relative_eq!(
            SwaptionSabrMethod.present_value(&swaption, &c, &s).unwrap().amount(),
            SwaptionBlackMethod.present_value(&swaption, &c, &surface).unwrap().amount(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_curve_sensitivity_matches_finite_difference() {
        let (c, s) = (curves(), sabr());
        for swaption in [physical(false, true), cash(true, false)] {
            let analytic = SwaptionSabrMethod.present_value_curve_sensitivity(&swaption, &c, &s).unwrap();
            let fd = swaption_curve_sensitivity(&swaption, &c, 1e-6, |bumped| {
                Ok(SwaptionSabrMethod.present_value(&swaption, bumped, &s)?.amount())
            })
            .unwrap();
            for name in ["Funding", "Forward"] {
                assert_relative_eq!(analytic.total_for(name), fd.total_for(name), max_relative = 1e-5);
            }
        }
    }

    #[test]
    fn test_sabr_sensitivity_matches_finite_difference() {
        let (c, s) = (curves(), sabr());
        let swaption = physical(true, true);
        let sensi = SwaptionSabrMethod.present_value_sabr_sensitivity(&swaption, &c, &s).unwrap();
        let h = 1e-6;
        for (parameter, analytic) in [
            (SabrParameter::Alpha, &sensi.alpha),
            (SabrParameter::Beta, &sensi.beta),
            (SabrParameter::Rho, &sensi.rho),
            (SabrParameter::Nu, &sensi.nu),
        ] {
            let up = SwaptionSabrMethod.present_value(&swaption, &c, &s.with_shifted(parameter, h)).unwrap();
            let down = SwaptionSabrMethod.present_value(&swaption, &c, &s.with_shifted(parameter, -h)).unwrap();
            let fd = (up.amount() - down.amount()) / (2.0 * h);
            assert_relative_eq!(analytic.total(), fd, max_relative = 1e-4, epsilon = 1.0);
        }
    }

    #[test]
    fn test_obloj_prices_but_has_no_sensitivities() {
        let (c, s) = (curves(), sabr().with_formula(SabrFormula::Obloj));
        let swaption = physical(true, true);
        assert!(SwaptionSabrMethod.present_value(&swaption, &c, &s).unwrap().amount() > 0.0);
        assert!(matches!(
            SwaptionSabrMethod.present_value_sabr_sensitivity(&swaption, &c, &s),
            Err(PricingError::InvalidInput(_))
        ));
    }
}
