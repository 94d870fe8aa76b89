//! Swaptions priced with a Black or Bachelier volatility surface.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::sensitivity::{CurrencyAmount, CurveSensitivity, SurfaceSensitivity};
use pricer_core::types::PricingError;
use pricer_models::analytical::{bachelier_price, bachelier_vega, black_price_adjoint, norm_cdf};
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::{BlackVolatilitySurface, VolatilityKind};

use crate::method::{EuropeanTerms, SwaptionPricer};

const METHOD: &str = "Black method";

/// Price with its forward derivative and vega.
#[derive(Debug, Clone, Copy)]
struct OptionPrice {
    price: f64,
    forward: f64,
    vega: f64,
}

fn option_price(terms: &EuropeanTerms<'_>, surface: &BlackVolatilitySurface) -> OptionPrice {
    let vol = surface.volatility(terms.expiry, terms.tenor);
    let (f, k, t) = (terms.forward, terms.strike, terms.expiry);
    match surface.kind() {
        VolatilityKind::Lognormal => {
            let adjoint = black_price_adjoint(f, k, t, vol, terms.is_call);
            OptionPrice {
                price: adjoint.price,
                forward: adjoint.forward,
                vega: adjoint.volatility,
            }
        }
        VolatilityKind::Normal => {
            let w = if terms.is_call { 1.0 } else { -1.0 };
            let std_dev = vol * t.max(0.0).sqrt();
            let forward = if std_dev > 0.0 {
                w * norm_cdf(w * (f - k) / std_dev)
            } else if w * (f - k) > 0.0 {
                w
            } else {
                0.0
            };
            OptionPrice {
                price: bachelier_price(f, k, t, vol, terms.is_call),
                forward,
                vega: bachelier_vega(f, k, t, vol),
            }
        }
    }
}

/// European swaptions from a (lognormal or normal) volatility surface
/// looked up at `(expiry, tenor)`.
///
/// Cash-settled swaptions use the cash annuity at the forward swap rate
/// discounted from the settlement date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwaptionBlackMethod;

impl SwaptionBlackMethod {
    /// Present value.
    pub fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        surface: &BlackVolatilitySurface,
    ) -> Result<CurrencyAmount, PricingError> {
        let terms = EuropeanTerms::new(swaption, curves, METHOD)?;
        Ok(terms.present_value(option_price(&terms, surface).price))
    }

    /// Sensitivity to the zero rates of every curve, volatility fixed.
    pub fn present_value_curve_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        surface: &BlackVolatilitySurface,
    ) -> Result<CurveSensitivity, PricingError> {
        let terms = EuropeanTerms::new(swaption, curves, METHOD)?;
        let price = option_price(&terms, surface);
        terms.curve_sensitivity(curves, price.price, price.forward)
    }

    /// Vega, reported at the `(expiry, tenor)` point of the swaption.
    pub fn present_value_black_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        surface: &BlackVolatilitySurface,
    ) -> Result<SurfaceSensitivity, PricingError> {
        let terms = EuropeanTerms::new(swaption, curves, METHOD)?;
        let vega = option_price(&terms, surface).vega;
        Ok(SurfaceSensitivity::of(
            (terms.expiry, terms.tenor),
            terms.sign * terms.annuity * vega,
        ))
    }

    /// Forward swap rate of the underlying.
    pub fn forward(&self, swaption: &Swaption, curves: &YieldCurveBundle) -> Result<f64, PricingError> {
        Ok(EuropeanTerms::new(swaption, curves, METHOD)?.forward)
    }
}

impl SwaptionPricer for SwaptionBlackMethod {
    type Parameters = BlackVolatilitySurface;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        surface: &BlackVolatilitySurface,
    ) -> Result<CurrencyAmount, PricingError> {
        SwaptionBlackMethod::present_value(self, swaption, curves, surface)
    }
}
