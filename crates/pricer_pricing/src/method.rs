//! Common interface and shared terms of the swaption pricing methods.

use pricer_core::market_data::{YieldCurve, YieldCurveBundle};
use pricer_core::sensitivity::{CurrencyAmount, CurveSensitivity};
use pricer_core::types::PricingError;
use pricer_models::instruments::rates::{FixedIborSwap, Swaption};

/// A swaption pricing method.
///
/// Every method prices the [`Swaption`] variants it supports and answers
/// `UnsupportedInstrument` for the others.
///
/// # Example
///
/// ```ignore
/// use pricer_pricing::analytical::SwaptionBlackMethod;
/// use pricer_pricing::SwaptionPricer;
///
/// let pv = SwaptionBlackMethod.present_value(&swaption, &curves, &surface)?;
/// ```
pub trait SwaptionPricer {
    /// Model parameters or market data used beyond the curves.
    type Parameters: ?Sized;

    /// Present value in the swaption currency.
    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        parameters: &Self::Parameters,
    ) -> Result<CurrencyAmount, PricingError>;
}

/// Rejects a bundle missing one of the swaption curves or tagged with a
/// different valuation date.
pub(crate) fn check_market(swaption: &Swaption, curves: &YieldCurveBundle) -> Result<(), PricingError> {
    if let Some(name) = swaption.curve_names().into_iter().find(|n| !curves.contains(n)) {
        return Err(PricingError::InvalidInput(format!(
            "curve '{name}' is missing from the bundle"
        )));
    }
    if let (Some(trade), Some(market)) = (swaption.reference_date(), curves.reference_date()) {
        if trade != market {
            return Err(PricingError::InvalidInput(format!(
                "swaption reference date {trade} differs from curve date {market}"
            )));
        }
    }
    Ok(())
}

/// `+1` for a held option, `-1` for a sold one.
#[inline]
pub(crate) fn long_sign(is_long: bool) -> f64 {
    if is_long {
        1.0
    } else {
        -1.0
    }
}

/// Error returned by the European-only methods on a Bermudan.
pub(crate) fn european_only(method: &str) -> PricingError {
    PricingError::UnsupportedInstrument(format!("{method} prices European swaptions only"))
}

/// How a European swaption delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settlement {
    Physical,
    Cash,
}

/// Market terms of a European swaption seen as an option on the swap rate.
///
/// The present value of every annuity-based formula is
/// `sign · annuity · price(forward, strike)`. For physical delivery the
/// annuity is the fixed-leg PVBP; for cash settlement it is
/// `N · A_cash(forward) · P(0, t_s)`.
#[derive(Debug, Clone)]
pub(crate) struct EuropeanTerms<'a> {
    pub swap: &'a FixedIborSwap,
    pub expiry: f64,
    pub tenor: f64,
    pub forward: f64,
    pub strike: f64,
    pub is_call: bool,
    pub sign: f64,
    pub settlement: Settlement,
    pub annuity: f64,
    settlement_discount: f64,
}

impl<'a> EuropeanTerms<'a> {
    pub(crate) fn new(
        swaption: &'a Swaption,
        curves: &YieldCurveBundle,
        method: &str,
    ) -> Result<Self, PricingError> {
        check_market(swaption, curves)?;
        let (swap, settlement) = match swaption {
            Swaption::Physical(s) => (s.underlying(), Settlement::Physical),
            Swaption::Cash(s) => (s.underlying(), Settlement::Cash),
            Swaption::Bermudan(_) => return Err(european_only(method)),
        };
        let forward = swap.par_rate(curves)?;
        let settlement_discount = curves
            .curve(swap.funding_curve())?
            .discount_factor(swap.settlement_time())?;
        let annuity = match settlement {
            Settlement::Physical => swap.annuity(curves)?,
            Settlement::Cash => swap.notional() * swap.cash_annuity(forward) * settlement_discount,
        };
        Ok(Self {
            swap,
            expiry: swaption.expiry_time(),
            tenor: swap.tenor_time(),
            forward,
            strike: swap.fixed_rate(),
            is_call: swap.is_payer(),
            sign: long_sign(swaption.is_long()),
            settlement,
            annuity,
            settlement_discount,
        })
    }

    /// Present value of an undiscounted option price per unit annuity.
    pub(crate) fn present_value(&self, price: f64) -> CurrencyAmount {
        CurrencyAmount::new(self.swap.currency(), self.sign * self.annuity * price)
    }

    /// `∂annuity/∂forward`, non-zero for cash settlement only.
    pub(crate) fn annuity_forward_derivative(&self) -> f64 {
        match self.settlement {
            Settlement::Physical => 0.0,
            Settlement::Cash => {
                self.swap.notional() * self.swap.cash_annuity_derivatives(self.forward)[1] * self.settlement_discount
            }
        }
    }

    /// Curve sensitivity of `sign · annuity · price` given the option price
    /// and its derivative with respect to the forward.
    pub(crate) fn curve_sensitivity(
        &self,
        curves: &YieldCurveBundle,
        price: f64,
        price_forward: f64,
    ) -> Result<CurveSensitivity, PricingError> {
        let forward_sensitivity = self.swap.par_rate_curve_sensitivity(curves)?;
        let result = match self.settlement {
            Settlement::Physical => self
                .swap
                .annuity_curve_sensitivity(curves)?
                .multiplied_by(price)
                .plus(&forward_sensitivity.multiplied_by(self.annuity * price_forward)),
            Settlement::Cash => {
                let t = self.swap.settlement_time();
                let total_forward = self.annuity_forward_derivative() * price + self.annuity * price_forward;
                forward_sensitivity
                    .multiplied_by(total_forward)
                    .plus(&CurveSensitivity::of(
                        self.swap.funding_curve(),
                        vec![(t, -t * self.annuity * price)],
                    ))
            }
        };
        Ok(result.multiplied_by(self.sign))
    }
}
