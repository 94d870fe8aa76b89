//! European (physical and cash settled) and Bermudan swaptions.
//!
//! # Types
//!
//! - **Payer**: the underlying swap pays fixed (a call on the swap rate)
//! - **Receiver**: the underlying swap receives fixed (a put on the swap rate)
//!
//! The direction is read from the underlying swap; `is_long` selects the
//! holder's side. All variants are immutable: `with_long` builds a copy.

use pricer_core::types::time::Date;
use pricer_core::types::Currency;

use super::swap::FixedIborSwap;
use crate::instruments::InstrumentError;

fn check_expiry(expiry_time: f64, swap: &FixedIborSwap) -> Result<(), InstrumentError> {
    if expiry_time.is_nan() || expiry_time < 0.0 || expiry_time > swap.settlement_time() + 1e-10 {
        return Err(InstrumentError::InvalidExpiry {
            expiry: expiry_time,
        });
    }
    Ok(())
}

/// European swaption settled by entering the underlying swap.
#[derive(Debug, Clone, PartialEq)]
pub struct SwaptionPhysical {
    expiry_time: f64,
    underlying: FixedIborSwap,
    is_long: bool,
    reference_date: Option<Date>,
}

impl SwaptionPhysical {
    /// Creates the option to enter `underlying` at `expiry_time`.
    ///
    /// # Errors
    ///
    /// `InvalidExpiry` if the expiry is negative or after the swap settlement.
    pub fn new(
        expiry_time: f64,
        underlying: FixedIborSwap,
        is_long: bool,
    ) -> Result<Self, InstrumentError> {
        check_expiry(expiry_time, &underlying)?;
        Ok(Self {
            expiry_time,
            underlying,
            is_long,
            reference_date: None,
        })
    }

    /// Tags the swaption with the date its times are measured from.
    pub fn with_reference_date(mut self, date: Date) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// The same swaption on the other side.
    pub fn with_long(&self, is_long: bool) -> Self {
        Self {
            is_long,
            ..self.clone()
        }
    }

    /// The same option on another swap.
    ///
    /// # Errors
    ///
    /// `InvalidExpiry` if the new swap settles before the expiry.
    pub fn with_underlying(&self, underlying: FixedIborSwap) -> Result<Self, InstrumentError> {
        check_expiry(self.expiry_time, &underlying)?;
        Ok(Self {
            underlying,
            ..self.clone()
        })
    }

    /// Time to expiry.
    #[inline]
    pub fn expiry_time(&self) -> f64 {
        self.expiry_time
    }

    /// Underlying swap.
    #[inline]
    pub fn underlying(&self) -> &FixedIborSwap {
        &self.underlying
    }

    /// Whether the option is held.
    #[inline]
    pub fn is_long(&self) -> bool {
        self.is_long
    }

    /// Valuation date tag, when set.
    #[inline]
    pub fn reference_date(&self) -> Option<Date> {
        self.reference_date
    }

    /// Whether the option is a call on the swap rate (payer swaption).
    #[inline]
    pub fn is_call(&self) -> bool {
        self.underlying.is_payer()
    }

    /// Strike rate.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.underlying.fixed_rate()
    }

    /// Settlement time of the underlying swap.
    #[inline]
    pub fn settlement_time(&self) -> f64 {
        self.underlying.settlement_time()
    }

    /// Currency.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.underlying.currency()
    }
}

/// European swaption settled in cash against the cash annuity.
///
/// The payoff at settlement is N·A(S)·(ω(S − K))⁺ where A is the cash
/// annuity of the underlying at its own swap rate S.
#[derive(Debug, Clone, PartialEq)]
pub struct SwaptionCash {
    expiry_time: f64,
    underlying: FixedIborSwap,
    is_long: bool,
    reference_date: Option<Date>,
}

impl SwaptionCash {
    /// Creates a cash settled swaption paid at the swap settlement time.
    ///
    /// # Errors
    ///
    /// `InvalidExpiry` if the expiry is negative or after the swap settlement.
    pub fn new(
        expiry_time: f64,
        underlying: FixedIborSwap,
        is_long: bool,
    ) -> Result<Self, InstrumentError> {
        check_expiry(expiry_time, &underlying)?;
        Ok(Self {
            expiry_time,
            underlying,
            is_long,
            reference_date: None,
        })
    }

    /// Tags the swaption with the date its times are measured from.
    pub fn with_reference_date(mut self, date: Date) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// The same swaption on the other side.
    pub fn with_long(&self, is_long: bool) -> Self {
        Self {
            is_long,
            ..self.clone()
        }
    }

    /// Time to expiry.
    #[inline]
    pub fn expiry_time(&self) -> f64 {
        self.expiry_time
    }

    /// Settlement (cash payment) time.
    #[inline]
    pub fn settlement_time(&self) -> f64 {
        self.underlying.settlement_time()
    }

    /// Underlying swap.
    #[inline]
    pub fn underlying(&self) -> &FixedIborSwap {
        &self.underlying
    }

    /// Whether the option is held.
    #[inline]
    pub fn is_long(&self) -> bool {
        self.is_long
    }

    /// Valuation date tag, when set.
    #[inline]
    pub fn reference_date(&self) -> Option<Date> {
        self.reference_date
    }

    /// Whether the option is a call on the swap rate.
    #[inline]
    pub fn is_call(&self) -> bool {
        self.underlying.is_payer()
    }

    /// Strike rate.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.underlying.fixed_rate()
    }

    /// Absolute notional.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.underlying.notional()
    }

    /// Currency.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.underlying.currency()
    }
}

/// Physically settled swaption exercisable at several expiries, each into
/// the remaining part of one swap.
#[derive(Debug, Clone, PartialEq)]
pub struct SwaptionBermudan {
    expiry_times: Vec<f64>,
    underlyings: Vec<FixedIborSwap>,
    is_long: bool,
    reference_date: Option<Date>,
}

impl SwaptionBermudan {
    /// Creates a Bermudan from parallel expiry and underlying lists.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if the lists are empty, differ in length or the
    ///   expiries are not strictly increasing
    /// - `InvalidExpiry` if an expiry is after its swap settlement
    pub fn new(
        expiry_times: Vec<f64>,
        underlyings: Vec<FixedIborSwap>,
        is_long: bool,
    ) -> Result<Self, InstrumentError> {
        if expiry_times.is_empty() || expiry_times.len() != underlyings.len() {
            return Err(InstrumentError::InvalidParameter {
                message: format!(
                    "{} expiries for {} underlyings",
                    expiry_times.len(),
                    underlyings.len()
                ),
            });
        }
        if expiry_times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(InstrumentError::InvalidParameter {
                message: "expiry times must be strictly increasing".to_string(),
            });
        }
        for (expiry, swap) in expiry_times.iter().zip(&underlyings) {
            check_expiry(*expiry, swap)?;
        }
        Ok(Self {
            expiry_times,
            underlyings,
            is_long,
            reference_date: None,
        })
    }

    /// Tags the swaption with the date its times are measured from.
    pub fn with_reference_date(mut self, date: Date) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// The same swaption on the other side.
    pub fn with_long(&self, is_long: bool) -> Self {
        Self {
            is_long,
            ..self.clone()
        }
    }

    /// Exercise times.
    #[inline]
    pub fn expiry_times(&self) -> &[f64] {
        &self.expiry_times
    }

    /// Swap entered at each exercise.
    #[inline]
    pub fn underlyings(&self) -> &[FixedIborSwap] {
        &self.underlyings
    }

    /// Whether the option is held.
    #[inline]
    pub fn is_long(&self) -> bool {
        self.is_long
    }

    /// Valuation date tag, when set.
    #[inline]
    pub fn reference_date(&self) -> Option<Date> {
        self.reference_date
    }

    /// Currency.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.underlyings[0].currency()
    }

    /// The European swaption exercisable only at the `index`-th expiry.
    pub fn european(&self, index: usize) -> Option<SwaptionPhysical> {
        let expiry = *self.expiry_times.get(index)?;
        let underlying = self.underlyings.get(index)?.clone();
        Some(SwaptionPhysical {
            expiry_time: expiry,
            underlying,
            is_long: self.is_long,
            reference_date: self.reference_date,
        })
    }
}

/// Any swaption the pricing methods accept.
#[derive(Debug, Clone, PartialEq)]
pub enum Swaption {
    /// European, physical delivery.
    Physical(SwaptionPhysical),
    /// European, cash settled.
    Cash(SwaptionCash),
    /// Bermudan, physical delivery.
    Bermudan(SwaptionBermudan),
}

impl Swaption {
    /// Whether the option is held.
    pub fn is_long(&self) -> bool {
        match self {
            Swaption::Physical(s) => s.is_long(),
            Swaption::Cash(s) => s.is_long(),
            Swaption::Bermudan(s) => s.is_long(),
        }
    }

    /// Currency.
    pub fn currency(&self) -> Currency {
        match self {
            Swaption::Physical(s) => s.currency(),
            Swaption::Cash(s) => s.currency(),
            Swaption::Bermudan(s) => s.currency(),
        }
    }

    /// Valuation date tag, when set.
    pub fn reference_date(&self) -> Option<Date> {
        match self {
            Swaption::Physical(s) => s.reference_date(),
            Swaption::Cash(s) => s.reference_date(),
            Swaption::Bermudan(s) => s.reference_date(),
        }
    }

    /// First (or only) expiry time.
    pub fn expiry_time(&self) -> f64 {
        match self {
            Swaption::Physical(s) => s.expiry_time(),
            Swaption::Cash(s) => s.expiry_time(),
            Swaption::Bermudan(s) => s.expiry_times()[0],
        }
    }

    /// The swap entered at the first expiry.
    pub fn underlying(&self) -> &FixedIborSwap {
        match self {
            Swaption::Physical(s) => s.underlying(),
            Swaption::Cash(s) => s.underlying(),
            Swaption::Bermudan(s) => &s.underlyings()[0],
        }
    }

    /// Every curve name the swaption needs.
    pub fn curve_names(&self) -> Vec<&str> {
        match self {
            Swaption::Bermudan(s) => {
                let mut names: Vec<&str> =
                    s.underlyings().iter().flat_map(FixedIborSwap::curve_names).collect();
                names.sort_unstable();
                names.dedup();
                names
            }
            other => other.underlying().curve_names(),
        }
    }

    /// The same swaption on the other side.
    pub fn with_long(&self, is_long: bool) -> Self {
        match self {
            Swaption::Physical(s) => Swaption::Physical(s.with_long(is_long)),
            Swaption::Cash(s) => Swaption::Cash(s.with_long(is_long)),
            Swaption::Bermudan(s) => Swaption::Bermudan(s.with_long(is_long)),
        }
    }

    /// Short description used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Swaption::Physical(_) => "physical",
            Swaption::Cash(_) => "cash",
            Swaption::Bermudan(_) => "bermudan",
        }
    }
}

impl From<SwaptionPhysical> for Swaption {
    fn from(s: SwaptionPhysical) -> Self {
        Swaption::Physical(s)
    }
}

impl From<SwaptionCash> for Swaption {
    fn from(s: SwaptionCash) -> Self {
        Swaption::Cash(s)
    }
}

impl From<SwaptionBermudan> for Swaption {
    fn from(s: SwaptionBermudan) -> Self {
        Swaption::Bermudan(s)
    }
}
