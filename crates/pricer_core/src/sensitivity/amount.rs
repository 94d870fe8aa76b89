//! Present value tagged with its currency.

use crate::types::{Currency, CurrencyError};
use std::fmt;
use std::ops::Neg;

/// An amount of money in a given currency.
///
/// # Example
///
/// ```
/// use pricer_core::sensitivity::CurrencyAmount;
/// use pricer_core::types::Currency;
///
/// let pv = CurrencyAmount::new(Currency::EUR, 1_250.0);
/// let total = pv.plus(&CurrencyAmount::new(Currency::EUR, -250.0)).unwrap();
/// assert_eq!(total.amount(), 1_000.0);
/// assert!(pv.plus(&CurrencyAmount::new(Currency::USD, 1.0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrencyAmount {
    currency: Currency,
    amount: f64,
}

impl CurrencyAmount {
    /// Creates an amount.
    #[inline]
    pub fn new(currency: Currency, amount: f64) -> Self {
        Self { currency, amount }
    }

    /// Currency of the amount.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Numerical value.
    #[inline]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Sum of two amounts in the same currency.
    pub fn plus(&self, other: &CurrencyAmount) -> Result<Self, CurrencyError> {
        if self.currency != other.currency {
            return Err(CurrencyError::Mismatch {
                left: self.currency.code().to_string(),
                right: other.currency.code().to_string(),
            });
        }
        Ok(Self::new(self.currency, self.amount + other.amount))
    }

    /// The amount scaled by `factor`.
    #[inline]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self::new(self.currency, self.amount * factor)
    }
}

impl Neg for CurrencyAmount {
    type Output = CurrencyAmount;

    fn neg(self) -> Self::Output {
        self.multiplied_by(-1.0)
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.*}",
            self.currency,
            self.currency.decimal_places() as usize,
            self.amount
        )
    }
}
