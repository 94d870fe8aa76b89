//! Named collection of discount and forward curves.

use super::CurveEnum;
use crate::market_data::error::MarketDataError;
use crate::types::Date;
use std::collections::BTreeMap;

/// Immutable name → curve mapping used by every pricing method.
///
/// Bumped scenarios are fresh bundles built with [`YieldCurveBundle::with_replaced`];
/// the original bundle is never modified.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{CurveEnum, YieldCurve, YieldCurveBundle};
///
/// let bundle = YieldCurveBundle::new()
///     .with_curve("Funding", CurveEnum::flat(0.05))
///     .with_curve("Forward", CurveEnum::flat(0.04));
///
/// let df = bundle.curve("Funding").unwrap().discount_factor(1.0).unwrap();
/// assert!((df - (-0.05_f64).exp()).abs() < 1e-14);
/// assert!(bundle.curve("Missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct YieldCurveBundle {
    curves: BTreeMap<String, CurveEnum<f64>>,
    reference_date: Option<Date>,
}

impl YieldCurveBundle {
    /// An empty bundle.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or overwrites) a named curve, builder style.
    pub fn with_curve(mut self, name: impl Into<String>, curve: CurveEnum<f64>) -> Self {
        self.curves.insert(name.into(), curve);
        self
    }

    /// Tags the bundle with the valuation date its times are measured from.
    pub fn with_reference_date(mut self, date: Date) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// The valuation date, when set.
    #[inline]
    pub fn reference_date(&self) -> Option<Date> {
        self.reference_date
    }

    /// Curve registered under `name`.
    ///
    /// # Errors
    ///
    /// `MarketDataError::CurveNotFound` when the name is absent.
    pub fn curve(&self, name: &str) -> Result<&CurveEnum<f64>, MarketDataError> {
        self.curves
            .get(name)
            .ok_or_else(|| MarketDataError::CurveNotFound {
                name: name.to_string(),
            })
    }

    /// Whether a curve with this name exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.curves.contains_key(name)
    }

    /// Curve names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }

    /// Number of curves.
    #[inline]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether the bundle is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// A copy of this bundle with the curve `name` replaced.
    ///
    /// # Errors
    ///
    /// `MarketDataError::CurveNotFound` when there is no curve to replace.
    pub fn with_replaced(
        &self,
        name: &str,
        curve: CurveEnum<f64>,
    ) -> Result<Self, MarketDataError> {
        if !self.contains(name) {
            return Err(MarketDataError::CurveNotFound {
                name: name.to_string(),
            });
        }
        Ok(self.clone().with_curve(name, curve))
    }
}
