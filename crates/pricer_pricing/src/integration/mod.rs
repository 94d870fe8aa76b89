//! Swaption pricing by numerical integration over the model factors.
//!
//! European swaptions integrate the exercised payoff against the factor
//! density with composite Gauss-Legendre rules, split at the exercise
//! boundary when it is known. Bermudan swaptions in Hull-White are valued
//! by backward recursion on a grid of the state variable.
//!
//! ```rust,ignore
//! use pricer_pricing::integration::{IntegrationConfig, SwaptionHullWhiteIntegrationMethod};
//!
//! let method = SwaptionHullWhiteIntegrationMethod::new(IntegrationConfig::default())?;
//! let pv = method.present_value(&bermudan, &curves, &hull_white)?;
//! ```

mod g2pp;
mod hull_white;

pub use g2pp::SwaptionG2ppIntegrationMethod;
pub use hull_white::SwaptionHullWhiteIntegrationMethod;

use pricer_core::math::quadrature::GaussLegendre;
use pricer_core::types::PricingError;

/// Smallest Bermudan grid.
const MIN_GRID_POINTS: usize = 3;

/// Discretisation of the integration methods.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegrationConfig {
    /// Sub-intervals of each integration range.
    pub panels: usize,
    /// Gauss-Legendre nodes per panel.
    pub nodes: usize,
    /// Truncation of the European integrals, in standard deviations.
    pub range: f64,
    /// Points of the Bermudan state grid.
    pub grid_points: usize,
    /// Half-width of the Bermudan state grid, in standard deviations.
    pub grid_range: f64,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            panels: 20,
            nodes: 16,
            range: 10.0,
            grid_points: 401,
            grid_range: 8.0,
        }
    }
}

impl IntegrationConfig {
    /// Checks every field.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for zero panels or nodes, a grid of fewer than three
    /// points or a non-positive range.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.panels == 0 || self.nodes == 0 {
            return Err(PricingError::InvalidInput(format!(
                "integration needs panels and nodes, got {} and {}",
                self.panels, self.nodes
            )));
        }
        if self.grid_points < MIN_GRID_POINTS {
            return Err(PricingError::InvalidInput(format!(
                "Bermudan grid needs at least {MIN_GRID_POINTS} points, got {}",
                self.grid_points
            )));
        }
        if !(self.range > 0.0 && self.grid_range > 0.0) {
            return Err(PricingError::InvalidInput(format!(
                "integration ranges must be positive, got {} and {}",
                self.range, self.grid_range
            )));
        }
        Ok(())
    }

    pub(crate) fn rule(&self) -> Result<GaussLegendre, PricingError> {
        self.validate()?;
        Ok(GaussLegendre::new(self.nodes)?)
    }
}

/// `e^{−x²/2}/√(2π)`.
#[inline]
pub(crate) fn standard_density(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(IntegrationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let base = IntegrationConfig::default();
        for config in [
            IntegrationConfig { panels: 0, ..base },
            IntegrationConfig { nodes: 0, ..base },
            IntegrationConfig { grid_points: 2, ..base },
            IntegrationConfig { range: 0.0, ..base },
            IntegrationConfig { grid_range: f64::NAN, ..base },
        ] {
            assert!(matches!(config.validate(), Err(PricingError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_rule_integrates_density() {
        let rule = IntegrationConfig::default().rule().unwrap();
        let mass = rule.integrate_composite(standard_density, -10.0, 10.0, 20);
        assert!((mass - 1.0).abs() < 1e-12);
    }
}
