//! Black volatility surfaces for swaptions.

use pricer_core::math::interpolators::BilinearInterpolator;

use super::ModelError;

/// Quoting convention of a [`BlackVolatilitySurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VolatilityKind {
    /// Lognormal (Black) volatility.
    #[default]
    Lognormal,
    /// Normal (Bachelier) volatility.
    Normal,
}

/// Swaption volatilities interpolated on (expiry, tenor).
#[derive(Debug, Clone, PartialEq)]
pub struct BlackVolatilitySurface {
    surface: BilinearInterpolator<f64>,
    kind: VolatilityKind,
}

impl BlackVolatilitySurface {
    /// Surface with `volatilities[i][j]` at `(expiries[i], tenors[j])`.
    pub fn new(
        expiries: &[f64],
        tenors: &[f64],
        volatilities: &[&[f64]],
        kind: VolatilityKind,
    ) -> Result<Self, ModelError> {
        if let Some((index, &value)) = volatilities
            .iter()
            .flat_map(|row| row.iter())
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(ModelError::InvalidVolatility { index, value });
        }
        Ok(Self {
            surface: BilinearInterpolator::new(expiries, tenors, volatilities)?,
            kind,
        })
    }

    /// A single volatility everywhere.
    pub fn flat(volatility: f64, kind: VolatilityKind) -> Result<Self, ModelError> {
        let axis = [0.0, 100.0];
        let row = [volatility, volatility];
        Self::new(&axis, &axis, &[&row, &row], kind)
    }

    /// Volatility at `(expiry, tenor)`.
    #[inline]
    pub fn volatility(&self, expiry: f64, tenor: f64) -> f64 {
        self.surface.interpolate(expiry, tenor)
    }

    /// Quoting convention.
    #[inline]
    pub fn kind(&self) -> VolatilityKind {
        self.kind
    }

    /// Copy with every node moved by `shift`.
    pub fn with_parallel_shift(&self, shift: f64) -> Self {
        Self {
            surface: self.surface.shifted(shift),
            kind: self.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolation() {
        let s = BlackVolatilitySurface::new(
            &[1.0, 5.0],
            &[1.0, 10.0],
            &[&[0.20, 0.18], &[0.22, 0.16]],
            VolatilityKind::Lognormal,
        )
        .unwrap();
        assert_relative_eq!(s.volatility(3.0, 1.0), 0.21, epsilon = 1e-15);
        assert_relative_eq!(s.volatility(10.0, 20.0), 0.16, epsilon = 1e-15);
        assert_relative_eq!(s.with_parallel_shift(0.01).volatility(1.0, 1.0), 0.21, epsilon = 1e-15);
    }

    #[test]
    fn test_rejects_negative_volatility() {
        assert!(matches!(
            BlackVolatilitySurface::flat(-0.01, VolatilityKind::Normal),
            Err(ModelError::InvalidVolatility { .. })
        ));
    }
}
