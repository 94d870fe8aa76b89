//! G2++ two-factor Gaussian short-rate model.
//!
//! ```text
//! r(t) = φ(t) + x₁(t) + x₂(t)
//! dx_k = -a_k x_k dt + σ_k(t) dW_k,   d⟨W₁, W₂⟩ = ρ dt
//! ```
//!
//! Bond prices at `θ` under the `θ`-forward measure are
//! ```text
//! P(θ, t) = P(0, t)/P(0, θ) · exp(-α(t)ᵀX - α(t)ᵀΓα(t)/2),   X ~ N(0, Γ)
//! ```
//! with `α_k(t) = H_k(t) - H_k(θ)`, `H_k` the [`maturity_loadings`] and
//! `Γ` the [`factor_covariance`] at `θ`.

use super::{piecewise_exp_integral, validate_piecewise, ModelError};

/// G2++ parameters. Both factors share the same volatility knots.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct G2ppParameters {
    mean_reversions: [f64; 2],
    volatilities: [Vec<f64>; 2],
    knot_times: Vec<f64>,
    correlation: f64,
}

impl G2ppParameters {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// - `InvalidMeanReversion` unless both mean reversions are positive
    /// - `InvalidParameter` unless `-1 < correlation < 1`
    /// - knot/volatility shape errors for either factor
    pub fn new(
        mean_reversions: [f64; 2],
        volatilities: [Vec<f64>; 2],
        knot_times: Vec<f64>,
        correlation: f64,
    ) -> Result<Self, ModelError> {
        for &a in &mean_reversions {
            if !(a > 0.0 && a.is_finite()) {
                return Err(ModelError::InvalidMeanReversion { value: a });
            }
        }
        if !(correlation > -1.0 && correlation < 1.0) {
            return Err(ModelError::InvalidParameter {
                name: "correlation",
                value: correlation,
            });
        }
        for vols in &volatilities {
            validate_piecewise(&knot_times, vols)?;
        }
        Ok(Self {
            mean_reversions,
            volatilities,
            knot_times,
            correlation,
        })
    }

    /// Mean reversion of each factor.
    #[inline]
    pub fn mean_reversions(&self) -> [f64; 2] {
        self.mean_reversions
    }

    /// Piecewise volatilities of each factor.
    #[inline]
    pub fn volatilities(&self) -> &[Vec<f64>; 2] {
        &self.volatilities
    }

    /// Volatility knot times.
    #[inline]
    pub fn knot_times(&self) -> &[f64] {
        &self.knot_times
    }

    /// Factor correlation.
    #[inline]
    pub fn correlation(&self) -> f64 {
        self.correlation
    }

    /// Number of volatility pieces per factor.
    pub fn number_of_pieces(&self) -> usize {
        self.knot_times.len() + 1
    }

    /// Copy with the volatility of `factor` on piece `index` moved by `delta`.
    pub fn with_bumped_knot(&self, factor: usize, index: usize, delta: f64) -> Result<Self, ModelError> {
        let len = self.number_of_pieces();
        if factor > 1 || index >= len {
            return Err(ModelError::IndexOutOfRange {
                index: factor * len + index,
                len: 2 * len,
            });
        }
        let mut volatilities = self.volatilities.clone();
        volatilities[factor][index] += delta;
        Self::new(
            self.mean_reversions,
            volatilities,
            self.knot_times.clone(),
            self.correlation,
        )
    }

    /// Copy with both factor volatilities on piece `index` multiplied by
    /// `factor`. Pieces after `index` take the same multiplied values when
    /// `fill_forward` is set.
    pub fn with_scaled_volatilities(
        &self,
        index: usize,
        factor: f64,
        fill_forward: bool,
    ) -> Result<Self, ModelError> {
        let len = self.number_of_pieces();
        if index >= len {
            return Err(ModelError::IndexOutOfRange { index, len });
        }
        let mut volatilities = self.volatilities.clone();
        for vols in volatilities.iter_mut() {
            let value = vols[index] * factor;
            let last = if fill_forward { len } else { index + 1 };
            for v in &mut vols[index..last] {
                *v = value;
            }
        }
        Self::new(
            self.mean_reversions,
            volatilities,
            self.knot_times.clone(),
            self.correlation,
        )
    }
}

/// `H_k(t) = (1 - e^{-a_k t}) / a_k` for each time.
pub fn maturity_loadings(params: &G2ppParameters, times: &[f64]) -> Vec<[f64; 2]> {
    let [a0, a1] = params.mean_reversions;
    times
        .iter()
        .map(|&t| [(1.0 - (-a0 * t).exp()) / a0, (1.0 - (-a1 * t).exp()) / a1])
        .collect()
}

/// Covariance of the rescaled factors accumulated over `[start, end]`:
/// ```text
/// Γ_kl = ρ_kl ∫ σ_k(s) σ_l(s) e^{(a_k + a_l)s} ds
/// ```
pub fn factor_covariance(params: &G2ppParameters, start: f64, end: f64) -> [[f64; 2]; 2] {
    let a = params.mean_reversions;
    let v = &params.volatilities;
    let k = &params.knot_times;
    let g00 = piecewise_exp_integral(k, &v[0], &v[0], 2.0 * a[0], start, end);
    let g11 = piecewise_exp_integral(k, &v[1], &v[1], 2.0 * a[1], start, end);
    let g01 = params.correlation * piecewise_exp_integral(k, &v[0], &v[1], a[0] + a[1], start, end);
    [[g00, g01], [g01, g11]]
}

/// `αᵀΓβ` for two loading differences.
#[inline]
pub fn quadratic_form(alpha: &[f64; 2], gamma: &[[f64; 2]; 2], beta: &[f64; 2]) -> f64 {
    alpha[0] * (gamma[0][0] * beta[0] + gamma[0][1] * beta[1])
        + alpha[1] * (gamma[1][0] * beta[0] + gamma[1][1] * beta[1])
}

/// Lower Cholesky factor of a 2×2 covariance.
pub fn cholesky(gamma: &[[f64; 2]; 2]) -> [[f64; 2]; 2] {
    let l00 = gamma[0][0].max(0.0).sqrt();
    let l10 = if l00 > 0.0 { gamma[1][0] / l00 } else { 0.0 };
    let l11 = (gamma[1][1] - l10 * l10).max(0.0).sqrt();
    [[l00, 0.0], [l10, l11]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::models::hull_white::{alpha, HullWhiteParameters};

    fn params() -> G2ppParameters {
        G2ppParameters::new(
            [0.01, 0.30],
            [vec![0.01, 0.0105, 0.011], vec![0.005, 0.006, 0.007]],
            vec![1.0, 3.0],
            -0.30,
        )
        .unwrap()
    }

    #[test]
    fn test_validation() {
        assert!(G2ppParameters::new([0.01, 0.3], [vec![0.01], vec![0.01]], vec![], 1.0).is_err());
        assert!(G2ppParameters::new([0.0, 0.3], [vec![0.01], vec![0.01]], vec![], 0.0).is_err());
        assert!(params().with_bumped_knot(2, 0, 0.001).is_err());
    }

    #[test]
    fn test_one_factor_reduction() {
        // With the second factor switched off the bond variance is the Hull-White one.
        let g2 = G2ppParameters::new(
            [0.05, 0.3],
            [vec![0.01, 0.012], vec![0.0, 0.0]],
            vec![2.0],
            0.0,
        )
        .unwrap();
        let hw = HullWhiteParameters::new(0.05, vec![0.01, 0.012], vec![2.0]).unwrap();
        let (theta, t) = (4.0, 9.0);
        let h = maturity_loadings(&g2, &[theta, t]);
        let diff = [h[1][0] - h[0][0], h[1][1] - h[0][1]];
        let gamma = factor_covariance(&g2, 0.0, theta);
        let variance = quadratic_form(&diff, &gamma, &diff);
        assert_relative_eq!(variance.sqrt(), alpha(&hw, 0.0, theta, theta, t), max_relative = 1e-12);
    }

    #[test]
    fn test_scaled_volatilities() {
        let p = params().with_scaled_volatilities(1, 2.0, true).unwrap();
        assert_eq!(p.volatilities()[0], vec![0.01, 0.021, 0.021]);
        assert_eq!(p.volatilities()[1], vec![0.005, 0.012, 0.012]);
    }

    #[test]
    fn test_cholesky_reproduces_covariance() {
        let gamma = factor_covariance(&params(), 0.0, 5.0);
        let l = cholesky(&gamma);
        assert_relative_eq!(l[0][0] * l[0][0], gamma[0][0], max_relative = 1e-12);
        assert_relative_eq!(l[1][0] * l[0][0], gamma[1][0], max_relative = 1e-12);
        assert_relative_eq!(l[1][0] * l[1][0] + l[1][1] * l[1][1], gamma[1][1], max_relative = 1e-12);
    }
}
