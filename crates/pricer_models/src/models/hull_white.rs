//! Hull-White one-factor model with piecewise-constant volatility.
//!
//! The short rate follows
//! ```text
//! dr(t) = [θ(t) - a·r(t)] dt + σ(t) dW(t)
//! ```
//! with `θ` fitted to the initial discount curve. Under the forward measure
//! of a date `θ`, the bond prices at `θ` are
//! ```text
//! P(θ, t) = P(0, t) / P(0, θ) · exp(-α(t)·X - α(t)²/2),   X ~ N(0, 1)
//! ```
//! where `α` is given by [`alpha`]. Every Hull-White pricer in the
//! workspace is built on this representation.
//!
//! ## Usage
//!
//! ```
//! use pricer_models::models::hull_white::{alpha, HullWhiteParameters};
//!
//! let params = HullWhiteParameters::new(0.01, vec![0.01, 0.011], vec![1.0]).unwrap();
//! let a = alpha(&params, 0.0, 2.0, 2.0, 7.0);
//! assert!(a > 0.0);
//! ```

use pricer_core::math::solvers::{BrentSolver, SolverConfig};
use pricer_core::types::SolverError;

use super::{exp_integral, piecewise_exp_integral, piecewise_segments, validate_piecewise, ModelError};

/// Hull-White parameters: mean reversion and volatility per knot interval.
///
/// `volatilities[i]` applies on `[knot_times[i - 1], knot_times[i])`, so
/// there is one more volatility than knots.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HullWhiteParameters {
    mean_reversion: f64,
    volatilities: Vec<f64>,
    knot_times: Vec<f64>,
}

impl HullWhiteParameters {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// - `InvalidMeanReversion` unless `mean_reversion > 0`
    /// - `DimensionMismatch` unless `volatilities.len() == knot_times.len() + 1`
    /// - `NonIncreasingKnots`, `InvalidVolatility` from the knot checks
    pub fn new(
        mean_reversion: f64,
        volatilities: Vec<f64>,
        knot_times: Vec<f64>,
    ) -> Result<Self, ModelError> {
        if !(mean_reversion > 0.0 && mean_reversion.is_finite()) {
            return Err(ModelError::InvalidMeanReversion {
                value: mean_reversion,
            });
        }
        validate_piecewise(&knot_times, &volatilities)?;
        Ok(Self {
            mean_reversion,
            volatilities,
            knot_times,
        })
    }

    /// Constant volatility.
    pub fn constant(mean_reversion: f64, volatility: f64) -> Result<Self, ModelError> {
        Self::new(mean_reversion, vec![volatility], Vec::new())
    }

    /// Mean reversion speed `a`.
    #[inline]
    pub fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    /// Piecewise volatilities.
    #[inline]
    pub fn volatilities(&self) -> &[f64] {
        &self.volatilities
    }

    /// Volatility knot times.
    #[inline]
    pub fn knot_times(&self) -> &[f64] {
        &self.knot_times
    }

    /// Copy with volatility `index` moved by `delta`.
    pub fn with_bumped_knot(&self, index: usize, delta: f64) -> Result<Self, ModelError> {
        let value = self.volatility_at_index(index)? + delta;
        self.with_knot_volatility(index, value)
    }

    /// Copy with volatility `index` set to `value`.
    pub fn with_knot_volatility(&self, index: usize, value: f64) -> Result<Self, ModelError> {
        self.volatility_at_index(index)?;
        let mut volatilities = self.volatilities.clone();
        volatilities[index] = value;
        Self::new(self.mean_reversion, volatilities, self.knot_times.clone())
    }

    /// Copy with all volatilities replaced.
    pub fn with_volatilities(&self, volatilities: Vec<f64>) -> Result<Self, ModelError> {
        Self::new(self.mean_reversion, volatilities, self.knot_times.clone())
    }

    fn volatility_at_index(&self, index: usize) -> Result<f64, ModelError> {
        self.volatilities
            .get(index)
            .copied()
            .ok_or(ModelError::IndexOutOfRange {
                index,
                len: self.volatilities.len(),
            })
    }
}

/// Standard deviation of `ln P(end, maturity) / P(end, numeraire)` over
/// `[start, end]`:
/// ```text
/// α = (e^{-a·u} - e^{-a·v}) / a · sqrt(∫_start^end σ(s)² e^{2as} ds)
/// ```
/// with `u` the numeraire time and `v` the bond maturity.
pub fn alpha(
    params: &HullWhiteParameters,
    start: f64,
    end: f64,
    numeraire_time: f64,
    maturity: f64,
) -> f64 {
    let a = params.mean_reversion;
    let factor = ((-a * numeraire_time).exp() - (-a * maturity).exp()) / a;
    factor * factor_variance(params, start, end).sqrt()
}

/// `∫_start^end σ(s)² e^{2as} ds`, the variance accumulated by the
/// rescaled factor.
pub fn factor_variance(params: &HullWhiteParameters, start: f64, end: f64) -> f64 {
    piecewise_exp_integral(
        &params.knot_times,
        &params.volatilities,
        &params.volatilities,
        2.0 * params.mean_reversion,
        start,
        end,
    )
}

/// [`alpha`] together with its derivative with respect to each volatility.
pub fn alpha_volatility_adjoint(
    params: &HullWhiteParameters,
    start: f64,
    end: f64,
    numeraire_time: f64,
    maturity: f64,
) -> (f64, Vec<f64>) {
    let a = params.mean_reversion;
    let factor = ((-a * numeraire_time).exp() - (-a * maturity).exp()) / a;
    let mut pieces = vec![0.0; params.volatilities.len()];
    for (i, lo, hi) in piecewise_segments(&params.knot_times, start, end) {
        pieces[i] += exp_integral(2.0 * a, lo, hi);
    }
    let variance: f64 = pieces
        .iter()
        .zip(&params.volatilities)
        .map(|(w, s)| w * s * s)
        .sum();
    let sqrt_variance = variance.sqrt();
    let alpha = factor * sqrt_variance;
    if sqrt_variance == 0.0 {
        return (alpha, vec![0.0; pieces.len()]);
    }
    // dα/dσ_i = factor · σ_i · w_i / sqrt(V)
    let derivatives = pieces
        .iter()
        .zip(&params.volatilities)
        .map(|(w, s)| factor * s * w / sqrt_variance)
        .collect();
    (alpha, derivatives)
}

/// Exercise boundary `κ` solving
/// ```text
/// Σ dcf_i · exp(-α_i²/2 - α_i·κ) = 0
/// ```
/// for discounted cash flows of alternating sign.
///
/// # Errors
///
/// `SolverError` if no sign change is found or the search does not converge.
pub fn kappa(discounted_cash_flows: &[f64], alphas: &[f64]) -> Result<f64, SolverError> {
    let value = |x: f64| -> Result<f64, SolverError> {
        Ok(discounted_cash_flows
            .iter()
            .zip(alphas)
            .map(|(dcf, a)| dcf * (-0.5 * a * a - a * x).exp())
            .sum())
    };
    let solver = BrentSolver::new(SolverConfig::new(1e-12, 200));
    solver.find_root_bracketed(value, -2.0, 2.0, f64::NEG_INFINITY, f64::INFINITY)
}

fn weighted_sums(x: f64, amounts: &[f64], alphas: &[f64]) -> [f64; 4] {
    let mut sums = [0.0; 4];
    for (c, a) in amounts.iter().zip(alphas) {
        let term = c * (-a * x - 0.5 * a * a).exp();
        sums[0] += term;
        sums[1] -= a * term;
        sums[2] += a * a * term;
        sums[3] -= a * a * a * term;
    }
    sums
}

/// Swap rate as a function of the Gaussian factor `x`:
/// ```text
/// S(x) = Σ_ibor c_i e^{-α_i x - α_i²/2} / Σ_fixed d_j e^{-β_j x - β_j²/2}
/// ```
/// `discounted_ibor` are the ibor cash-flow equivalents discounted to
/// today with a positive first amount; `discounted_fixed` are the
/// discounted fixed accruals `δ_j·P(0, t_j)` per unit notional.
pub fn swap_rate(
    x: f64,
    discounted_fixed: &[f64],
    alpha_fixed: &[f64],
    discounted_ibor: &[f64],
    alpha_ibor: &[f64],
) -> f64 {
    let f = weighted_sums(x, discounted_ibor, alpha_ibor)[0];
    let g = weighted_sums(x, discounted_fixed, alpha_fixed)[0];
    f / g
}

/// [`swap_rate`] and its first three derivatives with respect to `x`.
pub fn swap_rate_derivatives(
    x: f64,
    discounted_fixed: &[f64],
    alpha_fixed: &[f64],
    discounted_ibor: &[f64],
    alpha_ibor: &[f64],
) -> [f64; 4] {
    let f = weighted_sums(x, discounted_ibor, alpha_ibor);
    let g = weighted_sums(x, discounted_fixed, alpha_fixed);
    let s0 = f[0] / g[0];
    let s1 = (f[1] - s0 * g[1]) / g[0];
    let s2 = (f[2] - 2.0 * s1 * g[1] - s0 * g[2]) / g[0];
    let s3 = (f[3] - 3.0 * s2 * g[1] - 3.0 * s1 * g[2] - s0 * g[3]) / g[0];
    [s0, s1, s2, s3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> HullWhiteParameters {
        HullWhiteParameters::new(
            0.01,
            vec![0.01, 0.011, 0.012, 0.013, 0.014],
            vec![0.5, 1.0, 2.0, 5.0],
        )
        .unwrap()
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            HullWhiteParameters::new(0.0, vec![0.01], vec![]),
            Err(ModelError::InvalidMeanReversion { value: 0.0 })
        );
        assert!(HullWhiteParameters::new(0.01, vec![0.01], vec![1.0]).is_err());
        assert!(params().with_bumped_knot(5, 0.001).is_err());
    }

    #[test]
    fn test_bump_is_copy_on_write() {
        let p = params();
        let bumped = p.with_bumped_knot(2, 0.001).unwrap();
        assert_relative_eq!(bumped.volatilities()[2], 0.013, epsilon = 1e-15);
        assert_relative_eq!(p.volatilities()[2], 0.012, epsilon = 1e-15);
    }

    #[test]
    fn test_alpha_constant_volatility() {
        let p = HullWhiteParameters::constant(0.05, 0.01).unwrap();
        let (a, sigma, theta, t) = (0.05_f64, 0.01_f64, 2.0_f64, 5.0_f64);
        let expected = ((-a * theta).exp() - (-a * t).exp()) / a
            * (sigma * sigma * ((2.0 * a * theta).exp() - 1.0) / (2.0 * a)).sqrt();
        assert_relative_eq!(alpha(&p, 0.0, theta, theta, t), expected, max_relative = 1e-13);
    }

    #[test]
    fn test_factor_variance_is_additive() {
        let p = params();
        let whole = factor_variance(&p, 0.0, 4.0);
        let split = factor_variance(&p, 0.0, 1.5) + factor_variance(&p, 1.5, 4.0);
        assert_relative_eq!(whole, split, max_relative = 1e-14);
        assert_eq!(factor_variance(&p, 2.0, 2.0), 0.0);
    }

    #[test]
    fn test_alpha_adjoint_matches_finite_difference() {
        let p = params();
        let (value, derivatives) = alpha_volatility_adjoint(&p, 0.0, 3.0, 3.0, 8.0);
        assert_relative_eq!(value, alpha(&p, 0.0, 3.0, 3.0, 8.0), max_relative = 1e-14);
        let h = 1e-7;
        for (i, d) in derivatives.iter().enumerate() {
            let up = alpha(&p.with_bumped_knot(i, h).unwrap(), 0.0, 3.0, 3.0, 8.0);
            let down = alpha(&p.with_bumped_knot(i, -h).unwrap(), 0.0, 3.0, 3.0, 8.0);
            assert_relative_eq!(*d, (up - down) / (2.0 * h), epsilon = 1e-8);
        }
        assert_eq!(derivatives[4], 0.0);
    }

    #[test]
    fn test_kappa_zeroes_swap_value() {
        let dcf = [1.0, -0.03, -0.03, -0.97];
        let alphas = [0.01, 0.015, 0.02, 0.025];
        let k = kappa(&dcf, &alphas).unwrap();
        let residual: f64 = dcf
            .iter()
            .zip(&alphas)
            .map(|(c, a)| c * (-0.5 * a * a - a * k).exp())
            .sum();
        assert!(residual.abs() < 1e-10);
    }

    #[test]
    fn test_swap_rate_derivatives() {
        let fixed = [0.48, 0.46, 0.44];
        let alpha_fixed = [0.1, 0.2, 0.3];
        let ibor = [1.0, -0.9];
        let alpha_ibor = [0.05, 0.3];
        let x = 0.3;
        let d = swap_rate_derivatives(x, &fixed, &alpha_fixed, &ibor, &alpha_ibor);
        let s = |y: f64| swap_rate(y, &fixed, &alpha_fixed, &ibor, &alpha_ibor);
        assert_relative_eq!(d[0], s(x), max_relative = 1e-14);
        let h = 1e-2;
        assert_relative_eq!(d[1], (s(x + h) - s(x - h)) / (2.0 * h), max_relative = 1e-4);
        assert_relative_eq!(
            d[2],
            (s(x + h) - 2.0 * s(x) + s(x - h)) / (h * h),
            max_relative = 1e-4
        );
        let d3 = (s(x + 2.0 * h) - 2.0 * s(x + h) + 2.0 * s(x - h) - s(x - 2.0 * h)) / (2.0 * h * h * h);
        assert_relative_eq!(d[3], d3, max_relative = 1e-3);
    }
}
