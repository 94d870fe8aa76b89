//! Fixed-order Gaussian quadrature rules.
//!
//! - [`GaussLegendre`]: ∫_a^b f(x) dx, exact for polynomials of degree 2n − 1
//! - [`GaussHermite`]: E[f(Z)] for a standard normal Z
//!
//! Nodes are computed once by Newton iteration on the orthogonal
//! polynomial recurrences and reused for every integral.
//!
//! # Example
//!
//! ```
//! use pricer_core::math::quadrature::{GaussHermite, GaussLegendre};
//!
//! let gl = GaussLegendre::new(10).unwrap();
//! let area = gl.integrate(|x: f64| x.sin(), 0.0, std::f64::consts::PI);
//! assert!((area - 2.0).abs() < 1e-12);
//!
//! let gh = GaussHermite::new(20).unwrap();
//! let second_moment = gh.expectation(|z: f64| z * z);
//! assert!((second_moment - 1.0).abs() < 1e-12);
//! ```

use crate::types::SolverError;
use std::f64::consts::PI;

const NEWTON_TOLERANCE: f64 = 3e-14;
const NEWTON_MAX_ITERATIONS: usize = 100;

/// Gauss-Legendre rule with `n` nodes on `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// Builds the rule.
    ///
    /// # Errors
    ///
    /// `NumericalInstability` if `n == 0` or a node fails to converge.
    pub fn new(n: usize) -> Result<Self, SolverError> {
        if n == 0 {
            return Err(SolverError::NumericalInstability(
                "Gauss-Legendre rule needs at least one node".to_string(),
            ));
        }
        let mut nodes = vec![0.0; n];
        let mut weights = vec![0.0; n];
        let m = n.div_ceil(2);
        for i in 0..m {
            let mut z = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
            let mut converged = false;
            for _ in 0..NEWTON_MAX_ITERATIONS {
                let (p, dp) = legendre(n, z);
                let z_next = z - p / dp;
                let done = (z_next - z).abs() < NEWTON_TOLERANCE;
                z = z_next;
                if done {
                    converged = true;
                    break;
                }
            }
            if !converged {
                return Err(SolverError::MaxIterationsExceeded {
                    iterations: NEWTON_MAX_ITERATIONS,
                    last: z,
                    residual: legendre(n, z).0,
                });
            }
            let (_, dp) = legendre(n, z);
            let w = 2.0 / ((1.0 - z * z) * dp * dp);
            nodes[i] = -z;
            nodes[n - 1 - i] = z;
            weights[i] = w;
            weights[n - 1 - i] = w;
        }
        Ok(Self { nodes, weights })
    }

    /// Number of nodes.
    #[inline]
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes on `[-1, 1]`, increasing.
    #[inline]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Weights matching [`GaussLegendre::nodes`].
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// ∫_a^b f(x) dx.
    pub fn integrate<F>(&self, mut f: F, a: f64, b: f64) -> f64
    where
        F: FnMut(f64) -> f64,
    {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (b + a);
        half * self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(mid + half * x))
            .sum::<f64>()
    }

    /// ∫_a^b f(x) dx split into `panels` equal sub-intervals.
    pub fn integrate_composite<F>(&self, mut f: F, a: f64, b: f64, panels: usize) -> f64
    where
        F: FnMut(f64) -> f64,
    {
        let panels = panels.max(1);
        let width = (b - a) / panels as f64;
        (0..panels)
            .map(|k| {
                let lo = a + width * k as f64;
                self.integrate(&mut f, lo, lo + width)
            })
            .sum()
    }

    /// Abscissas and weights mapped onto `[a, b]`.
    pub fn mapped(&self, a: f64, b: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (b + a);
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(move |(&x, &w)| (mid + half * x, half * w))
    }
}

/// P_n(z) and P_n'(z) by the three-term recurrence.
fn legendre(n: usize, z: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for j in 0..n {
        let p3 = p2;
        p2 = p1;
        let jf = j as f64;
        p1 = ((2.0 * jf + 1.0) * z * p2 - jf * p3) / (jf + 1.0);
    }
    let dp = n as f64 * (z * p1 - p2) / (z * z - 1.0);
    (p1, dp)
}

/// Gauss-Hermite rule for expectations under the standard normal density.
///
/// Nodes are rescaled from the physicists' weight `exp(-x²)` so that
/// `expectation(f) ≈ ∫ f(z) φ(z) dz`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussHermite {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussHermite {
    /// Builds the rule.
    ///
    /// # Errors
    ///
    /// `NumericalInstability` if `n == 0`, `MaxIterationsExceeded` if a node
    /// fails to converge.
    pub fn new(n: usize) -> Result<Self, SolverError> {
        if n == 0 {
            return Err(SolverError::NumericalInstability(
                "Gauss-Hermite rule needs at least one node".to_string(),
            ));
        }
        let pim4 = PI.powf(-0.25);
        let nf = n as f64;
        let m = n.div_ceil(2);
        let mut x = vec![0.0; n];
        let mut w = vec![0.0; n];
        let mut z = 0.0_f64;

        for i in 0..m {
            z = match i {
                0 => (2.0 * nf + 1.0).sqrt() - 1.85575 * (2.0 * nf + 1.0).powf(-0.166_67),
                1 => z - 1.14 * nf.powf(0.426) / z,
                2 => 1.86 * z - 0.86 * x[0],
                3 => 1.91 * z - 0.91 * x[1],
                _ => 2.0 * z - x[i - 2],
            };
            let mut converged = false;
            let mut pp = 0.0;
            for _ in 0..NEWTON_MAX_ITERATIONS {
                let (p1, derivative) = hermite(n, z, pim4);
                pp = derivative;
                let z_prev = z;
                z = z_prev - p1 / pp;
                if (z - z_prev).abs() <= NEWTON_TOLERANCE {
                    converged = true;
                    break;
                }
            }
            if !converged {
                return Err(SolverError::MaxIterationsExceeded {
                    iterations: NEWTON_MAX_ITERATIONS,
                    last: z,
                    residual: hermite(n, z, pim4).0,
                });
            }
            x[i] = z;
            x[n - 1 - i] = -z;
            w[i] = 2.0 / (pp * pp);
            w[n - 1 - i] = w[i];
        }

        // physicists' rule on exp(-x²) → standard normal expectation
        let scale = 1.0 / PI.sqrt();
        let mut pairs: Vec<(f64, f64)> = x
            .into_iter()
            .zip(w)
            .map(|(xi, wi)| (xi * std::f64::consts::SQRT_2, wi * scale))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (nodes, weights) = pairs.into_iter().unzip();
        Ok(Self { nodes, weights })
    }

    /// Number of nodes.
    #[inline]
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Standard-normal nodes, increasing.
    #[inline]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Probability weights (sum to one).
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// E[f(Z)], Z ~ N(0, 1).
    pub fn expectation<F>(&self, mut f: F) -> f64
    where
        F: FnMut(f64) -> f64,
    {
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(|(&z, &w)| w * f(z))
            .sum()
    }
}

/// Orthonormal Hermite polynomial value and derivative at `z`.
fn hermite(n: usize, z: f64, pim4: f64) -> (f64, f64) {
    let mut p1 = pim4;
    let mut p2 = 0.0;
    for j in 0..n {
        let p3 = p2;
        p2 = p1;
        let jf = (j + 1) as f64;
        p1 = z * (2.0 / jf).sqrt() * p2 - ((jf - 1.0) / jf).sqrt() * p3;
    }
    let pp = (2.0 * n as f64).sqrt() * p2;
    (p1, pp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_order_rejected() {
        assert!(GaussLegendre::new(0).is_err());
        assert!(GaussHermite::new(0).is_err());
    }

    #[test]
    fn test_legendre_weights_sum_to_two() {
        for n in [1, 2, 5, 16, 40] {
            let rule = GaussLegendre::new(n).unwrap();
            assert_abs_diff_eq!(rule.weights().iter().sum::<f64>(), 2.0, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_legendre_exact_for_polynomials() {
        let rule = GaussLegendre::new(4).unwrap();
        // degree 7 polynomial
        let value = rule.integrate(|x| x.powi(7) + 3.0 * x.powi(6) - x, -1.0, 2.0);
        let exact = (2f64.powi(8) - 1.0) / 8.0 + 3.0 * (2f64.powi(7) + 1.0) / 7.0 - 1.5;
        assert_abs_diff_eq!(value, exact, epsilon = 1e-11);
    }

    #[test]
    fn test_legendre_nodes_increasing_and_symmetric() {
        let rule = GaussLegendre::new(7).unwrap();
        let nodes = rule.nodes();
        assert!(nodes.windows(2).all(|w| w[0] < w[1]));
        assert_abs_diff_eq!(nodes[3], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(nodes[0], -nodes[6], epsilon = 1e-15);
    }

    #[test]
    fn test_composite_gaussian_integral() {
        let rule = GaussLegendre::new(20).unwrap();
        let density = |x: f64| (-0.5 * x * x).exp() / (2.0 * PI).sqrt();
        let mass = rule.integrate_composite(density, -10.0, 10.0, 8);
        assert_abs_diff_eq!(mass, 1.0, epsilon = 1e-13);
    }

    #[test]
    fn test_hermite_moments() {
        let rule = GaussHermite::new(30).unwrap();
        assert_abs_diff_eq!(rule.expectation(|_| 1.0), 1.0, epsilon = 1e-13);
        assert_abs_diff_eq!(rule.expectation(|z| z), 0.0, epsilon = 1e-13);
        assert_abs_diff_eq!(rule.expectation(|z| z.powi(4)), 3.0, epsilon = 1e-11);
    }

    #[test]
    fn test_hermite_lognormal_mean() {
        let rule = GaussHermite::new(40).unwrap();
        let sigma = 0.3;
        let mean = rule.expectation(|z| (sigma * z - 0.5 * sigma * sigma).exp());
        assert_abs_diff_eq!(mean, 1.0, epsilon = 1e-13);
    }

    #[test]
    fn test_mapped_matches_integrate() {
        let rule = GaussLegendre::new(8).unwrap();
        let direct = rule.integrate(|x| x.exp(), 0.5, 1.5);
        let mapped: f64 = rule.mapped(0.5, 1.5).map(|(x, w)| w * x.exp()).sum();
        assert_abs_diff_eq!(direct, mapped, epsilon = 1e-15);
    }
}
