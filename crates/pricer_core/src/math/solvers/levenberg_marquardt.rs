//! Levenberg-Marquardt nonlinear least-squares solver.
//!
//! # Algorithm
//!
//! ```text
//! (J^T J + λ diag(J^T J)) δ = -J^T r
//! p_{n+1} = clamp(p_n + δ, lower, upper)
//! ```
//!
//! The search stops when the residual norm is below `tolerance`, when an
//! accepted step lowers the sum of squares by less than
//! `function_tolerance` relative to it, when every Jacobian column is
//! orthogonal to the residuals within `gradient_tolerance`, or when the
//! step is below `param_tolerance`. The last three end best fits whose
//! residual never vanishes.
//!
//! The Jacobian is taken by forward differences with a step relative to
//! each parameter. Parameters can be kept inside box limits, which the
//! calibration engines use to keep volatility factors positive.
//!
//! # Example
//!
//! ```
//! use pricer_core::math::solvers::{LMConfig, LevenbergMarquardtSolver};
//!
//! let x_data = [0.0, 1.0, 2.0, 3.0, 4.0];
//! let y_data: Vec<f64> = x_data.iter().map(|x: &f64| 2.0 * (-0.5 * x).exp()).collect();
//!
//! let solver = LevenbergMarquardtSolver::new(LMConfig::default());
//! let result = solver
//!     .solve(|p: &[f64]| -> Vec<f64> {
//!         x_data.iter().zip(&y_data).map(|(&x, &y)| p[0] * (-p[1] * x).exp() - y).collect()
//!     }, vec![1.0, 1.0])
//!     .unwrap();
//!
//! assert!(result.converged);
//! assert!((result.params[0] - 2.0).abs() < 1e-6);
//! assert!((result.params[1] - 0.5).abs() < 1e-6);
//! ```

use crate::types::SolverError;

/// Configuration for [`LevenbergMarquardtSolver`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LMConfig {
    /// Convergence threshold on the residual norm
    pub tolerance: f64,
    /// Maximum number of outer iterations
    pub max_iterations: usize,
    /// Starting damping factor
    pub initial_lambda: f64,
    /// Damping multiplier after a rejected step
    pub lambda_up: f64,
    /// Damping multiplier after an accepted step
    pub lambda_down: f64,
    /// Lower clamp for the damping factor
    pub min_lambda: f64,
    /// Upper clamp for the damping factor; reaching it stops the search
    pub max_lambda: f64,
    /// Convergence threshold on the relative step size
    pub param_tolerance: f64,
    /// Convergence threshold on the relative decrease of the sum of squares
    pub function_tolerance: f64,
    /// Convergence threshold on the cosine between residuals and Jacobian columns
    pub gradient_tolerance: f64,
    /// Relative forward-difference step for the Jacobian
    pub jacobian_step: f64,
    /// Optional per-parameter lower limits
    pub lower_bounds: Option<Vec<f64>>,
    /// Optional per-parameter upper limits
    pub upper_bounds: Option<Vec<f64>>,
}

impl Default for LMConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 100,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            min_lambda: 1e-12,
            max_lambda: 1e12,
            param_tolerance: 1e-10,
            function_tolerance: 1e-12,
            gradient_tolerance: 1e-10,
            jacobian_step: 1e-7,
            lower_bounds: None,
            upper_bounds: None,
        }
    }
}

impl LMConfig {
    /// Configuration with explicit tolerance and iteration budget.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Looser configuration for quick fits.
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 50,
            param_tolerance: 1e-8,
            function_tolerance: 1e-8,
            gradient_tolerance: 1e-8,
            ..Default::default()
        }
    }

    /// Tighter configuration.
    pub fn high_precision() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 500,
            param_tolerance: 1e-14,
            function_tolerance: 1e-15,
            gradient_tolerance: 1e-14,
            ..Default::default()
        }
    }

    /// Adds box limits on the parameters.
    pub fn with_bounds(mut self, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        self.lower_bounds = Some(lower);
        self.upper_bounds = Some(upper);
        self
    }
}

/// Outcome of a least-squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LMResult {
    /// Fitted parameters
    pub params: Vec<f64>,
    /// Residual sum of squares at `params`
    pub residual_ss: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether a convergence criterion was met
    pub converged: bool,
    /// Damping factor at exit
    pub final_lambda: f64,
}

impl LMResult {
    /// Root mean squared residual.
    pub fn rmse(&self, n_observations: usize) -> f64 {
        if n_observations == 0 {
            return 0.0;
        }
        (self.residual_ss / n_observations as f64).sqrt()
    }
}

/// Levenberg-Marquardt solver with Marquardt diagonal scaling.
#[derive(Debug, Clone)]
pub struct LevenbergMarquardtSolver {
    config: LMConfig,
}

impl LevenbergMarquardtSolver {
    /// Creates a solver.
    pub fn new(config: LMConfig) -> Self {
        Self { config }
    }

    /// Creates a solver with [`LMConfig::default`].
    pub fn with_defaults() -> Self {
        Self::new(LMConfig::default())
    }

    /// The solver configuration.
    pub fn config(&self) -> &LMConfig {
        &self.config
    }

    /// Minimises the sum of squared residuals of an infallible function.
    pub fn solve<F>(&self, mut residuals: F, initial_params: Vec<f64>) -> Result<LMResult, SolverError>
    where
        F: FnMut(&[f64]) -> Vec<f64>,
    {
        self.try_solve(|p| Ok::<_, SolverError>(residuals(p)), initial_params)
    }

    /// Minimises the sum of squared residuals of a fallible function.
    ///
    /// A run that exhausts its budget is returned with `converged = false`;
    /// the caller decides whether the residual is acceptable.
    ///
    /// # Errors
    ///
    /// - `NumericalInstability` for empty inputs, mismatched bounds or
    ///   non-finite residuals at the starting point
    /// - any error raised by `residuals`
    pub fn try_solve<F, E>(&self, mut residuals: F, initial_params: Vec<f64>) -> Result<LMResult, E>
    where
        F: FnMut(&[f64]) -> Result<Vec<f64>, E>,
        E: From<SolverError>,
    {
        let n_params = initial_params.len();
        if n_params == 0 {
            return Err(SolverError::NumericalInstability("Empty parameter vector".to_string()).into());
        }
        for bounds in [&self.config.lower_bounds, &self.config.upper_bounds]
            .into_iter()
            .flatten()
        {
            if bounds.len() != n_params {
                return Err(SolverError::NumericalInstability(format!(
                    "Bounds length {} does not match {} parameters",
                    bounds.len(),
                    n_params
                ))
                .into());
            }
        }

        let mut params = self.project(initial_params);
        let mut lambda = self.config.initial_lambda;
        let mut r = residuals(&params)?;
        if r.is_empty() {
            return Err(SolverError::NumericalInstability("Empty residual vector".to_string()).into());
        }
        let mut ss = sum_of_squares(&r);
        if !ss.is_finite() {
            return Err(SolverError::NumericalInstability(
                "Non-finite residuals at the initial point".to_string(),
            )
            .into());
        }

        let mut jacobian = self.jacobian(&mut residuals, &params, &r)?;
        for iteration in 0..self.config.max_iterations {
            if ss.sqrt() < self.config.tolerance
                || gradient_cosine(&jacobian, &r) < self.config.gradient_tolerance
            {
                return Ok(self.result(params, ss, iteration, true, lambda));
            }

            let delta = match solve_normal_equations(&jacobian, &r, lambda) {
                Some(d) => d,
                None => {
                    lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
                    continue;
                }
            };

            let trial: Vec<f64> = params.iter().zip(&delta).map(|(p, d)| p + d).collect();
            let trial = self.project(trial);
            let step = trial
                .iter()
                .zip(&params)
                .map(|(t, p)| (t - p) * (t - p))
                .sum::<f64>()
                .sqrt();
            let norm = params.iter().map(|p| p * p).sum::<f64>().sqrt().max(1.0);
            if step / norm < self.config.param_tolerance {
                return Ok(self.result(params, ss, iteration, true, lambda));
            }

            let trial_r = residuals(&trial)?;
            let trial_ss = sum_of_squares(&trial_r);
            if trial_ss.is_finite() && trial_ss < ss {
                let stalled = ss - trial_ss <= self.config.function_tolerance * ss;
                params = trial;
                r = trial_r;
                ss = trial_ss;
                if stalled {
                    return Ok(self.result(params, ss, iteration + 1, true, lambda));
                }
                lambda = (lambda * self.config.lambda_down).max(self.config.min_lambda);
                jacobian = self.jacobian(&mut residuals, &params, &r)?;
            } else {
                if lambda >= self.config.max_lambda {
                    return Ok(self.result(params, ss, iteration, true, lambda));
                }
                lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
            }
        }

        Ok(self.result(params, ss, self.config.max_iterations, false, lambda))
    }

    fn result(&self, params: Vec<f64>, ss: f64, iterations: usize, converged: bool, lambda: f64) -> LMResult {
        LMResult {
            params,
            residual_ss: ss,
            iterations,
            converged,
            final_lambda: lambda,
        }
    }

    fn project(&self, mut params: Vec<f64>) -> Vec<f64> {
        if let Some(lower) = &self.config.lower_bounds {
            for (p, &l) in params.iter_mut().zip(lower) {
                *p = p.max(l);
            }
        }
        if let Some(upper) = &self.config.upper_bounds {
            for (p, &u) in params.iter_mut().zip(upper) {
                *p = p.min(u);
            }
        }
        params
    }

    fn jacobian<F, E>(&self, residuals: &mut F, params: &[f64], r0: &[f64]) -> Result<Vec<Vec<f64>>, E>
    where
        F: FnMut(&[f64]) -> Result<Vec<f64>, E>,
    {
        let mut jacobian = vec![vec![0.0; params.len()]; r0.len()];
        for j in 0..params.len() {
            let mut h = self.config.jacobian_step * params[j].abs().max(1e-2);
            // step inwards when sitting on an upper limit
            if let Some(upper) = &self.config.upper_bounds {
                if params[j] + h > upper[j] {
                    h = -h;
                }
            }
            let mut bumped = params.to_vec();
            bumped[j] += h;
            let r_plus = residuals(&bumped)?;
            for (row, (&rp, &r)) in jacobian.iter_mut().zip(r_plus.iter().zip(r0)) {
                row[j] = (rp - r) / h;
            }
        }
        Ok(jacobian)
    }
}

/// Solves `(J^T J + λ diag(J^T J)) δ = -J^T r`.
fn solve_normal_equations(jacobian: &[Vec<f64>], residuals: &[f64], lambda: f64) -> Option<Vec<f64>> {
    let n = jacobian.first()?.len();
    let mut jtj = vec![vec![0.0; n]; n];
    let mut jtr = vec![0.0; n];
    for (row, &r) in jacobian.iter().zip(residuals) {
        for i in 0..n {
            jtr[i] -= row[i] * r;
            for j in 0..n {
                jtj[i][j] += row[i] * row[j];
            }
        }
    }
    for (i, row) in jtj.iter_mut().enumerate() {
        let diagonal = row[i].max(1e-30);
        row[i] += lambda * diagonal;
    }
    solve_cholesky(&jtj, &jtr)
}

/// Largest `|J_jᵀ r| / (‖J_j‖ ‖r‖)` over the columns; zero at a stationary point.
fn gradient_cosine(jacobian: &[Vec<f64>], residuals: &[f64]) -> f64 {
    let r_norm = sum_of_squares(residuals).sqrt();
    let n = jacobian.first().map_or(0, Vec::len);
    let mut worst: f64 = 0.0;
    for j in 0..n {
        let (mut dot, mut col) = (0.0, 0.0);
        for (row, &r) in jacobian.iter().zip(residuals) {
            dot += row[j] * r;
            col += row[j] * row[j];
        }
        let denominator = col.sqrt() * r_norm;
        if denominator > 0.0 {
            worst = worst.max(dot.abs() / denominator);
        } else if dot != 0.0 {
            return f64::INFINITY;
        }
    }
    worst
}

#[inline]
fn sum_of_squares(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Solves `A x = b` for symmetric positive definite `A`.
fn solve_cholesky(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_result_rmse() {
        let result = LMResult {
            params: vec![1.0],
            residual_ss: 4.0,
            iterations: 10,
            converged: true,
            final_lambda: 1e-5,
        };
        assert_abs_diff_eq!(result.rmse(4), 1.0);
        assert_eq!(result.rmse(0), 0.0);
    }

    #[test]
    fn test_solve_simple_linear() {
        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver
            .solve(|p: &[f64]| vec![p[0] - 2.0, p[1] - 3.0], vec![0.0, 0.0])
            .unwrap();
        assert!(result.converged);
        assert_abs_diff_eq!(result.params[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.params[1], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_solve_rosenbrock() {
        let solver = LevenbergMarquardtSolver::new(LMConfig::new(1e-12, 500));
        let result = solver
            .solve(
                |p: &[f64]| vec![1.0 - p[0], 10.0 * (p[1] - p[0] * p[0])],
                vec![-1.2, 1.0],
            )
            .unwrap();
        assert_abs_diff_eq!(result.params[0], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(result.params[1], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_overdetermined_fit_is_not_exact() {
        // Best constant through 1, 2, 6 is the mean 3.
        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver
            .solve(|p: &[f64]| vec![p[0] - 1.0, p[0] - 2.0, p[0] - 6.0], vec![0.0])
            .unwrap();
        assert_abs_diff_eq!(result.params[0], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.residual_ss, 14.0, epsilon = 1e-6);
    }

    #[test]
    fn test_best_fit_stops_on_stationary_residual() {
        // y = a·x² fitted with a line: the residual stays large at the optimum.
        let x: Vec<f64> = (0..20).map(|i| i as f64 / 4.0).collect();
        let solver = LevenbergMarquardtSolver::new(LMConfig::new(1e-12, 25));
        let result = solver
            .solve(
                |p: &[f64]| x.iter().map(|&xi| p[0] + p[1] * xi - xi * xi).collect(),
                vec![0.0, 0.0],
            )
            .unwrap();
        assert!(result.converged);
        assert!(result.iterations < 25);
        assert!(result.residual_ss > 1.0);
        // least squares line through (x, x²)
        let n = x.len() as f64;
        let (sx, sy) = (x.iter().sum::<f64>(), x.iter().map(|v| v * v).sum::<f64>());
        let sxy = x.iter().map(|v| v * v * v).sum::<f64>();
        let slope = (n * sxy - sx * sy) / (n * sy - sx * sx);
        assert_abs_diff_eq!(result.params[1], slope, epsilon = 1e-5);
    }

    #[test]
    fn test_gradient_cosine() {
        let jacobian = vec![vec![1.0], vec![1.0]];
        assert_abs_diff_eq!(gradient_cosine(&jacobian, &[1.0, -1.0]), 0.0);
        assert_abs_diff_eq!(gradient_cosine(&jacobian, &[1.0, 1.0]), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_bounds_are_respected() {
        let config = LMConfig::default().with_bounds(vec![0.5], vec![10.0]);
        let solver = LevenbergMarquardtSolver::new(config);
        let result = solver.solve(|p: &[f64]| vec![p[0] + 1.0], vec![2.0]).unwrap();
        assert_abs_diff_eq!(result.params[0], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_bounds_length_mismatch() {
        let config = LMConfig::default().with_bounds(vec![0.0, 0.0], vec![1.0, 1.0]);
        let solver = LevenbergMarquardtSolver::new(config);
        let result = solver.solve(|p: &[f64]| vec![p[0]], vec![0.3]);
        assert!(matches!(result, Err(SolverError::NumericalInstability(_))));
    }

    #[test]
    fn test_solve_empty_params() {
        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver.solve(|_: &[f64]| vec![1.0], vec![]);
        assert!(matches!(result, Err(SolverError::NumericalInstability(_))));
    }

    #[test]
    fn test_cholesky_simple() {
        let a = vec![vec![4.0, 2.0], vec![2.0, 3.0]];
        let x = solve_cholesky(&a, &[2.0, 1.0]).unwrap();
        assert_abs_diff_eq!(4.0 * x[0] + 2.0 * x[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(2.0 * x[0] + 3.0 * x[1], 1.0, epsilon = 1e-12);
        assert!(solve_cholesky(&[vec![1.0, 2.0], vec![2.0, 1.0]], &[1.0, 1.0]).is_none());
    }
}
