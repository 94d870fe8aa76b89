//! Brent's method root-finding solver with bracket expansion.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Growth factor applied to the bracket width during expansion.
const EXPANSION_FACTOR: f64 = 1.6;

/// Maximum number of bracket expansions.
const MAX_EXPANSIONS: usize = 60;

/// Brent root finder: inverse quadratic interpolation with bisection fallback.
///
/// The objective may be fallible (a pricing call), in which case its error
/// type must absorb [`SolverError`].
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
/// let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
/// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Creates a solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Creates a solver with [`SolverConfig::default`].
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// The solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Root of an infallible function inside `[a, b]`.
    ///
    /// # Errors
    ///
    /// - `NoBracket` if `f(a)` and `f(b)` have the same sign
    /// - `MaxIterationsExceeded` with the last iterate and its residual
    pub fn find_root<F>(&self, mut f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: FnMut(T) -> T,
    {
        self.try_find_root(|x| Ok::<T, SolverError>(f(x)), a, b)
    }

    /// Root of a fallible function inside `[a, b]`.
    pub fn try_find_root<F, E>(&self, mut f: F, a: T, b: T) -> Result<T, E>
    where
        F: FnMut(T) -> Result<T, E>,
        E: From<SolverError>,
    {
        let fa = f(a)?;
        let fb = f(b)?;
        self.solve_bracketed(&mut f, a, fa, b, fb)
    }

    /// Root search starting from `[a, b]`, widening the interval until it
    /// brackets a sign change.
    ///
    /// The bracket never leaves `[lower, upper]`; use infinite limits for an
    /// unconstrained search.
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_core::math::solvers::BrentSolver;
    /// use pricer_core::types::SolverError;
    ///
    /// let solver: BrentSolver<f64> = BrentSolver::with_defaults();
    /// let root = solver
    ///     .find_root_bracketed(|x| Ok::<_, SolverError>(x - 7.5), 0.0, 1.0, 0.0, f64::INFINITY)
    ///     .unwrap();
    /// assert!((root - 7.5).abs() < 1e-10);
    /// ```
    pub fn find_root_bracketed<F, E>(
        &self,
        mut f: F,
        a: T,
        b: T,
        lower: T,
        upper: T,
    ) -> Result<T, E>
    where
        F: FnMut(T) -> Result<T, E>,
        E: From<SolverError>,
    {
        let factor = T::from(EXPANSION_FACTOR).unwrap_or_else(T::one);
        let (mut a, mut b) = (a.max(lower).min(upper), b.max(lower).min(upper));
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        let mut fa = f(a)?;
        let mut fb = f(b)?;

        for _ in 0..MAX_EXPANSIONS {
            if fa * fb <= T::zero() {
                return self.solve_bracketed(&mut f, a, fa, b, fb);
            }
            let width = b - a;
            let can_go_down = a > lower;
            let can_go_up = b < upper;
            if !can_go_down && !can_go_up {
                break;
            }
            if (fa.abs() < fb.abs() && can_go_down) || !can_go_up {
                a = (a - factor * width).max(lower);
                fa = f(a)?;
            } else {
                b = (b + factor * width).min(upper);
                fb = f(b)?;
            }
        }

        Err(SolverError::NoBracket {
            a: a.to_f64().unwrap_or(f64::NAN),
            b: b.to_f64().unwrap_or(f64::NAN),
        }
        .into())
    }

    fn solve_bracketed<F, E>(&self, f: &mut F, a: T, fa: T, b: T, fb: T) -> Result<T, E>
    where
        F: FnMut(T) -> Result<T, E>,
        E: From<SolverError>,
    {
        let zero = T::zero();
        let one = T::one();
        let two = T::from(2.0).unwrap_or_else(|| one + one);
        let three = two + one;
        let half = one / two;

        let (mut a, mut b) = (a, b);
        let (mut fa, mut fb) = (fa, fb);

        if (fa > zero && fb > zero) || (fa < zero && fb < zero) {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            }
            .into());
        }
        if fa == zero {
            return Ok(a);
        }
        if fb == zero {
            return Ok(b);
        }

        let mut c = b;
        let mut fc = fb;
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.config.max_iterations {
            if (fb > zero && fc > zero) || (fb < zero && fc < zero) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol = two * T::epsilon() * b.abs() + half * self.config.tolerance;
            let m = half * (c - b);
            if m.abs() <= tol || fb == zero {
                return Ok(b);
            }

            if e.abs() >= tol && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    (two * m * s, one - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (two * m * q * (q - r) - (b - a) * (r - one)),
                        (q - one) * (r - one) * (s - one),
                    )
                };
                if p > zero {
                    q = -q;
                }
                p = p.abs();
                let min1 = three * m * q - (tol * q).abs();
                let min2 = (e * q).abs();
                if two * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = m;
                    e = d;
                }
            } else {
                d = m;
                e = d;
            }

            a = b;
            fa = fb;
            b = if d.abs() > tol {
                b + d
            } else if m > zero {
                b + tol
            } else {
                b - tol
            };
            fb = f(b)?;
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
            last: b.to_f64().unwrap_or(f64::NAN),
            residual: fb.to_f64().unwrap_or(f64::NAN),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_find_sqrt_2() {
        let solver = BrentSolver::with_defaults();
        let root = solver.find_root(|x: f64| x * x - 2.0, 1.0, 2.0).unwrap();
        assert_abs_diff_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_bracket_reversed() {
        let solver = BrentSolver::with_defaults();
        let root = solver.find_root(|x: f64| x.powi(3) - x - 2.0, 2.0, 1.0).unwrap();
        assert_abs_diff_eq!(root.powi(3) - root - 2.0, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_no_bracket() {
        let solver = BrentSolver::with_defaults();
        match solver.find_root(|x: f64| x * x + 1.0, -1.0, 1.0) {
            Err(SolverError::NoBracket { a, b }) => {
                assert_eq!(a, -1.0);
                assert_eq!(b, 1.0);
            }
            other => panic!("Expected NoBracket, got {:?}", other),
        }
    }

    #[test]
    fn test_root_at_endpoint() {
        let solver = BrentSolver::with_defaults();
        assert_eq!(solver.find_root(|x: f64| x - 1.0, 1.0, 3.0).unwrap(), 1.0);
    }

    #[test]
    fn test_max_iterations_reports_last_iterate() {
        let solver = BrentSolver::new(SolverConfig::new(1e-300, 2));
        match solver.find_root(|x: f64| x.exp() - 10.0, 0.0, 100.0) {
            Err(SolverError::MaxIterationsExceeded {
                iterations,
                last,
                residual,
            }) => {
                assert_eq!(iterations, 2);
                assert!(last.is_finite());
                assert!(residual.is_finite());
            }
            other => panic!("Expected MaxIterationsExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_fallible_objective_propagates_error() {
        #[derive(Debug, PartialEq)]
        enum PriceError {
            Solver(SolverError),
            Pricing,
        }
        impl From<SolverError> for PriceError {
            fn from(e: SolverError) -> Self {
                PriceError::Solver(e)
            }
        }

        let solver: BrentSolver<f64> = BrentSolver::with_defaults();
        let result = solver.try_find_root(
            |x| {
                if x > 1.5 {
                    Err(PriceError::Pricing)
                } else {
                    Ok(x - 1.0)
                }
            },
            0.0,
            2.0,
        );
        assert_eq!(result, Err(PriceError::Pricing));
    }

    #[test]
    fn test_bracket_expansion_upward() {
        let solver: BrentSolver<f64> = BrentSolver::with_defaults();
        let root = solver
            .find_root_bracketed(
                |x| Ok::<_, SolverError>(x * x - 400.0),
                0.1,
                0.2,
                0.0,
                f64::INFINITY,
            )
            .unwrap();
        assert_abs_diff_eq!(root, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bracket_expansion_respects_lower_limit() {
        let solver: BrentSolver<f64> = BrentSolver::with_defaults();
        // Root at -3 lies below the admissible region.
        let result = solver.find_root_bracketed(
            |x| Ok::<_, SolverError>(x + 3.0),
            1.0,
            2.0,
            0.0,
            f64::INFINITY,
        );
        assert!(matches!(result, Err(SolverError::NoBracket { .. })));
    }

    #[test]
    fn test_bracket_expansion_downward() {
        let solver: BrentSolver<f64> = BrentSolver::with_defaults();
        let root = solver
            .find_root_bracketed(
                |x| Ok::<_, SolverError>(x - 1e-3),
                0.5,
                1.0,
                0.0,
                f64::INFINITY,
            )
            .unwrap();
        assert_abs_diff_eq!(root, 1e-3, epsilon = 1e-10);
    }
}
