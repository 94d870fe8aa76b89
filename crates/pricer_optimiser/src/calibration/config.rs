//! Calibration configuration.

use pricer_core::math::solvers::{LMConfig, SolverConfig};

/// Solver settings shared by the calibration engines.
///
/// # Examples
///
/// ```
/// use pricer_optimiser::calibration::CalibrationConfig;
///
/// let config = CalibrationConfig::default();
/// assert!(config.solver.tolerance < 1e-12);
/// assert_eq!(config.bracket_width, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationConfig {
    /// Brent settings for the root-finder engine.
    pub solver: SolverConfig<f64>,

    /// Levenberg-Marquardt settings for the least-square engine. Its
    /// bounds are replaced by the engine's own.
    pub least_squares: LMConfig,

    /// Half width of the first Brent bracket relative to the guess.
    /// The bracket widens until it holds a sign change.
    pub bracket_width: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::high_precision(),
            least_squares: LMConfig::default(),
            bracket_width: 0.5,
        }
    }
}

impl CalibrationConfig {
    /// Looser settings for quick fits.
    pub fn fast() -> Self {
        Self {
            solver: SolverConfig::new(1e-10, 100),
            least_squares: LMConfig::fast(),
            bracket_width: 0.5,
        }
    }

    /// Replaces the Brent settings.
    pub fn with_solver(mut self, solver: SolverConfig<f64>) -> Self {
        self.solver = solver;
        self
    }

    /// Replaces the Levenberg-Marquardt settings.
    pub fn with_least_squares(mut self, least_squares: LMConfig) -> Self {
        self.least_squares = least_squares;
        self
    }

    /// Brent bracket `[guess·(1 - w), guess·(1 + w)]` around `guess`.
    pub(crate) fn bracket(&self, guess: f64) -> (f64, f64) {
        let half = self.bracket_width * guess.abs().max(f64::EPSILON);
        (guess - half, guess + half)
    }
}
