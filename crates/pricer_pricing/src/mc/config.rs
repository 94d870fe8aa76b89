//! Monte Carlo simulation configuration.

use super::error::ConfigError;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 10_000;

/// Monte Carlo simulation configuration.
///
/// Immutable; use [`MonteCarloConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(12_500)
///     .n_steps(20)
///     .seed(42)
///     .antithetic(true)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 12_500);
/// assert!(config.antithetic());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonteCarloConfig {
    n_paths: usize,
    n_steps: usize,
    seed: u64,
    antithetic: bool,
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Number of simulation paths. With antithetic sampling every path is
    /// a pair of mirrored draws.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time steps up to the exercise date.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Seed of the default generator.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether each draw is paired with its negative.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` is 0 or greater than 10,000,000
    /// - `n_steps` is 0 or greater than 10,000
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.n_steps));
        }
        Ok(())
    }
}

/// Builder for [`MonteCarloConfig`].
///
/// `n_paths` is required; steps default to one, the seed to zero and
/// antithetic sampling to off.
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    n_steps: Option<usize>,
    seed: u64,
    antithetic: bool,
}

impl MonteCarloConfigBuilder {
    /// Sets the number of simulation paths, in [1, 10_000_000].
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of time steps, in [1, 10_000].
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables antithetic sampling.
    #[inline]
    pub fn antithetic(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n_paths` is not set or a count is out of range.
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let n_paths = self.n_paths.ok_or(ConfigError::InvalidParameter {
            name: "n_paths",
            value: "must be specified".to_string(),
        })?;

        let config = MonteCarloConfig {
            n_paths,
            n_steps: self.n_steps.unwrap_or(1),
            seed: self.seed,
            antithetic: self.antithetic,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_valid() {
        let config = MonteCarloConfig::builder()
            .n_paths(10_000)
            .n_steps(252)
            .build()
            .unwrap();

        assert_eq!(config.n_paths(), 10_000);
        assert_eq!(config.n_steps(), 252);
        assert_eq!(config.seed(), 0);
        assert!(!config.antithetic());
    }

    #[test]
    fn test_config_default_steps() {
        let config = MonteCarloConfig::builder().n_paths(100).seed(42).build().unwrap();
        assert_eq!(config.n_steps(), 1);
        assert_eq!(config.seed(), 42);
    }

    #[test]
    fn test_config_invalid_zero_paths() {
        let result = MonteCarloConfig::builder().n_paths(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidPathCount(0))));
    }

    #[test]
    fn test_config_invalid_too_many_paths() {
        let result = MonteCarloConfig::builder().n_paths(MAX_PATHS + 1).build();
        assert!(matches!(result, Err(ConfigError::InvalidPathCount(_))));
    }

    #[test]
    fn test_config_invalid_steps() {
        let zero = MonteCarloConfig::builder().n_paths(1000).n_steps(0).build();
        assert!(matches!(zero, Err(ConfigError::InvalidStepCount(0))));
        let many = MonteCarloConfig::builder()
            .n_paths(1000)
            .n_steps(MAX_STEPS + 1)
            .build();
        assert!(matches!(many, Err(ConfigError::InvalidStepCount(_))));
    }

    #[test]
    fn test_config_missing_paths() {
        let result = MonteCarloConfig::builder().n_steps(100).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "n_paths", .. })
        ));
    }
}
