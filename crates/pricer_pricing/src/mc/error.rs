//! Error types for the Monte Carlo methods.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Monte Carlo configuration error, raised at build time.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Path count outside [1, 10_000_000].
    #[error("Invalid path count {0}: must be in range [1, 10_000_000]")]
    InvalidPathCount(usize),
    /// Step count outside [1, 10_000].
    #[error("Invalid step count {0}: must be in range [1, 10_000]")]
    InvalidStepCount(usize),
    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl From<ConfigError> for PricingError {
    fn from(err: ConfigError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidPathCount(0);
        assert!(err.to_string().contains("Invalid path count 0"));

        let err = ConfigError::InvalidStepCount(20_000);
        assert!(err.to_string().contains("Invalid step count 20000"));

        let err = ConfigError::InvalidParameter {
            name: "n_paths",
            value: "must be specified".to_string(),
        };
        assert!(err.to_string().contains("n_paths"));
    }

    #[test]
    fn test_into_pricing_error() {
        let err: PricingError = ConfigError::InvalidPathCount(0).into();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }
}
