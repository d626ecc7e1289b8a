//! Configuration validation for emitters

use super::EmitterConfig;
use crate::error::{EmitterError, Result};

/// Upper bound accepted for `max_listeners`
pub const MAX_LISTENERS_LIMIT: usize = 1_000_000;

/// Configuration validator for emitters
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate an emitter configuration
    ///
    /// # Errors
    ///
    /// Returns an error if `max_listeners` exceeds [`MAX_LISTENERS_LIMIT`].
    /// Use `0` to disable the leak warning instead of a huge threshold.
    pub fn validate(config: &EmitterConfig) -> Result<()> {
        if config.max_listeners > MAX_LISTENERS_LIMIT {
            return Err(EmitterError::InvalidConfiguration(format!(
                "max_listeners must be at most {} (use 0 to disable), got {}",
                MAX_LISTENERS_LIMIT, config.max_listeners
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&EmitterConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_max_listeners_is_valid() {
        let config = EmitterConfig {
            max_listeners: 0,
            ..EmitterConfig::default()
        };
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_excessive_max_listeners_rejected() {
        let config = EmitterConfig {
            max_listeners: MAX_LISTENERS_LIMIT + 1,
            ..EmitterConfig::default()
        };
        let result = ConfigValidator::validate(&config);
        assert!(matches!(result, Err(EmitterError::InvalidConfiguration(_))));
    }
}
