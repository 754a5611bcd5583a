//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.tagger.launcher.is_empty() {
            return Err(ConfigError::Validation(
                "tagger.launcher must not be empty".into(),
            ));
        }
        if self.caption.batch_size == 0 {
            return Err(ConfigError::Validation(
                "caption.batch_size must be > 0".into(),
            ));
        }
        for (name, value) in [
            ("caption.general_threshold", self.caption.general_threshold),
            (
                "caption.character_threshold",
                self.caption.character_threshold,
            ),
            (
                "caption.confidence_threshold",
                self.caption.confidence_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be between 0.0 and 1.0"
                )));
            }
        }
        Ok(())
    }
}
