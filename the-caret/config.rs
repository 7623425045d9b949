use std::time::Duration;

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

/// Config for the caret overlay.
///
/// The class names are the only styling contract: an external stylesheet
/// targets them for color, width and the dimmed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
  /// Idle time in milliseconds before the overlay enters its dimmed phase.
  pub blink_delay:   u64,
  pub overlay_class: String,
  pub dimmed_class:  String,
  /// Set on the surface root while the overlay is active.
  pub enabled_class: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      blink_delay:   200,
      overlay_class: "the-caret".to_string(),
      dimmed_class:  "the-caret-dimmed".to_string(),
      enabled_class: "the-caret-enabled".to_string(),
    }
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to parse caret config: {0}")]
  BadConfig(#[from] toml::de::Error),
  #[error("blink-delay must be greater than zero")]
  ZeroBlinkDelay,
  #[error("{field} must be a single non-empty class name, got {value:?}")]
  BadClassName { field: &'static str, value: String },
}

impl Config {
  /// Parse and validate a `[caret]`-style TOML table body.
  pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
    let config: Config = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.blink_delay == 0 {
      return Err(ConfigError::ZeroBlinkDelay);
    }

    for (field, value) in [
      ("overlay-class", &self.overlay_class),
      ("dimmed-class", &self.dimmed_class),
      ("enabled-class", &self.enabled_class),
    ] {
      if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::BadClassName {
          field,
          value: value.clone(),
        });
      }
    }

    Ok(())
  }

  #[inline]
  pub fn blink_delay(&self) -> Duration {
    Duration::from_millis(self.blink_delay)
  }
}
