//! Error types. Physics itself never fails; everything here is raised while
//! building the configuration or while talking to the terminal.

use thiserror::Error;

/// A configuration value that cannot be allowed into the per-frame math.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite")]
    NonFinite { name: &'static str },

    #[error("{name} range is inverted: min {min} > max {max}")]
    InvertedRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{name} must be at least {min}, got {value}")]
    BelowMinimum {
        name: &'static str,
        value: f64,
        min: f64,
    },

    #[error("unknown display flag: {0}")]
    UnknownFlag(String),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Fails with [`ConfigError::NonFinite`] or [`ConfigError::NonPositive`] unless `value > 0`.
pub fn require_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(value)
}
