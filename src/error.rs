//! Configuration errors.
//!
//! The simulation itself never fails: it only ever operates on valid
//! in-memory state. Everything that can go wrong happens before a session
//! starts, while turning user-facing settings into a [`SessionConfig`].
//!
//! [`SessionConfig`]: crate::sim::SessionConfig

use std::fmt;

/// Errors raised while building a session configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Difficulty name that does not match any tier.
    UnknownTier(String),

    /// Playfield with a non-positive or non-finite dimension.
    InvalidPlayfield {
        width: f32,
        height: f32,
    },

    /// A timing value that must be strictly positive.
    InvalidDuration {
        /// Name of the setting (for logging).
        name: &'static str,
        value: f64,
    },

    /// Settings JSON could not be decoded.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownTier(name) => write!(
                f,
                "unknown difficulty tier '{}' (expected low/easy, mid/medium or high/hard)",
                name
            ),
            ConfigError::InvalidPlayfield { width, height } => write!(
                f,
                "invalid playfield {}x{}: both dimensions must be positive",
                width, height
            ),
            ConfigError::InvalidDuration { name, value } => {
                write!(f, "invalid {}: {} ms (must be > 0)", name, value)
            }
            ConfigError::Parse(msg) => write!(f, "failed to parse settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
