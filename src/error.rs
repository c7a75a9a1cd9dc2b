//! Error types for the joystick engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or wiring up a joystick.
///
/// Movement itself never fails: calls made while disabled or while no plugin
/// is dragging are silently ignored.
#[derive(Debug, Error)]
pub enum JoystickError {
    /// Bounding model string was not one of `inner`, `center`, `outer`, `none`
    #[error("Unknown bounding model: {0}")]
    UnknownBoundingModel(String),

    /// An option holds a value outside its allowed range
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the options schema
    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The gamepad backend could not be initialised
    #[error("Gamepad initialisation error: {0}")]
    GamepadInit(String),
}
