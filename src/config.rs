//! Joystick configuration: optional user options and the resolved, immutable config.
//!
//! Options come from code or from a TOML file. They are merged with defaults exactly
//! once (see [`JoystickOptions::resolve`]); every other module only ever sees the
//! fully-populated [`JoystickConfig`].

use crate::error::JoystickError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

pub const DEFAULT_RESET_ANIMATION: &str = ".2s ease";
const CONFIG_DIR_NAME: &str = "openstick";
const CONFIG_FILE_NAME: &str = "joystick.toml";

/// How the handle's own footprint interacts with the base edge when clamping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundingModel {
    /// Handle stays fully inside the base.
    Inner,
    /// Handle center stays inside the base; the handle may partially overflow.
    #[default]
    Center,
    /// Handle inner edge stays inside the base; the handle may fully overflow.
    Outer,
    /// No boundary at all.
    None,
}

impl FromStr for BoundingModel {
    type Err = JoystickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inner" => Ok(BoundingModel::Inner),
            "center" => Ok(BoundingModel::Center),
            "outer" => Ok(BoundingModel::Outer),
            "none" => Ok(BoundingModel::None),
            other => Err(JoystickError::UnknownBoundingModel(other.to_string())),
        }
    }
}

impl fmt::Display for BoundingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundingModel::Inner => write!(f, "inner"),
            BoundingModel::Center => write!(f, "center"),
            BoundingModel::Outer => write!(f, "outer"),
            BoundingModel::None => write!(f, "none"),
        }
    }
}

/// User-facing options. Every field is optional; missing fields take defaults.
///
/// `bounding_model` is kept as a string so that an unknown value is reported as a
/// configuration error instead of a generic parse failure.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct JoystickOptions {
    pub bounding_model: Option<String>,
    pub boundary_modifier: Option<f64>,
    pub disabled: Option<bool>,
    pub disable_x: Option<bool>,
    pub disable_y: Option<bool>,
    pub disable_reset_animation: Option<bool>,
    pub reset_animation: Option<String>,
    pub throttle_events_by: Option<i64>,
}

/// Fully resolved configuration. Never mutated after construction.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct JoystickConfig {
    pub bounding_model: BoundingModel,
    pub boundary_modifier: f64,
    pub disabled: bool,
    pub disable_x: bool,
    pub disable_y: bool,
    pub disable_reset_animation: bool,
    pub reset_animation: String,
    /// Minimum milliseconds between outward move events, 0 for unthrottled.
    pub throttle_events_by: u64,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            bounding_model: BoundingModel::Center,
            boundary_modifier: 0.0,
            disabled: false,
            disable_x: false,
            disable_y: false,
            disable_reset_animation: false,
            reset_animation: DEFAULT_RESET_ANIMATION.to_string(),
            throttle_events_by: 0,
        }
    }
}

impl JoystickOptions {
    /// Merges the options with defaults, rejecting values that make no sense.
    pub fn resolve(&self) -> Result<JoystickConfig, JoystickError> {
        let defaults = JoystickConfig::default();

        let bounding_model = match &self.bounding_model {
            Some(model) => model.parse()?,
            None => defaults.bounding_model,
        };

        let boundary_modifier = self.boundary_modifier.unwrap_or(defaults.boundary_modifier);
        if !boundary_modifier.is_finite() {
            return Err(JoystickError::ConfigError(format!(
                "boundary_modifier must be finite, got {}",
                boundary_modifier
            )));
        }

        let throttle_events_by = match self.throttle_events_by {
            Some(ms) if ms < 0 => {
                return Err(JoystickError::ConfigError(format!(
                    "throttle_events_by must not be negative, got {}",
                    ms
                )))
            }
            Some(ms) => ms as u64,
            None => defaults.throttle_events_by,
        };

        let config = JoystickConfig {
            bounding_model,
            boundary_modifier,
            disabled: self.disabled.unwrap_or(defaults.disabled),
            disable_x: self.disable_x.unwrap_or(defaults.disable_x),
            disable_y: self.disable_y.unwrap_or(defaults.disable_y),
            disable_reset_animation: self
                .disable_reset_animation
                .unwrap_or(defaults.disable_reset_animation),
            reset_animation: self
                .reset_animation
                .clone()
                .unwrap_or(defaults.reset_animation),
            throttle_events_by,
        };
        debug!("Resolved joystick config: {:?}", config);
        Ok(config)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, JoystickError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, JoystickError> {
        info!("Loading joystick options from {}", path.display());
        let source = fs::read_to_string(path).map_err(|source| JoystickError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Loads the default config file, or returns empty options when there is none.
    pub fn load_or_default() -> Result<Self, JoystickError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// `<config_dir>/openstick/joystick.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_resolve_to_defaults() {
        let config = JoystickOptions::default().resolve().unwrap();
        assert_eq!(config, JoystickConfig::default());
        assert_eq!(config.bounding_model, BoundingModel::Center);
        assert_eq!(config.reset_animation, ".2s ease");
        assert_eq!(config.throttle_events_by, 0);
    }

    #[test]
    fn test_unknown_bounding_model_is_rejected() {
        let options = JoystickOptions {
            bounding_model: Some("square".to_string()),
            ..Default::default()
        };
        match options.resolve() {
            Err(JoystickError::UnknownBoundingModel(model)) => assert_eq!(model, "square"),
            other => panic!("expected UnknownBoundingModel, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_throttle_is_rejected() {
        let options = JoystickOptions {
            throttle_events_by: Some(-5),
            ..Default::default()
        };
        assert!(matches!(
            options.resolve(),
            Err(JoystickError::ConfigError(_))
        ));
    }

    #[test]
    fn test_toml_options() {
        let options = JoystickOptions::from_toml_str(
            r#"
            bounding_model = "outer"
            boundary_modifier = -4.5
            disable_y = true
            throttle_events_by = 50
            "#,
        )
        .unwrap();
        let config = options.resolve().unwrap();

        assert_eq!(config.bounding_model, BoundingModel::Outer);
        assert_eq!(config.boundary_modifier, -4.5);
        assert!(config.disable_y);
        assert!(!config.disable_x);
        assert_eq!(config.throttle_events_by, 50);
    }

    #[test]
    fn test_bounding_model_round_trips_through_display() {
        for model in [
            BoundingModel::Inner,
            BoundingModel::Center,
            BoundingModel::Outer,
            BoundingModel::None,
        ] {
            assert_eq!(model.to_string().parse::<BoundingModel>().unwrap(), model);
        }
    }
}
