//! Demo settings read from `RLK_*` environment variables.

use std::{fmt::Display, str::FromStr};

use thiserror::Error;

use crate::input::{Intent, ScriptedInput};

/// A setting that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not valid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{var}={value:?} is out of range, expected {expected}")]
    OutOfRange {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Settings for one demo run.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Frames to simulate (`RLK_FRAMES`).
    pub frames: u32,
    /// Simulated time per frame (`RLK_FRAME_MS`).
    pub frame_ms: f64,
    /// Player sight radius (`RLK_FOV_RADIUS`).
    pub fov_radius: u32,
    /// Console size in cells (`RLK_CONSOLE_WIDTH`, `RLK_CONSOLE_HEIGHT`).
    pub console_width: u32,
    pub console_height: u32,
    /// Minimum time between accepted key presses (`RLK_REPEAT_DELAY_MS`).
    pub repeat_delay_ms: f64,
    /// Map size in tiles (`RLK_MAP_WIDTH`, `RLK_MAP_HEIGHT`).
    pub map_width: u32,
    pub map_height: u32,
    /// Debris seed (`RLK_SEED`).
    pub seed: u64,
    /// Player moves as vi-style keys (`RLK_SCRIPT`).
    pub script: Vec<Intent>,
}

const DEFAULT_SCRIPT: &str = "llllll jjjj hhhhhhhh kkkkkk nnnn yy";

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 60,
            frame_ms: 16.0,
            fov_radius: 10,
            console_width: 80,
            console_height: 50,
            repeat_delay_ms: 2.0,
            map_width: 100,
            map_height: 100,
            seed: 0x5eed,
            script: ScriptedInput::from_keys(DEFAULT_SCRIPT)
                .map(|input| input.into_iter().collect())
                .unwrap_or_default(),
        }
    }
}

impl DemoConfig {
    /// Read settings from the process environment. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            frames: parse(&lookup, "RLK_FRAMES", defaults.frames)?,
            frame_ms: parse(&lookup, "RLK_FRAME_MS", defaults.frame_ms)?,
            fov_radius: parse(&lookup, "RLK_FOV_RADIUS", defaults.fov_radius)?,
            console_width: parse(&lookup, "RLK_CONSOLE_WIDTH", defaults.console_width)?,
            console_height: parse(&lookup, "RLK_CONSOLE_HEIGHT", defaults.console_height)?,
            repeat_delay_ms: parse(&lookup, "RLK_REPEAT_DELAY_MS", defaults.repeat_delay_ms)?,
            map_width: parse(&lookup, "RLK_MAP_WIDTH", defaults.map_width)?,
            map_height: parse(&lookup, "RLK_MAP_HEIGHT", defaults.map_height)?,
            seed: parse(&lookup, "RLK_SEED", defaults.seed)?,
            script: match lookup("RLK_SCRIPT") {
                Some(keys) => ScriptedInput::from_keys(&keys)
                    .map_err(|err| ConfigError::Invalid {
                        var: "RLK_SCRIPT",
                        value: keys.clone(),
                        reason: err.to_string(),
                    })?
                    .into_iter()
                    .collect(),
                None => defaults.script,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let out_of_range = |var, value: &dyn Display, expected| ConfigError::OutOfRange {
            var,
            value: value.to_string(),
            expected,
        };

        if !(self.frame_ms.is_finite() && self.frame_ms >= 0.0) {
            return Err(out_of_range("RLK_FRAME_MS", &self.frame_ms, "a finite value >= 0"));
        }
        if !(self.repeat_delay_ms.is_finite() && self.repeat_delay_ms >= 0.0) {
            return Err(out_of_range(
                "RLK_REPEAT_DELAY_MS",
                &self.repeat_delay_ms,
                "a finite value >= 0",
            ));
        }
        if self.console_width == 0 {
            return Err(out_of_range("RLK_CONSOLE_WIDTH", &self.console_width, "at least 1"));
        }
        if self.console_height == 0 {
            return Err(out_of_range("RLK_CONSOLE_HEIGHT", &self.console_height, "at least 1"));
        }
        if self.map_width < 3 {
            return Err(out_of_range("RLK_MAP_WIDTH", &self.map_width, "at least 3"));
        }
        if self.map_height < 3 {
            return Err(out_of_range("RLK_MAP_HEIGHT", &self.map_height, "at least 3"));
        }
        Ok(())
    }

    /// Input source replaying [`Self::script`].
    #[must_use]
    pub fn input(&self) -> ScriptedInput {
        ScriptedInput::new(self.script.iter().copied())
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|err| ConfigError::Invalid {
        var,
        reason: err.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DemoConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.fov_radius, 10);
        assert!(!config.script.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = DemoConfig::from_lookup(lookup_from(&[
            ("RLK_FRAMES", "5"),
            ("RLK_FOV_RADIUS", " 6 "),
            ("RLK_FRAME_MS", "33.3"),
            ("RLK_SCRIPT", "lj."),
        ]))
        .unwrap();

        assert_eq!(config.frames, 5);
        assert_eq!(config.fov_radius, 6);
        assert!((config.frame_ms - 33.3).abs() < f64::EPSILON);
        assert_eq!(config.script, vec![Intent::EAST, Intent::SOUTH, Intent::Wait]);
    }

    #[test]
    fn test_malformed_value_names_variable() {
        let err = DemoConfig::from_lookup(lookup_from(&[("RLK_CONSOLE_WIDTH", "wide")])).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { var: "RLK_CONSOLE_WIDTH", .. }));
        assert!(err.to_string().starts_with("RLK_CONSOLE_WIDTH=\"wide\""));
    }

    #[test]
    fn test_out_of_range() {
        let err = DemoConfig::from_lookup(lookup_from(&[("RLK_FRAME_MS", "-4")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { var: "RLK_FRAME_MS", .. }));

        let err = DemoConfig::from_lookup(lookup_from(&[("RLK_MAP_HEIGHT", "2")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { var: "RLK_MAP_HEIGHT", .. }));
    }

    #[test]
    fn test_bad_script() {
        let err = DemoConfig::from_lookup(lookup_from(&[("RLK_SCRIPT", "lz")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "RLK_SCRIPT", .. }));
    }
}
