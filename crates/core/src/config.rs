//! Game configuration: defaults, environment overrides and JSON files.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::types::{
    DEFAULT_ACCELERATION_PER_MINUTE, DEFAULT_SCENE_HEIGHT, DEFAULT_SCENE_WIDTH, MAX_SCENE_HEIGHT,
    MAX_SCENE_WIDTH, PLAYER_PENALTY_MS, PLAYER_STEP_MS, RUBBLE_STEP_MS, TRANSITION_STEP_MS,
};

/// Narrowest scene that still lets the longest piece spawn and move.
pub const MIN_SCENE_WIDTH: usize = 6;

/// Lowest scene that fits the tallest piece.
pub const MIN_SCENE_HEIGHT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub scene_width: usize,
    pub scene_height: usize,
    pub player_step_ms: u64,
    pub rubble_step_ms: u64,
    pub player_penalty_ms: u64,
    pub transition_step_ms: u64,
    pub acceleration_per_minute: f64,
    /// Start with a rubble column (with a hole) in the middle of the scene.
    pub initial_divider: bool,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            scene_width: DEFAULT_SCENE_WIDTH,
            scene_height: DEFAULT_SCENE_HEIGHT,
            player_step_ms: PLAYER_STEP_MS as u64,
            rubble_step_ms: RUBBLE_STEP_MS as u64,
            player_penalty_ms: PLAYER_PENALTY_MS as u64,
            transition_step_ms: TRANSITION_STEP_MS as u64,
            acceleration_per_minute: DEFAULT_ACCELERATION_PER_MINUTE,
            initial_divider: true,
            seed: 1,
        }
    }
}

fn env_value<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl GameConfig {
    /// Defaults overridden by `NTETRIS_*` environment variables.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let initial_divider = env::var("NTETRIS_DIVIDER")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(defaults.initial_divider);

        Self {
            scene_width: env_value("NTETRIS_WIDTH").unwrap_or(defaults.scene_width),
            scene_height: env_value("NTETRIS_HEIGHT").unwrap_or(defaults.scene_height),
            player_step_ms: env_value("NTETRIS_PLAYER_STEP_MS").unwrap_or(defaults.player_step_ms),
            rubble_step_ms: env_value("NTETRIS_RUBBLE_STEP_MS").unwrap_or(defaults.rubble_step_ms),
            acceleration_per_minute: env_value("NTETRIS_ACCELERATION")
                .unwrap_or(defaults.acceleration_per_minute),
            seed: env_value("NTETRIS_SEED").unwrap_or(defaults.seed),
            initial_divider,
            ..defaults
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// ```
    /// use ntetris_core::GameConfig;
    ///
    /// let config = GameConfig::from_json_str(r#"{"scene_width": 30, "seed": 7}"#).unwrap();
    /// assert_eq!(config.scene_width, 30);
    /// assert_eq!(config.scene_height, 12);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_SCENE_WIDTH..=MAX_SCENE_WIDTH).contains(&self.scene_width) {
            return Err(SimError::Config(format!(
                "scene_width {} outside {}..={}",
                self.scene_width, MIN_SCENE_WIDTH, MAX_SCENE_WIDTH
            )));
        }
        if !(MIN_SCENE_HEIGHT..=MAX_SCENE_HEIGHT).contains(&self.scene_height) {
            return Err(SimError::Config(format!(
                "scene_height {} outside {}..={}",
                self.scene_height, MIN_SCENE_HEIGHT, MAX_SCENE_HEIGHT
            )));
        }
        if self.player_step_ms == 0 || self.rubble_step_ms == 0 {
            return Err(SimError::Config("step durations must be positive".to_string()));
        }
        if self.acceleration_per_minute.is_nan() || self.acceleration_per_minute < 1.0 {
            return Err(SimError::Config(format!(
                "acceleration_per_minute {} must be at least 1.0",
                self.acceleration_per_minute
            )));
        }
        Ok(())
    }
}
