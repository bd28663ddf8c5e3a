/// Tunable simulation constants.
///
/// Defaults reproduce the arcade layout: an 800×600 screen whose left 65%
/// is the playfield and whose right side holds the HUD.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest entity footprint (the single boss); the playfield must fit it.
const MIN_PLAYFIELD: f32 = 80.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Logical ticks per second; the front end sleeps to hold this rate.
    pub tick_rate: u32,
    /// Ticks of title banner before play starts.
    pub start_countdown: u32,
    pub apple_interval: u32,
    pub invincibility_ticks: u32,
    pub base_player_speed: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield_width: (800.0_f32 * 0.65).floor(),
            playfield_height: 600.0,
            tick_rate: 60,
            start_countdown: 180,
            apple_interval: 3000,
            invincibility_ticks: 120,
            base_player_speed: 5.0,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.playfield_width >= MIN_PLAYFIELD) {
            return Err(ConfigError::Invalid {
                field: "playfield_width",
                reason: format!("must be at least {MIN_PLAYFIELD}, got {}", self.playfield_width),
            });
        }
        if !(self.playfield_height >= MIN_PLAYFIELD) {
            return Err(ConfigError::Invalid {
                field: "playfield_height",
                reason: format!("must be at least {MIN_PLAYFIELD}, got {}", self.playfield_height),
            });
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_rate",
                reason: "must be non-zero".to_string(),
            });
        }
        if !(self.base_player_speed > 0.0) {
            return Err(ConfigError::Invalid {
                field: "base_player_speed",
                reason: format!("must be positive, got {}", self.base_player_speed),
            });
        }
        Ok(())
    }

    /// Milliseconds covered by one tick.
    pub fn tick_millis(&self) -> u64 {
        1000 / u64::from(self.tick_rate.max(1))
    }
}
