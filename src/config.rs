//! Tuning and host settings
//!
//! Loaded once at startup from a JSON file. Every field has a default, so a
//! partial file only overrides what it names.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};

/// Environment variable that points at an alternate config file.
pub const CONFIG_ENV: &str = "ARENA_PURSUIT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// World rectangle, origin top-left.
    pub world: Vec2,
    pub player_spawn: Vec2,
    pub enemy_spawn: Vec2,
    /// Fixed point the player's facing is measured from (not the live position).
    pub aim_origin: Vec2,
    /// Per-axis movement per held key, per frame.
    pub player_step: f32,
    pub enemy_speed: f32,
    /// Enemy pursues when distance <= this (compared squared).
    pub aggro_radius: f32,
    pub projectile_speed: f32,
    /// Length of the aim line drawn from the player.
    pub aim_length: f32,
    /// Projectiles further than this outside the world are removed.
    /// `None` keeps them forever.
    pub projectile_cull_margin: Option<f32>,
    /// Target frame duration in milliseconds.
    pub frame_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: Vec2::new(1280.0, 720.0),
            player_spawn: Vec2::new(640.0, 360.0),
            enemy_spawn: Vec2::new(100.0, 100.0),
            aim_origin: Vec2::new(640.0, 360.0),
            player_step: 2.0,
            enemy_speed: 1.5,
            aggro_radius: 200.0,
            projectile_speed: 5.0,
            aim_length: 20.0,
            projectile_cull_margin: Some(64.0),
            frame_ms: 16,
        }
    }
}

impl Config {
    /// `$ARENA_PURSUIT_CONFIG`, else `~/.arena_pursuit.json`.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".arena_pursuit.json")
    }

    /// Load and validate a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ArenaError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ArenaError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.world.x > 0.0 && self.world.y > 0.0) || !self.world.is_finite() {
            return Err(ArenaError::InvalidConfig(format!(
                "world must be positive, got {:?}",
                self.world
            )));
        }
        let speeds = [
            ("player_step", self.player_step),
            ("enemy_speed", self.enemy_speed),
            ("aggro_radius", self.aggro_radius),
            ("projectile_speed", self.projectile_speed),
            ("aim_length", self.aim_length),
        ];
        for (name, value) in speeds {
            if !value.is_finite() || value < 0.0 {
                return Err(ArenaError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if let Some(margin) = self.projectile_cull_margin {
            if !margin.is_finite() || margin < 0.0 {
                return Err(ArenaError::InvalidConfig(format!(
                    "projectile_cull_margin must be non-negative, got {margin}"
                )));
            }
        }
        if self.frame_ms == 0 {
            return Err(ArenaError::InvalidConfig("frame_ms must be at least 1".into()));
        }
        Ok(())
    }
}
