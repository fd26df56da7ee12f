//! Run configuration
//!
//! World bounds and simulation knobs. Loaded from JSON on native builds,
//! defaults everywhere else.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating [`Settings`]
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(&'static str),
}

/// Smallest world side that still fits the spawn margins and the boss
const MIN_WORLD_SIDE: f32 = 200.0;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical play-area width
    pub world_width: f32,
    /// Logical play-area height
    pub world_height: f32,
    /// RNG seed (fixed so a fresh run is reproducible)
    pub seed: u32,
    /// Rocks scattered on the field when the world is created
    pub initial_rocks: usize,
    /// Upper bound for a single simulation step (seconds)
    pub max_frame_dt: f32,
    /// Keep knockback from pushing the player out of the play area
    pub clamp_knockback: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: 960.0,
            world_height: 540.0,
            seed: 42,
            initial_rocks: 70,
            max_frame_dt: 0.033,
            clamp_knockback: true,
        }
    }
}

impl Settings {
    /// World size as a vector
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    /// Center of the play area (spawn and respawn point)
    pub fn world_center(&self) -> Vec2 {
        self.world_size() * 0.5
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.world_width.is_finite() || !self.world_height.is_finite() {
            return Err(SettingsError::Invalid("world size must be finite"));
        }
        if self.world_width < MIN_WORLD_SIDE || self.world_height < MIN_WORLD_SIDE {
            return Err(SettingsError::Invalid("world must be at least 200x200"));
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return Err(SettingsError::Invalid("max_frame_dt must be positive"));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from `path`, falling back to defaults when that fails
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }
}
