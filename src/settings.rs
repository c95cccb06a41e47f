//! Game tunables
//!
//! Loaded from a JSON file by the shell; every field falls back to the
//! reference value when missing.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Play area width (logical pixels)
    pub arena_width: f32,
    /// Play area height; objects crossing it score a point
    pub arena_height: f32,

    // === Pool ===
    /// Objects preallocated at startup (max capacity is twice this)
    pub pool_initial_capacity: usize,

    // === Actor ===
    pub actor_size: f32,
    /// Distance of one input step before smoothing
    pub actor_speed: f32,
    /// Blend factor toward the clamped target, per update
    pub movement_blend: f32,

    // === Timers (ms) ===
    pub survival_tick_ms: f64,
    /// Delay between the hit and the game-over presentation
    pub game_over_delay_ms: f64,
    pub effect_duration_ms: f64,
    pub particle_step_ms: f64,

    // === Effects ===
    pub particle_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            pool_initial_capacity: POOL_INITIAL_CAPACITY,

            actor_size: ACTOR_SIZE,
            actor_speed: ACTOR_SPEED,
            movement_blend: MOVEMENT_BLEND,

            survival_tick_ms: SURVIVAL_TICK_MS,
            game_over_delay_ms: GAME_OVER_DELAY_MS,
            effect_duration_ms: EFFECT_DURATION_MS,
            particle_step_ms: PARTICLE_STEP_MS,

            particle_count: PARTICLE_COUNT,
        }
    }
}

impl Settings {
    /// Play area as a vector
    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena_width.is_finite() && self.arena_height.is_finite()) {
            return Err(ConfigError::Invalid("arena dimensions must be finite".into()));
        }
        if !(self.actor_size.is_finite() && self.actor_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "actor_size must be positive, got {}",
                self.actor_size
            )));
        }
        if !(self.actor_speed.is_finite() && self.actor_speed >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "actor_speed must be >= 0, got {}",
                self.actor_speed
            )));
        }
        if self.arena_width <= self.actor_size || self.arena_height <= self.actor_size {
            return Err(ConfigError::Invalid(format!(
                "arena {}x{} is too small for an actor of size {}",
                self.arena_width, self.arena_height, self.actor_size
            )));
        }
        if !(self.movement_blend > 0.0 && self.movement_blend <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "movement_blend must be in (0, 1], got {}",
                self.movement_blend
            )));
        }
        if !(1..=MAX_POOL_INITIAL_CAPACITY).contains(&self.pool_initial_capacity) {
            return Err(ConfigError::Invalid(format!(
                "pool_initial_capacity must be in 1..={}, got {}",
                MAX_POOL_INITIAL_CAPACITY, self.pool_initial_capacity
            )));
        }
        let periods = [
            ("survival_tick_ms", self.survival_tick_ms),
            ("particle_step_ms", self.particle_step_ms),
        ];
        for (name, value) in periods {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        let delays = [
            ("game_over_delay_ms", self.game_over_delay_ms),
            ("effect_duration_ms", self.effect_duration_ms),
        ];
        for (name, value) in delays {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be >= 0, got {value}")));
            }
        }
        Ok(())
    }
}
