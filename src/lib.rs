//! Raindrop Dodge - a falling-object avoidance game core
//!
//! Core modules:
//! - `sim`: Simulation (pool, difficulty curve, spawning, collisions, game loop)
//! - `session`: Menu/run lifecycle around a single simulation
//! - `settings`: Data-driven tunables
//! - `error`: Error types for the few fallible seams

pub mod error;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, NameError, SimError};
pub use session::{PlayerName, Session};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default play area (logical pixels)
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;

    /// Actor defaults
    pub const ACTOR_SIZE: f32 = 30.0;
    /// Distance covered by one input step before smoothing
    pub const ACTOR_SPEED: f32 = 50.0;
    /// Exponential smoothing factor applied per input update
    pub const MOVEMENT_BLEND: f32 = 0.35;
    /// Displacement (per axis) above which the actor counts as moving
    pub const MOVING_THRESHOLD: f32 = 1.0;

    /// Collision distance multiplier over the summed radii. Tuned, not a bug.
    pub const COLLISION_TOLERANCE: f32 = 1.5;

    /// Object pool seed size; max capacity is twice this
    pub const POOL_INITIAL_CAPACITY: usize = 150;
    /// Largest accepted seed size
    pub const MAX_POOL_INITIAL_CAPACITY: usize = 1 << 16;

    /// Falling objects start just above the visible top edge
    pub const SPAWN_Y: f32 = -20.0;

    /// Timers (milliseconds)
    pub const SURVIVAL_TICK_MS: f64 = 1000.0;
    pub const GAME_OVER_DELAY_MS: f64 = 1500.0;
    pub const EFFECT_DURATION_MS: f64 = 2000.0;
    pub const PARTICLE_STEP_MS: f64 = 16.0;

    /// Particles emitted on collision
    pub const PARTICLE_COUNT: usize = 15;

    /// Player names are trimmed and limited to this many characters
    pub const MAX_NAME_LEN: usize = 20;
}

/// Axis-aligned clamp of a top-left position so a box of `size` stays inside `bounds`
#[inline]
pub fn clamp_to_bounds(pos: Vec2, size: Vec2, bounds: Vec2) -> Vec2 {
    let max = (bounds - size).max(Vec2::ZERO);
    pos.clamp(Vec2::ZERO, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = Vec2::new(100.0, 50.0);
        let size = Vec2::splat(10.0);

        assert_eq!(clamp_to_bounds(Vec2::new(-5.0, 60.0), size, bounds), Vec2::new(0.0, 40.0));
        assert_eq!(clamp_to_bounds(Vec2::new(20.0, 20.0), size, bounds), Vec2::new(20.0, 20.0));
        // Box larger than the arena pins to the origin
        assert_eq!(
            clamp_to_bounds(Vec2::new(5.0, 5.0), Vec2::splat(200.0), bounds),
            Vec2::ZERO
        );
    }
}
