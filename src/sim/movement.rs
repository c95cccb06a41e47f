//! Actor movement
//!
//! Input arrives as an eight-way direction intent. One input step targets
//! `pos + direction * speed` (diagonals normalized), and the integrator blends
//! the actor toward that target after clamping it to the arena.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Actor, Facing};
use crate::clamp_to_bounds;
use crate::consts::{MOVEMENT_BLEND, MOVING_THRESHOLD};

/// Compass direction of player intent (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Unit-length step vector; diagonals are divided by sqrt(2) on both axes
    pub fn vector(self) -> Vec2 {
        let d = FRAC_1_SQRT_2;
        match self {
            Direction::North => Vec2::new(0.0, -1.0),
            Direction::NorthEast => Vec2::new(d, -d),
            Direction::East => Vec2::new(1.0, 0.0),
            Direction::SouthEast => Vec2::new(d, d),
            Direction::South => Vec2::new(0.0, 1.0),
            Direction::SouthWest => Vec2::new(-d, d),
            Direction::West => Vec2::new(-1.0, 0.0),
            Direction::NorthWest => Vec2::new(-d, -d),
        }
    }

    /// Direction from axis signs (-1, 0, 1). `None` when both are zero.
    pub fn from_axes(x: i32, y: i32) -> Option<Direction> {
        match (x.signum(), y.signum()) {
            (0, -1) => Some(Direction::North),
            (1, -1) => Some(Direction::NorthEast),
            (1, 0) => Some(Direction::East),
            (1, 1) => Some(Direction::SouthEast),
            (0, 1) => Some(Direction::South),
            (-1, 1) => Some(Direction::SouthWest),
            (-1, 0) => Some(Direction::West),
            (-1, -1) => Some(Direction::NorthWest),
            _ => None,
        }
    }

    /// Direction from held keys; opposing keys cancel
    pub fn from_keys(up: bool, down: bool, left: bool, right: bool) -> Option<Direction> {
        let x = right as i32 - left as i32;
        let y = down as i32 - up as i32;
        Self::from_axes(x, y)
    }
}

/// Smooths actor motion toward a clamped target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementIntegrator {
    /// Fraction of the remaining distance covered per update
    pub blend: f32,
    pub arena: Vec2,
}

impl MovementIntegrator {
    pub fn new(blend: f32, arena: Vec2) -> Self {
        Self {
            blend: blend.clamp(0.0, 1.0),
            arena,
        }
    }

    /// Blend `actor` toward `target` (top-left position)
    pub fn update(&self, actor: &mut Actor, target: Vec2) {
        let target = clamp_to_bounds(target, actor.size, self.arena);
        let delta = target - actor.pos;

        actor.is_moving = delta.x.abs() > MOVING_THRESHOLD || delta.y.abs() > MOVING_THRESHOLD;
        if actor.is_moving {
            actor.last_direction = Some(if delta.x.abs() >= delta.y.abs() {
                if delta.x > 0.0 { Facing::Right } else { Facing::Left }
            } else if delta.y > 0.0 {
                Facing::Down
            } else {
                Facing::Up
            });
        }

        let next = actor.pos.lerp(target, self.blend);
        actor.velocity = next - actor.pos;
        actor.pos = next;
    }

    /// Apply one input sample. No intent holds position and clears `is_moving`.
    pub fn apply_intent(&self, actor: &mut Actor, intent: Option<Direction>) {
        let target = match intent {
            Some(direction) => actor.pos + direction.vector() * actor.speed,
            None => actor.pos,
        };
        self.update(actor, target);
    }
}

impl Default for MovementIntegrator {
    fn default() -> Self {
        Self::new(
            MOVEMENT_BLEND,
            Vec2::new(crate::consts::ARENA_WIDTH, crate::consts::ARENA_HEIGHT),
        )
    }
}
