//! Game state and core simulation types

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen; resumes to Playing with pool and actor untouched
    Paused,
    /// Run ended by a collision. Only an explicit restart leaves this.
    Ended,
}

/// Unique identity of one falling-object lifetime
///
/// A pooled instance gets a fresh id every time it is acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Identity of an inert, pooled instance
    pub const NONE: ObjectId = ObjectId(0);
}

/// Visual tag passed through to rendering (HSL). Opaque to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorTag {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl ColorTag {
    pub const fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }
}

impl Default for ColorTag {
    fn default() -> Self {
        // #4FC3F7-ish sky blue
        Self::hsl(199.0, 91.0, 64.0)
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({:.0}, {:.0}%, {:.0}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// A falling object (raindrop)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: ObjectId,
    /// Top-left corner
    pub pos: Vec2,
    /// Diameter
    pub size: f32,
    /// Pixels advanced per tick
    pub speed: f32,
    pub color: ColorTag,
    pub active: bool,
    /// Host timestamp (ms) of the acquire that produced this lifetime
    pub created_at_ms: f64,
}

impl FallingObject {
    /// Inert instance as it sits in the free list
    pub fn inert() -> Self {
        Self {
            id: ObjectId::NONE,
            pos: Vec2::ZERO,
            size: 15.0,
            speed: 2.0,
            color: ColorTag::default(),
            active: false,
            created_at_ms: 0.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Clear per-lifetime fields back to sentinel defaults
    pub fn reset(&mut self) {
        self.id = ObjectId::NONE;
        self.pos = Vec2::ZERO;
        self.active = false;
    }
}

/// Dominant axis of the last intended displacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

/// The player-controlled actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Distance covered by one input step
    pub speed: f32,
    /// Displacement applied by the last smoothing step
    pub velocity: Vec2,
    pub is_moving: bool,
    pub last_direction: Option<Facing>,
}

impl Actor {
    pub fn new(size: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::splat(size),
            speed,
            velocity: Vec2::ZERO,
            is_moving: false,
            last_direction: None,
        }
    }

    /// Actor placed at the center of the arena
    pub fn centered(size: f32, speed: f32, arena: Vec2) -> Self {
        let mut actor = Self::new(size, speed);
        actor.recenter(arena);
        actor
    }

    /// Move back to the arena center and drop movement state
    pub fn recenter(&mut self, arena: Vec2) {
        self.pos = crate::clamp_to_bounds((arena - self.size) / 2.0, self.size, arena);
        self.velocity = Vec2::ZERO;
        self.is_moving = false;
        self.last_direction = None;
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Collision radius (half the width)
    pub fn radius(&self) -> f32 {
        self.size.x / 2.0
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new(ACTOR_SIZE, ACTOR_SPEED)
    }
}

/// Lifecycle notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score changed (objects reached the bottom)
    ScoreChanged { score: u64 },
    /// Actor hit an object; the run is now Ended. Start of the visual effect.
    Collided { object: ObjectId, at: Vec2 },
    /// Terminal presentation, fired after the grace delay
    GameOver { final_score: u64, survived_secs: u32 },
    Paused,
    Resumed,
    Restarted,
    ReturnedToMenu,
}

/// Per-run bookkeeping. Replaced wholesale on restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Epoch of the scheduler this run belongs to
    pub epoch: u32,
    pub phase: GamePhase,
    /// Objects that reached the bottom
    pub score: u64,
    /// Whole seconds survived while Playing
    pub survived_secs: u32,
    /// Current difficulty tier (1..=20)
    pub tier: u32,
    /// Objects spawned so far
    pub spawned_total: u64,
    /// Host timestamp (ms) of the last spawn batch
    pub last_spawn_ms: f64,
    /// Host timestamp (ms) the run started at
    pub started_at_ms: f64,
    /// Game-over presentation already fired
    pub game_over_presented: bool,
}

impl SimulationState {
    pub fn new(epoch: u32, now_ms: f64) -> Self {
        Self {
            epoch,
            phase: GamePhase::Playing,
            score: 0,
            survived_secs: 0,
            tier: 1,
            spawned_total: 0,
            last_spawn_ms: now_ms,
            started_at_ms: now_ms,
            game_over_presented: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}
