//! Simulation module
//!
//! All gameplay logic lives here. Rules for this module:
//! - Host timestamps in, events and snapshots out
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod movement;
pub mod pool;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{Collider, collides, evaluate};
pub use difficulty::Difficulty;
pub use effects::{CollisionEffect, Particle};
pub use movement::{Direction, MovementIntegrator};
pub use pool::{ObjectHandle, ObjectPool, PoolStats};
pub use snapshot::FrameSnapshot;
pub use spawner::Spawner;
pub use state::{
    Actor, ColorTag, Facing, FallingObject, GameEvent, GamePhase, ObjectId, SimulationState,
};
pub use tick::{FrameReport, Simulation};
pub use timers::{Scheduler, TaskKind, TaskToken};
