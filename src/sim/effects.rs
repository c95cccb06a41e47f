//! Collision effect state handed to rendering
//!
//! The simulation only runs the particle kinematics. Drawing is up to the host.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::ColorTag;

/// Life lost per particle step
pub const PARTICLE_DECAY: f32 = 0.02;
/// Velocity damping per step
pub const PARTICLE_DRAG: f32 = 0.98;
/// Downward pull added to vertical velocity per step
pub const PARTICLE_GRAVITY: f32 = 0.2;

/// A spark emitted on collision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at birth, removed at 0
    pub life: f32,
    pub size: f32,
    pub color: ColorTag,
}

/// Burst shown where the actor was hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionEffect {
    pub active: bool,
    /// Actor position at the moment of the hit
    pub pos: Vec2,
    pub particles: Vec<Particle>,
}

impl CollisionEffect {
    /// Emit `count` particles around `center`
    pub fn trigger<R: Rng + ?Sized>(&mut self, pos: Vec2, center: Vec2, count: usize, rng: &mut R) {
        self.active = true;
        self.pos = pos;
        self.particles.clear();
        self.particles.extend((0..count).map(|_| Particle {
            pos: center,
            vel: Vec2::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0)),
            life: 1.0,
            size: rng.random_range(4.0..12.0),
            // Orange-red sparks
            color: ColorTag::hsl(rng.random_range(15.0..75.0), 100.0, 60.0),
        }));
    }

    /// One fixed particle step: move, damp, fall, fade
    pub fn step(&mut self) {
        if !self.active {
            return;
        }
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel *= PARTICLE_DRAG;
            p.vel.y += PARTICLE_GRAVITY;
            p.life -= PARTICLE_DECAY;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// End the effect and drop any remaining particles
    pub fn expire(&mut self) {
        self.active = false;
        self.particles.clear();
    }

    pub fn is_animating(&self) -> bool {
        self.active && !self.particles.is_empty()
    }
}
