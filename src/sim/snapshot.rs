//! Read-only frame view for rendering and UI

use super::effects::CollisionEffect;
use super::pool::ObjectPool;
use super::state::{Actor, FallingObject, GamePhase};

/// Everything a renderer needs for one frame, borrowed from the simulation
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub phase: GamePhase,
    pub score: u64,
    pub survived_secs: u32,
    pub tier: u32,
    pub actor: &'a Actor,
    pub effect: &'a CollisionEffect,
    pub(crate) pool: &'a ObjectPool,
}

impl<'a> FrameSnapshot<'a> {
    /// Active objects in draw order (spawn order)
    pub fn objects(&self) -> impl Iterator<Item = &'a FallingObject> + use<'a> {
        self.pool.active_snapshot()
    }

    pub fn object_count(&self) -> usize {
        self.pool.active_len()
    }

    /// Survival time as `m:ss`
    pub fn clock(&self) -> String {
        format!("{}:{:02}", self.survived_secs / 60, self.survived_secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use crate::settings::Settings;
    use crate::sim::Simulation;

    #[test]
    fn test_snapshot_mirrors_simulation() {
        let mut sim = Simulation::new(Settings::default(), 9, 0.0).unwrap();
        sim.advance(400.0).unwrap();
        let snap = sim.snapshot();
        assert_eq!(snap.score, 0);
        assert_eq!(snap.tier, 1);
        assert_eq!(snap.object_count(), 1);
        assert_eq!(snap.objects().count(), 1);
        assert_eq!(snap.actor, sim.actor());
    }

    #[test]
    fn test_clock_format() {
        let mut sim = Simulation::new(Settings::default(), 9, 0.0).unwrap();
        sim.advance(65_000.0).unwrap();
        assert_eq!(sim.snapshot().clock(), "1:05");
    }
}
