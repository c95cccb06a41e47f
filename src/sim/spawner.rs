//! Spawn cadence
//!
//! Each tick the spawner checks the time since the last batch against the
//! density-adjusted interval, and when due acquires `spawn_count` objects.

use glam::Vec2;
use rand::Rng;

use super::difficulty::{self, Difficulty};
use super::pool::ObjectPool;
use super::state::{ColorTag, SimulationState};
use crate::consts::SPAWN_Y;

/// Decides when and how many objects enter the arena
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    /// Difficulty memoized for one value of `survived_secs`
    cache: Option<(u32, Difficulty)>,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Difficulty for `survived_secs`, recomputed only when it changes
    pub fn difficulty(&mut self, survived_secs: u32) -> Difficulty {
        match self.cache {
            Some((secs, d)) if secs == survived_secs => d,
            _ => {
                let d = Difficulty::compute(survived_secs);
                if self.cache.is_some_and(|(_, old)| old.tier != d.tier) {
                    log::debug!("Difficulty tier {} at {}s", d.tier, survived_secs);
                }
                self.cache = Some((survived_secs, d));
                d
            }
        }
    }

    /// Spawn a batch if the interval has elapsed. Returns the count spawned.
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        state: &mut SimulationState,
        pool: &mut ObjectPool,
        arena: Vec2,
        rng: &mut R,
    ) -> u32 {
        let d = self.difficulty(state.survived_secs);
        state.tier = d.tier;

        if now_ms - state.last_spawn_ms <= d.effective_interval_ms as f64 {
            return 0;
        }

        for _ in 0..d.spawn_count {
            let size = difficulty::sample_object_size(state.survived_secs, rng);
            let speed = difficulty::sample_fall_speed(state.survived_secs, d.tier, rng);
            let color = sample_color(rng);
            let x = spawn_x(arena.x, size, rng);
            pool.acquire(Vec2::new(x, SPAWN_Y), size, speed, color, now_ms);
        }

        state.last_spawn_ms = now_ms;
        state.spawned_total += d.spawn_count as u64;
        log::debug!(
            "Spawned {} (total {}, active {})",
            d.spawn_count,
            state.spawned_total,
            pool.active_len()
        );
        d.spawn_count
    }
}

/// Uniform across the arena minus the object's footprint
pub fn spawn_x<R: Rng + ?Sized>(arena_width: f32, size: f32, rng: &mut R) -> f32 {
    let span = arena_width - size;
    if span > 0.0 {
        rng.random_range(0.0..span)
    } else {
        0.0
    }
}

/// Blue-to-violet raindrop palette
pub fn sample_color<R: Rng + ?Sized>(rng: &mut R) -> ColorTag {
    let hue = 200.0 + rng.random_range(0.0..60.0);
    let lightness = 50.0 + rng.random_range(0.0..30.0);
    ColorTag::hsl(hue, 70.0, lightness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::{MAX_FALL_SPEED, MAX_OBJECT_SIZE, MIN_OBJECT_SIZE};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const ARENA: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_waits_for_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = ObjectPool::new(16);
        let mut state = SimulationState::new(0, 0.0);
        let mut spawner = Spawner::new();

        // Tier 1 interval is 363ms; spawning needs strictly more
        assert_eq!(spawner.maybe_spawn(363.0, &mut state, &mut pool, ARENA, &mut rng), 0);
        assert_eq!(pool.active_len(), 0);

        assert_eq!(spawner.maybe_spawn(364.0, &mut state, &mut pool, ARENA, &mut rng), 1);
        assert_eq!(pool.active_len(), 1);
        assert_eq!(state.last_spawn_ms, 364.0);
        assert_eq!(state.spawned_total, 1);

        // Clock resets from the last batch
        assert_eq!(spawner.maybe_spawn(500.0, &mut state, &mut pool, ARENA, &mut rng), 0);
    }

    #[test]
    fn test_batch_size_follows_tier() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut pool = ObjectPool::new(16);
        let mut state = SimulationState::new(0, 0.0);
        state.survived_secs = 60; // tier 13 -> 4 per batch
        let mut spawner = Spawner::new();

        assert_eq!(spawner.maybe_spawn(1000.0, &mut state, &mut pool, ARENA, &mut rng), 4);
        assert_eq!(state.tier, 13);
        assert_eq!(state.spawned_total, 4);
    }

    #[test]
    fn test_spawned_objects_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = ObjectPool::new(64);
        let mut state = SimulationState::new(0, 0.0);
        let mut spawner = Spawner::new();

        let mut now = 0.0;
        for secs in 0..40 {
            state.survived_secs = secs;
            now += 1000.0;
            spawner.maybe_spawn(now, &mut state, &mut pool, ARENA, &mut rng);
        }

        assert!(pool.active_len() > 0);
        for obj in pool.active_snapshot() {
            assert!(obj.active);
            assert_eq!(obj.pos.y, SPAWN_Y);
            assert!(obj.pos.x >= 0.0 && obj.pos.x + obj.size <= ARENA.x);
            assert!((MIN_OBJECT_SIZE..=MAX_OBJECT_SIZE).contains(&obj.size));
            assert!(obj.speed > 0.0 && obj.speed <= MAX_FALL_SPEED);
            assert!((200.0..260.0).contains(&obj.color.hue));
        }
    }

    #[test]
    fn test_difficulty_memoized() {
        let mut spawner = Spawner::new();
        let a = spawner.difficulty(12);
        assert_eq!(spawner.cache.map(|(s, _)| s), Some(12));
        assert_eq!(spawner.difficulty(12), a);
        spawner.difficulty(13);
        assert_eq!(spawner.cache.map(|(s, _)| s), Some(13));
    }

    #[test]
    fn test_spawn_x_narrow_arena() {
        let mut rng = Pcg32::seed_from_u64(4);
        assert_eq!(spawn_x(10.0, 20.0, &mut rng), 0.0);
    }
}
