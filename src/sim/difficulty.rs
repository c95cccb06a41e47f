//! Procedural difficulty curve
//!
//! Everything here is a function of whole seconds survived. The stochastic
//! terms (fall-speed jitter, size variation) are split out: `fall_speed` and
//! `object_size` take the random rolls as arguments, and the `sample_*`
//! wrappers draw them from an injected RNG.
//!
//! Every term is bounded, so no survival time can produce a zero interval,
//! runaway speed or a degenerate size.

use rand::Rng;
use serde::Serialize;

/// Seconds per tier step
pub const TIER_SECONDS: u32 = 5;
/// Difficulty plateaus here
pub const MAX_TIER: u32 = 20;

pub const BASE_SPAWN_INTERVAL_MS: f32 = 400.0;
pub const MIN_SPAWN_INTERVAL_MS: f32 = 50.0;
/// Floor after the density bonus is applied
pub const MIN_EFFECTIVE_INTERVAL_MS: f32 = 30.0;
pub const MAX_DENSITY_BONUS_MS: f32 = 100.0;
pub const MAX_SPAWN_COUNT: u32 = 4;

pub const BASE_FALL_SPEED: f32 = 3.0;
pub const MAX_FALL_SPEED: f32 = 25.0;
/// Fall-speed jitter is uniform in [0, this)
pub const FALL_SPEED_JITTER: f32 = 2.0;

pub const BASE_OBJECT_SIZE: f32 = 15.0;
pub const MIN_OBJECT_SIZE: f32 = 10.0;
pub const MAX_OBJECT_SIZE: f32 = 40.0;
/// Size variation is uniform in [0, this)
pub const OBJECT_SIZE_JITTER: f32 = 15.0;
/// Chance of an occasional large object
pub const LARGE_OBJECT_CHANCE: f64 = 0.1;
pub const LARGE_OBJECT_BONUS: f32 = 20.0;

/// Spawn parameters for the current survival time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Difficulty {
    pub tier: u32,
    /// Tier-derived interval, before the density bonus
    pub spawn_interval_ms: f32,
    /// Interval the spawner actually waits
    pub effective_interval_ms: f32,
    /// Objects per spawn batch
    pub spawn_count: u32,
}

impl Difficulty {
    /// Compute the deterministic spawn parameters for `survived_secs`
    pub fn compute(survived_secs: u32) -> Self {
        let tier = tier(survived_secs);
        let spawn_interval_ms = spawn_interval_ms(tier);
        Self {
            tier,
            spawn_interval_ms,
            effective_interval_ms: effective_interval_ms(spawn_interval_ms, survived_secs),
            spawn_count: spawn_count(tier),
        }
    }
}

/// `min(floor(t / 5) + 1, 20)`
pub fn tier(survived_secs: u32) -> u32 {
    (survived_secs / TIER_SECONDS + 1).min(MAX_TIER)
}

/// Linear plus super-linear reduction, floored at 50ms
pub fn spawn_interval_ms(tier: u32) -> f32 {
    let tier = tier as f32;
    let linear = tier * 25.0;
    let super_linear = tier.powf(1.4) * 12.0;
    (BASE_SPAWN_INTERVAL_MS - linear - super_linear).max(MIN_SPAWN_INTERVAL_MS)
}

/// Density bonus: up to 100ms off the interval, growing 2ms per second
pub fn effective_interval_ms(spawn_interval_ms: f32, survived_secs: u32) -> f32 {
    let bonus = (survived_secs as f32 * 2.0).min(MAX_DENSITY_BONUS_MS);
    (spawn_interval_ms - bonus).max(MIN_EFFECTIVE_INTERVAL_MS)
}

/// `min(1 + floor(tier / 4), 4)`
pub fn spawn_count(tier: u32) -> u32 {
    (1 + tier / 4).min(MAX_SPAWN_COUNT)
}

/// Fall speed for a given jitter roll in [0, 2)
pub fn fall_speed(survived_secs: u32, tier: u32, jitter: f32) -> f32 {
    let t = survived_secs as f32;
    let time_bonus = (t * 0.3).min(15.0);
    let tier_bonus = tier as f32 * 0.8;
    let ramp = (t / 10.0).powf(1.2) * 2.0;
    let jitter = jitter.clamp(0.0, FALL_SPEED_JITTER);

    (BASE_FALL_SPEED + time_bonus + tier_bonus + ramp + jitter).min(MAX_FALL_SPEED)
}

/// Random rolls feeding `object_size`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeRoll {
    /// Uniform in [0, 15)
    pub variation: f32,
    /// 0 most of the time, otherwise uniform in [0, 20)
    pub large_bonus: f32,
}

/// Object size: oscillating base plus rolls, clamped to [10, 40]
pub fn object_size(survived_secs: u32, roll: SizeRoll) -> f32 {
    let wave = (survived_secs as f32 * 0.5).sin() * 5.0;
    let variation = roll.variation.clamp(0.0, OBJECT_SIZE_JITTER);
    let large = roll.large_bonus.clamp(0.0, LARGE_OBJECT_BONUS);

    (BASE_OBJECT_SIZE + wave + variation + large).clamp(MIN_OBJECT_SIZE, MAX_OBJECT_SIZE)
}

pub fn sample_fall_speed<R: Rng + ?Sized>(survived_secs: u32, tier: u32, rng: &mut R) -> f32 {
    let jitter = rng.random_range(0.0..FALL_SPEED_JITTER);
    fall_speed(survived_secs, tier, jitter)
}

pub fn sample_size_roll<R: Rng + ?Sized>(rng: &mut R) -> SizeRoll {
    let variation = rng.random_range(0.0..OBJECT_SIZE_JITTER);
    let large_bonus = if rng.random_bool(LARGE_OBJECT_CHANCE) {
        rng.random_range(0.0..LARGE_OBJECT_BONUS)
    } else {
        0.0
    };
    SizeRoll {
        variation,
        large_bonus,
    }
}

pub fn sample_object_size<R: Rng + ?Sized>(survived_secs: u32, rng: &mut R) -> f32 {
    object_size(survived_secs, sample_size_roll(rng))
}
