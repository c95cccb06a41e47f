//! Frame-driven game loop
//!
//! One `advance(now)` per rendered frame. Due timers run first, then the
//! fixed tick order while Playing:
//!
//! 1. spawn
//! 2. apply movement intent
//! 3. advance objects, release those past the bottom (+1 score each)
//! 4. collide; a hit ends the run and schedules the game-over presentation
//!
//! Everything runs on the caller's thread. Timers are serialized with the
//! tick through the scheduler, so survival seconds are counted exactly once.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision;
use super::effects::CollisionEffect;
use super::movement::{Direction, MovementIntegrator};
use super::pool::ObjectPool;
use super::snapshot::FrameSnapshot;
use super::spawner::Spawner;
use super::state::{Actor, GameEvent, GamePhase, ObjectId, SimulationState};
use super::timers::{Scheduler, TaskKind, TaskToken};
use crate::error::SimError;
use crate::settings::Settings;

/// What happened during one `advance`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    pub spawned: u32,
    /// Objects that reached the bottom this frame
    pub scored: usize,
    pub collided: bool,
    pub timers_fired: u32,
}

/// One run of the game, from start to teardown
#[derive(Debug)]
pub struct Simulation {
    settings: Settings,
    seed: u64,
    rng: Pcg32,
    pool: ObjectPool,
    spawner: Spawner,
    movement: MovementIntegrator,
    scheduler: Scheduler,
    state: SimulationState,
    actor: Actor,
    effect: CollisionEffect,
    intent: Option<Direction>,
    events: Vec<GameEvent>,
    /// Last timestamp seen
    now_ms: f64,
    survival_timer: Option<TaskToken>,
}

impl Simulation {
    /// Start a run at `now_ms`. Settings are validated first.
    pub fn new(settings: Settings, seed: u64, now_ms: f64) -> Result<Self, SimError> {
        if !now_ms.is_finite() {
            return Err(SimError::InvalidTimestamp(now_ms));
        }
        settings.validate()?;
        let arena = settings.arena();
        let scheduler = Scheduler::new();
        let mut sim = Self {
            rng: Pcg32::seed_from_u64(seed),
            pool: ObjectPool::new(settings.pool_initial_capacity),
            spawner: Spawner::new(),
            movement: MovementIntegrator::new(settings.movement_blend, arena),
            state: SimulationState::new(scheduler.epoch(), now_ms),
            scheduler,
            actor: Actor::centered(settings.actor_size, settings.actor_speed, arena),
            effect: CollisionEffect::default(),
            intent: None,
            events: Vec::new(),
            now_ms,
            survival_timer: None,
            seed,
            settings,
        };
        sim.arm_survival_timer(now_ms);
        log::info!(
            "Run started: seed={}, arena={}x{}",
            seed,
            sim.settings.arena_width,
            sim.settings.arena_height
        );
        Ok(sim)
    }

    /// Advance to host time `now_ms`: fire due timers, then tick if Playing
    pub fn advance(&mut self, now_ms: f64) -> Result<FrameReport, SimError> {
        self.observe_time(now_ms)?;
        let mut report = FrameReport::default();

        if self.state.phase == GamePhase::Paused {
            return Ok(report);
        }

        while let Some((token, kind)) = self.scheduler.pop_due(now_ms) {
            if token.epoch() != self.state.epoch {
                continue;
            }
            self.run_task(token, kind);
            report.timers_fired += 1;
        }

        if self.state.is_playing() {
            self.tick(now_ms, &mut report);
        }
        Ok(report)
    }

    fn tick(&mut self, now_ms: f64, report: &mut FrameReport) {
        let arena = self.settings.arena();

        report.spawned = self.spawner.maybe_spawn(
            now_ms,
            &mut self.state,
            &mut self.pool,
            arena,
            &mut self.rng,
        );

        self.movement.apply_intent(&mut self.actor, self.intent);

        let floor = arena.y;
        let scored = self.pool.filter_and_release(|obj| {
            obj.pos.y += obj.speed;
            obj.pos.y < floor
        });
        if scored > 0 {
            self.state.score += scored as u64;
            self.events.push(GameEvent::ScoreChanged {
                score: self.state.score,
            });
        }
        report.scored = scored;

        let hit = collision::evaluate(&self.actor, self.pool.active_snapshot()).map(|obj| obj.id);
        if let Some(object) = hit {
            self.end_run(now_ms, object);
            report.collided = true;
        }

        log::trace!(
            "tick t={:.0} active={} score={} secs={}",
            now_ms,
            self.pool.active_len(),
            self.state.score,
            self.state.survived_secs
        );
    }

    fn end_run(&mut self, now_ms: f64, object: ObjectId) {
        self.state.phase = GamePhase::Ended;
        if let Some(token) = self.survival_timer.take() {
            self.scheduler.cancel(token);
        }

        self.effect.trigger(
            self.actor.pos,
            self.actor.center(),
            self.settings.particle_count,
            &mut self.rng,
        );
        self.scheduler
            .schedule_every(TaskKind::ParticleStep, now_ms, self.settings.particle_step_ms);
        self.scheduler
            .schedule_once(TaskKind::EffectExpiry, now_ms, self.settings.effect_duration_ms);
        self.scheduler.schedule_once(
            TaskKind::GameOverPresentation,
            now_ms,
            self.settings.game_over_delay_ms,
        );

        self.events.push(GameEvent::Collided {
            object,
            at: self.actor.pos,
        });
        log::info!(
            "Run ended: hit {:?}, score={}, survived={}s",
            object,
            self.state.score,
            self.state.survived_secs
        );
    }

    fn run_task(&mut self, token: TaskToken, kind: TaskKind) {
        match kind {
            TaskKind::SurvivalTick => {
                if self.state.is_playing() {
                    self.state.survived_secs += 1;
                }
            }
            TaskKind::ParticleStep => {
                self.effect.step();
                if !self.effect.is_animating() {
                    self.scheduler.cancel(token);
                }
            }
            TaskKind::EffectExpiry => {
                self.effect.expire();
                self.scheduler.cancel_kind(TaskKind::ParticleStep);
            }
            TaskKind::GameOverPresentation => {
                if self.state.phase == GamePhase::Ended && !self.state.game_over_presented {
                    self.state.game_over_presented = true;
                    self.events.push(GameEvent::GameOver {
                        final_score: self.state.score,
                        survived_secs: self.state.survived_secs,
                    });
                }
            }
        }
    }

    /// Freeze the run. False unless it was Playing.
    pub fn pause(&mut self, now_ms: f64) -> Result<bool, SimError> {
        self.observe_time(now_ms)?;
        if self.state.phase != GamePhase::Playing {
            return Ok(false);
        }
        self.state.phase = GamePhase::Paused;
        self.scheduler.freeze(now_ms);
        self.events.push(GameEvent::Paused);
        log::info!("Paused at {:.0}ms", now_ms);
        Ok(true)
    }

    /// Continue a paused run. Timers and the spawn clock skip the paused span.
    pub fn resume(&mut self, now_ms: f64) -> Result<bool, SimError> {
        self.observe_time(now_ms)?;
        if self.state.phase != GamePhase::Paused {
            return Ok(false);
        }
        let paused_for = self.scheduler.thaw(now_ms);
        self.state.last_spawn_ms += paused_for;
        self.state.phase = GamePhase::Playing;
        self.events.push(GameEvent::Resumed);
        log::info!("Resumed after {:.0}ms", paused_for);
        Ok(true)
    }

    /// Throw the current run away and start a fresh one
    ///
    /// Allowed from any phase. Pending timers of the old run are cancelled and
    /// every active object goes back to the pool.
    pub fn restart(&mut self, now_ms: f64) -> Result<(), SimError> {
        self.observe_time(now_ms)?;
        let epoch = self.scheduler.cancel_all();
        let released = self.pool.release_all();

        self.state = SimulationState::new(epoch, now_ms);
        self.actor.recenter(self.settings.arena());
        self.effect = CollisionEffect::default();
        self.intent = None;
        self.spawner = Spawner::new();
        self.arm_survival_timer(now_ms);

        self.events.push(GameEvent::Restarted);
        log::info!("Restarted: epoch={}, released {} objects", epoch, released);
        Ok(())
    }

    /// Cancel every timer and return all objects. The run cannot advance
    /// meaningfully afterwards.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.pool.release_all();
        self.effect.expire();
        self.survival_timer = None;
        self.state.phase = GamePhase::Ended;
        log::debug!("Run torn down");
    }

    /// Movement intent applied on every following tick until changed
    pub fn set_intent(&mut self, intent: Option<Direction>) {
        self.intent = intent;
    }

    pub fn intent(&self) -> Option<Direction> {
        self.intent
    }

    /// Take queued lifecycle events, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            phase: self.state.phase,
            score: self.state.score,
            survived_secs: self.state.survived_secs,
            tier: self.state.tier,
            actor: &self.actor,
            effect: &self.effect,
            pool: &self.pool,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn survived_secs(&self) -> u32 {
        self.state.survived_secs
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn pool(&self) -> &ObjectPool {
        &self.pool
    }

    pub fn effect(&self) -> &CollisionEffect {
        &self.effect
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn arm_survival_timer(&mut self, now_ms: f64) {
        self.survival_timer = Some(self.scheduler.schedule_every(
            TaskKind::SurvivalTick,
            now_ms,
            self.settings.survival_tick_ms,
        ));
    }

    fn observe_time(&mut self, now_ms: f64) -> Result<(), SimError> {
        if !now_ms.is_finite() {
            return Err(SimError::InvalidTimestamp(now_ms));
        }
        if now_ms < self.now_ms {
            return Err(SimError::ClockWentBackwards {
                previous: self.now_ms,
                now: now_ms,
            });
        }
        self.now_ms = now_ms;
        Ok(())
    }
}
