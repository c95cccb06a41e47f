//! Scheduled tasks for a run
//!
//! Survival ticking, particle steps, effect expiry and the delayed game-over
//! presentation all live here instead of in free-running host timers. The
//! game loop drains due tasks at the start of each frame, so they never
//! interleave with a tick.
//!
//! Tokens carry the scheduler epoch. `cancel_all` bumps the epoch, which
//! invalidates every token handed out for the previous run.

use serde::Serialize;

/// Shortest repeat period; keeps catch-up loops finite
pub const MIN_PERIOD_MS: f64 = 1.0;

/// What a scheduled task does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TaskKind {
    /// +1 survived second
    SurvivalTick,
    /// Advance collision particles
    ParticleStep,
    /// Collision effect ends
    EffectExpiry,
    /// Show the game-over summary
    GameOverPresentation,
}

/// Cancellation handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskToken {
    id: u64,
    epoch: u32,
}

impl TaskToken {
    pub fn epoch(&self) -> u32 {
        self.epoch
    }
}

#[derive(Debug, Clone)]
struct Task {
    token: TaskToken,
    kind: TaskKind,
    due_ms: f64,
    /// Repeating tasks re-arm at `due_ms + period_ms`
    period_ms: Option<f64>,
}

/// Timer queue driven by host timestamps
#[derive(Debug, Default)]
pub struct Scheduler {
    epoch: u32,
    next_id: u64,
    tasks: Vec<Task>,
    frozen_at: Option<f64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn schedule_once(&mut self, kind: TaskKind, now_ms: f64, delay_ms: f64) -> TaskToken {
        self.push(kind, now_ms + delay_ms.max(0.0), None)
    }

    /// First fire is one period from now
    pub fn schedule_every(&mut self, kind: TaskKind, now_ms: f64, period_ms: f64) -> TaskToken {
        let period_ms = period_ms.max(MIN_PERIOD_MS);
        self.push(kind, now_ms + period_ms, Some(period_ms))
    }

    /// Cancel one task. False if it already fired, was cancelled, or belongs
    /// to an earlier epoch.
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.token != token);
        self.tasks.len() != before
    }

    /// Cancel every pending task of `kind`
    pub fn cancel_kind(&mut self, kind: TaskKind) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.kind != kind);
        before - self.tasks.len()
    }

    /// Drop everything and start a new epoch. Returns the new epoch.
    pub fn cancel_all(&mut self) -> u32 {
        if !self.tasks.is_empty() {
            log::debug!(
                "Cancelling {} pending tasks from epoch {}",
                self.tasks.len(),
                self.epoch
            );
        }
        self.tasks.clear();
        self.frozen_at = None;
        self.epoch = self.epoch.wrapping_add(1);
        self.epoch
    }

    /// Whether `token` is still pending in the current epoch
    pub fn is_pending(&self, token: TaskToken) -> bool {
        token.epoch == self.epoch && self.tasks.iter().any(|t| t.token == token)
    }

    pub fn has_pending(&self, kind: TaskKind) -> bool {
        self.tasks.iter().any(|t| t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }

    /// Stop the clock. Nothing fires until `thaw`.
    pub fn freeze(&mut self, now_ms: f64) {
        if self.frozen_at.is_none() {
            self.frozen_at = Some(now_ms);
        }
    }

    /// Restart the clock, pushing every deadline back by the frozen span.
    /// Returns that span.
    pub fn thaw(&mut self, now_ms: f64) -> f64 {
        let Some(frozen_at) = self.frozen_at.take() else {
            return 0.0;
        };
        let shift = (now_ms - frozen_at).max(0.0);
        for task in &mut self.tasks {
            task.due_ms += shift;
        }
        shift
    }

    /// Pop the earliest task due at `now_ms`. Repeating tasks are re-armed
    /// one period later, so a late frame catches up one firing per call.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TaskToken, TaskKind)> {
        if self.frozen_at.is_some() {
            return None;
        }
        // Earliest deadline first; scheduling order breaks ties
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then(a.token.id.cmp(&b.token.id))
            })
            .map(|(i, _)| i)?;

        let task = &mut self.tasks[index];
        let fired = (task.token, task.kind);
        match task.period_ms {
            Some(period) => task.due_ms += period,
            None => {
                self.tasks.swap_remove(index);
            }
        }
        Some(fired)
    }

    fn push(&mut self, kind: TaskKind, due_ms: f64, period_ms: Option<f64>) -> TaskToken {
        self.next_id += 1;
        let token = TaskToken {
            id: self.next_id,
            epoch: self.epoch,
        };
        self.tasks.push(Task {
            token,
            kind,
            due_ms,
            period_ms,
        });
        token
    }
}
