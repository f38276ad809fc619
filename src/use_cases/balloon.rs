// Balloon shooter: fingertip aiming over a rising-balloon simulation.

use crate::domain::landmarks::HandLandmarks;
use crate::domain::ports::RandomSource;
use crate::domain::state::{Balloon, Pointer};
use crate::domain::systems::balloons::{SpawnState, TickReport, tick_balloons};
use crate::domain::systems::pointer::project_aim;
use crate::domain::tuning::BalloonTuning;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalloonPhase {
    /// No game yet, or stopped by the player.
    Stopped,
    Running,
    /// Time ran out. Frozen until the next start.
    Over,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalloonSnapshot {
    pub phase: BalloonPhase,
    pub score: i32,
    pub level: u32,
    pub remaining_seconds: u32,
    pub pointer: Pointer,
    pub balloons: Vec<Balloon>,
}

pub struct BalloonSession<R> {
    tuning: BalloonTuning,
    rng: R,

    phase: BalloonPhase,
    score: i32,
    level: u32,
    remaining_seconds: u32,

    pointer: Pointer,
    balloons: Vec<Balloon>,
    spawn: SpawnState,
}

impl<R: RandomSource> BalloonSession<R> {
    pub fn new(tuning: BalloonTuning, rng: R) -> Self {
        Self {
            tuning,
            rng,
            phase: BalloonPhase::Stopped,
            score: 0,
            level: 1,
            remaining_seconds: tuning.session_seconds,
            pointer: Pointer::hidden_at(0.0, 0.0),
            balloons: Vec::new(),
            spawn: SpawnState::default(),
        }
    }

    pub fn phase(&self) -> BalloonPhase {
        self.phase
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Begins a fresh game. Also used for "play again" from any phase.
    pub fn start(&mut self) {
        self.reset_field();
        self.phase = BalloonPhase::Running;
        info!(
            seconds = self.remaining_seconds,
            width = self.tuning.width,
            height = self.tuning.height,
            "balloon game started"
        );
    }

    /// Stops the game and clears the field. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if self.phase == BalloonPhase::Running {
            info!(score = self.score, level = self.level, "balloon game stopped");
        }
        self.reset_field();
        self.phase = BalloonPhase::Stopped;
    }

    /// Moves the aim point to the latest fingertip, or hides it when no hand
    /// was detected. Aiming is tracked in every phase.
    pub fn on_frame(&mut self, hand: Option<&HandLandmarks>) {
        self.pointer = match hand {
            Some(hand) => project_aim(hand, self.tuning.width, self.tuning.height),
            None => Pointer::hidden_at(self.pointer.x, self.pointer.y),
        };
    }

    /// One render-rate simulation step with the real elapsed time.
    /// Returns `None` when no game is running.
    pub fn tick(&mut self, dt_ms: f32) -> Option<TickReport> {
        if self.phase != BalloonPhase::Running {
            return None;
        }

        let report = tick_balloons(
            &mut self.balloons,
            &mut self.spawn,
            &self.pointer,
            self.level,
            dt_ms.max(0.0),
            &mut self.rng,
            &self.tuning,
        );
        let delta = report.score_delta();
        if delta != 0 {
            self.score += delta;
            debug!(score = self.score, delta, "score changed");
        }
        Some(report)
    }

    /// Wall-clock second. Counts down, raises the level on schedule and ends
    /// the game at zero.
    pub fn on_second(&mut self) {
        if self.phase != BalloonPhase::Running {
            return;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);

        let every = self.tuning.level_up_every_seconds;
        if every > 0 && self.remaining_seconds % every == 0 && self.level < self.tuning.max_level {
            self.level += 1;
            info!(level = self.level, remaining = self.remaining_seconds, "level up");
        }

        if self.remaining_seconds == 0 {
            self.phase = BalloonPhase::Over;
            info!(score = self.score, level = self.level, "balloon game over");
        }
    }

    pub fn snapshot(&self) -> BalloonSnapshot {
        BalloonSnapshot {
            phase: self.phase,
            score: self.score,
            level: self.level,
            remaining_seconds: self.remaining_seconds,
            pointer: self.pointer,
            balloons: self.balloons.clone(),
        }
    }

    fn reset_field(&mut self) {
        self.score = 0;
        self.level = 1;
        self.remaining_seconds = self.tuning.session_seconds;
        self.balloons.clear();
        self.spawn.accumulator_ms = 0.0;
    }
}
