// Use-case level inputs/outputs for the session loop.

use crate::domain::tuning::{BalloonTuning, GestureTuning, RpsTuning};
use crate::domain::HandLandmarks;
use crate::use_cases::balloon::BalloonSnapshot;
use crate::use_cases::rps::RpsSnapshot;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Rps,
    Balloon,
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Rps => "rps",
            GameMode::Balloon => "balloon",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown game mode '{}', expected 'rps' or 'balloon'", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for GameMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rps" => Ok(GameMode::Rps),
            "balloon" => Ok(GameMode::Balloon),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// One detection cycle. `None` means no hand this frame.
    Frame { hand: Option<HandLandmarks> },
    /// The pose model failed upstream; the cycle is skipped.
    DetectionFailed { message: String },
    Start,
    Stop,
    /// Fired by the countdown timer for the given round.
    CountdownElapsed { round: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionSnapshot {
    Rps(RpsSnapshot),
    Balloon(BalloonSnapshot),
}

/// Shared configuration for spawning player sessions.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub gesture: GestureTuning,
    pub rps: RpsTuning,
    pub balloon: BalloonTuning,
    /// Capacity for inbound frames in rock-paper-scissors mode.
    pub rps_frame_queue_capacity: usize,
    /// Capacity for inbound frames in balloon mode. Kept tiny so stale aim
    /// frames are dropped instead of queued.
    pub balloon_frame_queue_capacity: usize,
    /// Render-rate tick driving the balloon simulation.
    pub render_tick_interval: Duration,
}

impl SessionSettings {
    pub fn frame_queue_capacity(&self, mode: GameMode) -> usize {
        let capacity = match mode {
            GameMode::Rps => self.rps_frame_queue_capacity,
            GameMode::Balloon => self.balloon_frame_queue_capacity,
        };
        // tokio channels panic on zero capacity.
        capacity.max(1)
    }
}
