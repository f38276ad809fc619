use super::{InvalidTuning, ensure};
use serde::Deserialize;

/// Smoothing windows and round timing for rock-paper-scissors.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RpsTuning {
    /// Frames of thumbs-up history kept for the start trigger.
    pub thumbs_up_capacity: usize,

    /// Thumbs-up frames within that history needed to start a round.
    pub thumbs_up_trigger: usize,

    /// Frames of per-frame gesture history kept for the fallback vote.
    pub gesture_capacity: usize,

    /// Age limit of the timestamped gesture log, in milliseconds.
    pub rolling_window_ms: u64,

    /// Age limit of the decisive snapshot vote at round end, in milliseconds.
    pub snapshot_window_ms: u64,

    /// Countdown length, in milliseconds.
    pub countdown_ms: u64,
}

impl Default for RpsTuning {
    fn default() -> Self {
        Self {
            thumbs_up_capacity: 12,
            thumbs_up_trigger: 7,
            gesture_capacity: 20,
            rolling_window_ms: 3000,
            snapshot_window_ms: 900,
            countdown_ms: 3000,
        }
    }
}

impl RpsTuning {
    pub fn validate(&self) -> Result<(), InvalidTuning> {
        ensure(self.thumbs_up_capacity > 0, "rps.thumbs_up_capacity", "must be positive")?;
        ensure(self.thumbs_up_trigger > 0, "rps.thumbs_up_trigger", "must be positive")?;
        ensure(
            self.thumbs_up_trigger <= self.thumbs_up_capacity,
            "rps.thumbs_up_trigger",
            "must not exceed thumbs_up_capacity",
        )?;
        ensure(self.gesture_capacity > 0, "rps.gesture_capacity", "must be positive")?;
        ensure(self.countdown_ms > 0, "rps.countdown_ms", "must be positive")?;
        ensure(
            self.snapshot_window_ms <= self.rolling_window_ms,
            "rps.snapshot_window_ms",
            "must not exceed rolling_window_ms",
        )
    }
}
