use super::{InvalidTuning, ensure};
use serde::Deserialize;

/// Floor for the spawn interval whatever the tuning says.
pub const MIN_SPAWN_INTERVAL_MS: f32 = 1.0;

/// Gameplay tuning for the balloon shooter.
///
/// Lengths are in play-area pixels, speeds in pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BalloonTuning {
    pub width: f32,
    pub height: f32,

    /// Length of one game, in seconds.
    pub session_seconds: u32,

    /// The level goes up whenever the remaining seconds are a multiple of this.
    pub level_up_every_seconds: u32,
    pub max_level: u32,

    /// Spawn interval is `base - step * level`, floored at `min`.
    pub spawn_interval_base_ms: f32,
    pub spawn_interval_step_ms: f32,
    pub spawn_interval_min_ms: f32,

    pub radius_min: f32,
    pub radius_max: f32,
    /// Fractional radius growth per level above 1.
    pub radius_growth_per_level: f32,

    pub rise_speed_min: f32,
    pub rise_speed_max: f32,
    /// Fractional rise speed growth per level above 1.
    pub rise_speed_growth_per_level: f32,

    /// Horizontal drift is drawn from `-max_drift..max_drift`.
    pub max_drift: f32,

    /// Gap kept between a new balloon and the side / bottom edges.
    pub spawn_edge_margin: f32,

    /// How far past the top edge a balloon may travel before it is removed.
    pub exit_margin: f32,

    /// Probability that a spawned balloon is beneficial.
    pub beneficial_chance: f32,

    /// Multiplier on the squared radius for hit tests.
    pub hit_radius_sq_factor: f32,
}

impl Default for BalloonTuning {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            session_seconds: 60,
            level_up_every_seconds: 15,
            max_level: 10,
            spawn_interval_base_ms: 220.0,
            spawn_interval_step_ms: 10.0,
            spawn_interval_min_ms: 90.0,
            radius_min: 18.0,
            radius_max: 34.0,
            radius_growth_per_level: 0.05,
            rise_speed_min: 40.0,
            rise_speed_max: 90.0,
            rise_speed_growth_per_level: 0.12,
            max_drift: 20.0,
            spawn_edge_margin: 10.0,
            exit_margin: 40.0,
            beneficial_chance: 0.5,
            hit_radius_sq_factor: 0.9,
        }
    }
}

impl BalloonTuning {
    /// Milliseconds between spawns at the given level.
    pub fn spawn_interval_ms(&self, level: u32) -> f32 {
        (self.spawn_interval_base_ms - self.spawn_interval_step_ms * level as f32)
            .max(self.spawn_interval_min_ms)
            .max(MIN_SPAWN_INTERVAL_MS)
    }

    /// Scale factor applied to radius and rise speed draws at the given level.
    pub fn level_scale(growth_per_level: f32, level: u32) -> f32 {
        1.0 + level.saturating_sub(1) as f32 * growth_per_level
    }

    pub fn validate(&self) -> Result<(), InvalidTuning> {
        ensure(
            self.width.is_finite() && self.width > 0.0,
            "balloon.width",
            "must be positive",
        )?;
        ensure(
            self.height.is_finite() && self.height > 0.0,
            "balloon.height",
            "must be positive",
        )?;
        ensure(self.session_seconds > 0, "balloon.session_seconds", "must be positive")?;
        ensure(self.max_level >= 1, "balloon.max_level", "must be at least 1")?;
        ensure(
            self.spawn_interval_min_ms.is_finite() && self.spawn_interval_min_ms > 0.0,
            "balloon.spawn_interval_min_ms",
            "must be positive",
        )?;
        ensure(
            self.spawn_interval_base_ms.is_finite() && self.spawn_interval_step_ms.is_finite(),
            "balloon.spawn_interval_base_ms",
            "must be finite",
        )?;
        ensure(
            self.radius_min > 0.0 && self.radius_max.is_finite(),
            "balloon.radius_min",
            "must be positive",
        )?;
        ensure(
            self.radius_max >= self.radius_min,
            "balloon.radius_max",
            "must not be below radius_min",
        )?;
        ensure(
            self.width > 2.0 * (self.radius_max + self.spawn_edge_margin),
            "balloon.width",
            "must fit the largest balloon between the edge margins",
        )?;
        ensure(
            self.rise_speed_min > 0.0 && self.rise_speed_max.is_finite(),
            "balloon.rise_speed_min",
            "must be positive",
        )?;
        ensure(
            self.rise_speed_max >= self.rise_speed_min,
            "balloon.rise_speed_max",
            "must not be below rise_speed_min",
        )?;
        ensure(
            self.max_drift.is_finite() && self.max_drift >= 0.0,
            "balloon.max_drift",
            "must not be negative",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.beneficial_chance),
            "balloon.beneficial_chance",
            "must be within 0..=1",
        )?;
        ensure(
            self.hit_radius_sq_factor.is_finite() && self.hit_radius_sq_factor > 0.0,
            "balloon.hit_radius_sq_factor",
            "must be positive",
        )
    }
}
