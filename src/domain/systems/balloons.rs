use crate::domain::ports::RandomSource;
use crate::domain::state::{Balloon, BalloonKind, Pointer};
use crate::domain::tuning::BalloonTuning;
use tracing::debug;

/// Spawn bookkeeping carried from one tick to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnState {
    pub accumulator_ms: f32,
    pub next_id: u64,
}

impl Default for SpawnState {
    fn default() -> Self {
        Self {
            accumulator_ms: 0.0,
            next_id: 1,
        }
    }
}

/// What one tick changed, for logging and scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub spawned: usize,
    pub popped: Vec<(u64, BalloonKind)>,
    pub escaped: usize,
}

impl TickReport {
    pub fn score_delta(&self) -> i32 {
        self.popped.iter().map(|(_, kind)| kind.score_delta()).sum()
    }
}

pub fn spawn_balloon(
    rng: &mut impl RandomSource,
    tuning: &BalloonTuning,
    level: u32,
    id: u64,
) -> Balloon {
    let radius = rng.range(tuning.radius_min, tuning.radius_max)
        * BalloonTuning::level_scale(tuning.radius_growth_per_level, level);
    let margin = tuning.spawn_edge_margin;
    let x = rng.range(radius + margin, tuning.width - radius - margin);
    let speed = rng.range(tuning.rise_speed_min, tuning.rise_speed_max)
        * BalloonTuning::level_scale(tuning.rise_speed_growth_per_level, level);
    let kind = if rng.chance(tuning.beneficial_chance) {
        BalloonKind::Beneficial
    } else {
        BalloonKind::Harmful
    };

    Balloon {
        id,
        x,
        y: tuning.height + radius + margin,
        radius,
        vx: rng.range(-tuning.max_drift, tuning.max_drift),
        vy: -speed,
        kind,
        alive: true,
    }
}

/// Moves live balloons by `dt_ms`, bounces them off the side walls and marks
/// the ones that left through the top as dead. Returns how many escaped.
pub fn integrate(balloons: &mut [Balloon], dt_ms: f32, tuning: &BalloonTuning) -> usize {
    let dt = dt_ms / 1000.0;
    let mut escaped = 0;
    for b in balloons.iter_mut().filter(|b| b.alive) {
        b.x += b.vx * dt;
        b.y += b.vy * dt;

        if b.x < b.radius {
            b.x = b.radius;
            b.vx = -b.vx;
        }
        if b.x > tuning.width - b.radius {
            b.x = tuning.width - b.radius;
            b.vx = -b.vx;
        }

        if b.y + b.radius < -tuning.exit_margin {
            b.alive = false;
            escaped += 1;
        }
    }
    escaped
}

/// Whether the aim point pops `balloon`. Uses a slightly shrunk radius so
/// grazing the edge does not count.
pub fn is_hit(pointer: &Pointer, balloon: &Balloon, tuning: &BalloonTuning) -> bool {
    let dx = pointer.x - balloon.x;
    let dy = pointer.y - balloon.y;
    dx * dx + dy * dy <= balloon.radius * balloon.radius * tuning.hit_radius_sq_factor
}

/// Marks every live balloon under a visible pointer as dead.
pub fn resolve_hits(
    balloons: &mut [Balloon],
    pointer: &Pointer,
    tuning: &BalloonTuning,
) -> Vec<(u64, BalloonKind)> {
    if !pointer.visible {
        return Vec::new();
    }

    let mut popped = Vec::new();
    for b in balloons.iter_mut().filter(|b| b.alive) {
        if is_hit(pointer, b, tuning) {
            b.alive = false;
            debug!(balloon_id = b.id, kind = ?b.kind, "balloon popped");
            popped.push((b.id, b.kind));
        }
    }
    popped
}

/// Spawn, move, collide, purge.
pub fn tick_balloons(
    balloons: &mut Vec<Balloon>,
    spawn: &mut SpawnState,
    pointer: &Pointer,
    level: u32,
    dt_ms: f32,
    rng: &mut impl RandomSource,
    tuning: &BalloonTuning,
) -> TickReport {
    let mut report = TickReport::default();

    spawn.accumulator_ms += dt_ms;
    let every = tuning.spawn_interval_ms(level);
    while spawn.accumulator_ms >= every {
        spawn.accumulator_ms -= every;
        balloons.push(spawn_balloon(rng, tuning, level, spawn.next_id));
        spawn.next_id = spawn.next_id.wrapping_add(1);
        report.spawned += 1;
    }

    report.escaped = integrate(balloons, dt_ms, tuning);
    report.popped = resolve_hits(balloons, pointer, tuning);

    balloons.retain(|b| b.alive);
    report
}
