use crate::domain::ports::RandomSource;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Returns a process-unique, monotonically increasing identifier.
///
/// Seeded from the wall clock once, then incremented, so two sessions opened
/// in the same instant still get different ids.
pub fn rand_id() -> u64 {
    static COUNTER: OnceLock<AtomicU64> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| AtomicU64::new(now_nanos()));
    counter.fetch_add(1, Ordering::Relaxed)
}

/// Generator for one session's opponent picks and balloon spawns.
pub fn session_rng() -> SmallRng {
    SmallRng::from_entropy()
}

impl RandomSource for SmallRng {
    fn next_unit(&mut self) -> f32 {
        self.r#gen::<f32>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}
