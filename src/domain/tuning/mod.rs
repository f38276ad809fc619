// Gameplay and recognition tuning, kept separate from runtime configuration.

use std::fmt;

pub mod balloon;
pub mod gesture;
pub mod rps;

pub use balloon::BalloonTuning;
pub use gesture::GestureTuning;
pub use rps::RpsTuning;

/// A tuning value the games cannot run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTuning {
    /// Dotted path of the offending field, e.g. `balloon.width`.
    pub field: &'static str,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTuning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

impl std::error::Error for InvalidTuning {}

fn ensure(ok: bool, field: &'static str, reason: &'static str) -> Result<(), InvalidTuning> {
    if ok {
        Ok(())
    } else {
        Err(InvalidTuning { field, reason })
    }
}
