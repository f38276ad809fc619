// Domain layer: landmark geometry, gesture rules and simulation types.

pub mod features;
pub mod gestures;
pub mod landmarks;
pub mod ports;
pub mod smoothing;
pub mod state;
pub mod systems;
pub mod tuning;

#[cfg(test)]
pub(crate) mod test_support;

pub use gestures::{Gesture, Outcome};
pub use landmarks::{FrameError, HandLandmarks, Landmark};
pub use state::{Balloon, BalloonKind, Pointer};
