// Use cases layer: session workflows for both game modes.

pub mod balloon;
pub mod rps;
pub mod session;
pub mod types;

pub use balloon::{BalloonPhase, BalloonSession, BalloonSnapshot};
pub use rps::{RoundResult, RpsPhase, RpsSession, RpsSnapshot, RpsTransition};
pub use session::{spawn_session, submit_frame, FrameSubmit, SessionHandle};
pub use types::{GameMode, SessionEvent, SessionSettings, SessionSnapshot, UnknownMode};
