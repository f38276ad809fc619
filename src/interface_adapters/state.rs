use crate::domain::ports::Clock;
use crate::use_cases::SessionSettings;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // Tuning and queue sizes applied to every new session.
    pub settings: SessionSettings,
    // Shared monotonic clock used to timestamp frames.
    pub clock: Arc<dyn Clock>,
}
