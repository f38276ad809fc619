// One task per player session: owns the state machine, its timers and the
// snapshot channel.

use super::types::{GameMode, SessionEvent, SessionSettings, SessionSnapshot};
use crate::domain::ports::{Clock, RandomSource};
use crate::domain::HandLandmarks;
use crate::use_cases::balloon::BalloonSession;
use crate::use_cases::rps::{RpsSession, RpsTransition};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Channels into and out of a running session task.
#[derive(Debug)]
pub struct SessionHandle {
    pub mode: GameMode,
    /// Sender for frames and control events into the session task.
    pub input_tx: mpsc::Sender<SessionEvent>,
    /// Latest snapshot, replaced after every processing cycle.
    pub snapshot_rx: watch::Receiver<SessionSnapshot>,
}

/// Result of offering a frame to a session without waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSubmit {
    Accepted,
    /// The session is still busy with earlier frames.
    Dropped,
    Closed,
}

/// Offers one frame to the session. Never waits: a full queue drops the frame.
pub fn submit_frame(
    input_tx: &mpsc::Sender<SessionEvent>,
    hand: Option<HandLandmarks>,
) -> FrameSubmit {
    match input_tx.try_send(SessionEvent::Frame { hand }) {
        Ok(()) => FrameSubmit::Accepted,
        Err(TrySendError::Full(_)) => {
            debug!("session busy; dropping frame");
            FrameSubmit::Dropped
        }
        Err(TrySendError::Closed(_)) => FrameSubmit::Closed,
    }
}

/// Spawns the session task for `mode`. The task exits once every sender of
/// `input_tx` is dropped.
pub fn spawn_session<R>(
    mode: GameMode,
    settings: &SessionSettings,
    clock: Arc<dyn Clock>,
    rng: R,
) -> SessionHandle
where
    R: RandomSource + 'static,
{
    let (input_tx, input_rx) = mpsc::channel::<SessionEvent>(settings.frame_queue_capacity(mode));

    let snapshot_rx = match mode {
        GameMode::Rps => {
            let session = RpsSession::new(settings.gesture, settings.rps, rng);
            let (snapshot_tx, snapshot_rx) =
                watch::channel(SessionSnapshot::Rps(session.snapshot(clock.now_ms())));
            tokio::spawn(rps_task(input_rx, snapshot_tx, session, clock));
            snapshot_rx
        }
        GameMode::Balloon => {
            let session = BalloonSession::new(settings.balloon, rng);
            let (snapshot_tx, snapshot_rx) =
                watch::channel(SessionSnapshot::Balloon(session.snapshot()));
            tokio::spawn(balloon_task(
                input_rx,
                snapshot_tx,
                session,
                settings.render_tick_interval,
            ));
            snapshot_rx
        }
    };

    SessionHandle {
        mode,
        input_tx,
        snapshot_rx,
    }
}

/// Cancellable one-shot countdown. Fires the round number back into the
/// session loop; a newer `arm` or `cancel` aborts the pending one.
struct DeadlineTimer {
    fire_tx: mpsc::Sender<u64>,
    pending: Option<JoinHandle<()>>,
}

impl DeadlineTimer {
    fn new(fire_tx: mpsc::Sender<u64>) -> Self {
        Self {
            fire_tx,
            pending: None,
        }
    }

    fn arm(&mut self, round: u64, delay: Duration) {
        self.cancel();
        let fire_tx = self.fire_tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = fire_tx.send(round).await;
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn rps_task<R: RandomSource>(
    mut input_rx: mpsc::Receiver<SessionEvent>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    mut session: RpsSession<R>,
    clock: Arc<dyn Clock>,
) {
    let (fire_tx, mut fire_rx) = mpsc::channel::<u64>(4);
    let mut timer = DeadlineTimer::new(fire_tx);

    loop {
        let event = tokio::select! {
            ev = input_rx.recv() => match ev {
                Some(ev) => ev,
                None => break,
            },
            Some(round) = fire_rx.recv() => SessionEvent::CountdownElapsed { round },
        };

        let now_ms = clock.now_ms();
        let transition = match event {
            SessionEvent::Frame { hand } => session.on_frame(hand.as_ref(), now_ms),
            SessionEvent::DetectionFailed { message } => {
                warn!(%message, "hand detection failed; skipping cycle");
                continue;
            }
            SessionEvent::Start | SessionEvent::Stop => {
                timer.cancel();
                session.stop();
                RpsTransition::None
            }
            SessionEvent::CountdownElapsed { round } => {
                session.on_countdown_elapsed(round, now_ms)
            }
        };

        match transition {
            RpsTransition::CountdownStarted { round, deadline_ms } => {
                timer.arm(round, Duration::from_millis(deadline_ms.saturating_sub(now_ms)));
            }
            // The frame path may have won the race.
            RpsTransition::Revealed(_) => timer.cancel(),
            RpsTransition::None => {}
        }

        let _ = snapshot_tx.send(SessionSnapshot::Rps(session.snapshot(now_ms)));
    }

    info!(round = session.round(), "rps session closed");
}

async fn balloon_task<R: RandomSource>(
    mut input_rx: mpsc::Receiver<SessionEvent>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    mut session: BalloonSession<R>,
    render_tick_interval: Duration,
) {
    let mut render = tokio::time::interval(render_tick_interval);
    render.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut seconds = tokio::time::interval_at(Instant::now() + ONE_SECOND, ONE_SECOND);
    let mut last_render = Instant::now();

    loop {
        tokio::select! {
            ev = input_rx.recv() => {
                let Some(ev) = ev else { break };
                match ev {
                    SessionEvent::Frame { hand } => session.on_frame(hand.as_ref()),
                    SessionEvent::DetectionFailed { message } => {
                        warn!(%message, "hand detection failed; skipping cycle");
                        continue;
                    }
                    SessionEvent::Start => {
                        session.start();
                        // Fresh game clock: first second ends one second from now.
                        seconds.reset();
                        render.reset();
                        last_render = Instant::now();
                    }
                    SessionEvent::Stop => session.stop(),
                    SessionEvent::CountdownElapsed { .. } => continue,
                }
            }
            now = render.tick() => {
                let dt = now.saturating_duration_since(last_render);
                last_render = now;
                if session.tick(dt.as_secs_f32() * 1000.0).is_none() {
                    // Nothing moves outside a running game.
                    continue;
                }
            }
            _ = seconds.tick() => session.on_second(),
        }

        let _ = snapshot_tx.send(SessionSnapshot::Balloon(session.snapshot()));
    }

    info!(score = session.score(), "balloon session closed");
}
