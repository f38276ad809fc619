// Recorded landmark streams: one JSON object per line, `{"t": ms, "landmarks": [...]}`.
//
// Replays run purely on the frame path; no timers are involved, so a
// countdown only finishes when a recorded frame reaches its deadline.

use crate::domain::ports::RandomSource;
use crate::domain::tuning::{BalloonTuning, GestureTuning, RpsTuning};
use crate::domain::{FrameError, HandLandmarks};
use crate::interface_adapters::protocol::{LandmarkDto, landmarks_to_hand};
use crate::use_cases::balloon::{BalloonSession, BalloonSnapshot};
use crate::use_cases::rps::{RpsSession, RpsSnapshot};
use serde::Deserialize;
use std::fmt;
use std::io::BufRead;

#[derive(Debug)]
pub enum ReplayError {
    Io(std::io::Error),
    Json { line: usize, source: serde_json::Error },
    Frame { line: usize, source: FrameError },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Io(e) => write!(f, "failed to read recording: {e}"),
            ReplayError::Json { line, source } => write!(f, "line {line}: invalid json: {source}"),
            ReplayError::Frame { line, source } => write!(f, "line {line}: {source}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::Io(e) => Some(e),
            ReplayError::Json { source, .. } => Some(source),
            ReplayError::Frame { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ReplayError {
    fn from(e: std::io::Error) -> Self {
        ReplayError::Io(e)
    }
}

#[derive(Debug, Deserialize)]
struct RecordedLine {
    t: u64,
    #[serde(default)]
    landmarks: Option<Vec<LandmarkDto>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    /// Capture time in milliseconds from the start of the recording.
    pub t_ms: u64,
    pub hand: Option<HandLandmarks>,
}

/// Parses a whole recording. Blank lines are skipped; line numbers in errors
/// are 1-based.
pub fn parse_recording(reader: impl BufRead) -> Result<Vec<RecordedFrame>, ReplayError> {
    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let number = idx + 1;
        let recorded: RecordedLine =
            serde_json::from_str(&line).map_err(|source| ReplayError::Json {
                line: number,
                source,
            })?;
        let hand = landmarks_to_hand(recorded.landmarks.unwrap_or_default())
            .map_err(|source| ReplayError::Frame { line: number, source })?;
        frames.push(RecordedFrame {
            t_ms: recorded.t,
            hand,
        });
    }
    Ok(frames)
}

/// Runs a recording through a fresh rock-paper-scissors session and returns
/// the snapshot after every frame.
pub fn replay_rps<R: RandomSource>(
    frames: &[RecordedFrame],
    gesture: GestureTuning,
    tuning: RpsTuning,
    rng: R,
) -> Vec<RpsSnapshot> {
    let mut session = RpsSession::new(gesture, tuning, rng);
    frames
        .iter()
        .map(|frame| {
            session.on_frame(frame.hand.as_ref(), frame.t_ms);
            session.snapshot(frame.t_ms)
        })
        .collect()
}

/// Runs a recording through a balloon game that starts at the first frame.
/// Frame gaps drive the simulation and the per-second clock.
pub fn replay_balloon<R: RandomSource>(
    frames: &[RecordedFrame],
    tuning: BalloonTuning,
    rng: R,
) -> Vec<BalloonSnapshot> {
    let mut session = BalloonSession::new(tuning, rng);
    session.start();

    let mut last_t = frames.first().map_or(0, |f| f.t_ms);
    let mut since_second = 0u64;
    let mut snapshots = Vec::with_capacity(frames.len());
    for frame in frames {
        let dt = frame.t_ms.saturating_sub(last_t);
        last_t = last_t.max(frame.t_ms);

        session.on_frame(frame.hand.as_ref());
        session.tick(dt as f32);

        since_second += dt;
        while since_second >= 1000 {
            since_second -= 1000;
            session.on_second();
        }
        snapshots.push(session.snapshot());
    }
    snapshots
}
