// Wire protocol DTOs and conversions for the WebSocket and recording formats.

use crate::domain::gestures::{Gesture, Outcome};
use crate::domain::state::{Balloon, BalloonKind};
use crate::domain::{FrameError, HandLandmarks, Landmark};
use crate::use_cases::balloon::{BalloonPhase, BalloonSnapshot};
use crate::use_cases::rps::{RoundResult, RpsPhase, RpsSnapshot};
use crate::use_cases::{GameMode, SessionSnapshot};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Sent once on connect.
    Session { session_id: String, mode: String },
    Rps(RpsSnapshotDto),
    Balloon(BalloonSnapshotDto),
    // Per-message problems; the session keeps running.
    Error { message: String },
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    // One detection cycle from the pose model.
    Frame(FrameDto),
    // The pose model threw instead of producing a result.
    DetectionError { message: String },
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LandmarkDto {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl From<LandmarkDto> for Landmark {
    fn from(dto: LandmarkDto) -> Self {
        Landmark::new(dto.x, dto.y, dto.z)
    }
}

/// One frame of detector output. Missing, `null` or `[]` landmarks mean no
/// hand was found.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameDto {
    #[serde(default)]
    pub landmarks: Option<Vec<LandmarkDto>>,
}

impl FrameDto {
    pub fn into_hand(self) -> Result<Option<HandLandmarks>, FrameError> {
        landmarks_to_hand(self.landmarks.unwrap_or_default())
    }
}

pub(crate) fn landmarks_to_hand(
    landmarks: Vec<LandmarkDto>,
) -> Result<Option<HandLandmarks>, FrameError> {
    if landmarks.is_empty() {
        return Ok(None);
    }
    let points: Vec<Landmark> = landmarks.into_iter().map(Landmark::from).collect();
    HandLandmarks::try_from(points.as_slice()).map(Some)
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureDto {
    Rock,
    Paper,
    Scissors,
}

impl From<Gesture> for GestureDto {
    fn from(gesture: Gesture) -> Self {
        match gesture {
            Gesture::Rock => GestureDto::Rock,
            Gesture::Paper => GestureDto::Paper,
            Gesture::Scissors => GestureDto::Scissors,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeDto {
    Win,
    Lose,
    Draw,
    Undetermined,
}

impl From<Outcome> for OutcomeDto {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win => OutcomeDto::Win,
            Outcome::Lose => OutcomeDto::Lose,
            Outcome::Draw => OutcomeDto::Draw,
            Outcome::Undetermined => OutcomeDto::Undetermined,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RpsPhaseDto {
    Idle,
    Countdown,
    Reveal,
}

impl From<RpsPhase> for RpsPhaseDto {
    fn from(phase: RpsPhase) -> Self {
        match phase {
            RpsPhase::Idle => RpsPhaseDto::Idle,
            RpsPhase::Countdown => RpsPhaseDto::Countdown,
            RpsPhase::Reveal => RpsPhaseDto::Reveal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundResultDto {
    pub round: u64,
    pub player: Option<GestureDto>,
    pub opponent: GestureDto,
    pub outcome: OutcomeDto,
}

impl From<RoundResult> for RoundResultDto {
    fn from(result: RoundResult) -> Self {
        Self {
            round: result.round,
            player: result.player.map(GestureDto::from),
            opponent: result.opponent.into(),
            outcome: result.outcome.into(),
        }
    }
}

/// Rock-paper-scissors state for the UI. `result` is only set on reveal.
#[derive(Debug, Clone, Serialize)]
pub struct RpsSnapshotDto {
    pub phase: RpsPhaseDto,
    pub round: u64,
    pub hand_visible: bool,
    pub seconds_left: Option<u32>,
    pub thumbs_up_votes: usize,
    pub current_guess: Option<GestureDto>,
    pub result: Option<RoundResultDto>,
}

impl From<RpsSnapshot> for RpsSnapshotDto {
    fn from(snapshot: RpsSnapshot) -> Self {
        Self {
            phase: snapshot.phase.into(),
            round: snapshot.round,
            hand_visible: snapshot.hand_visible,
            seconds_left: snapshot.seconds_left,
            thumbs_up_votes: snapshot.thumbs_up_votes,
            current_guess: snapshot.current_guess.map(GestureDto::from),
            result: snapshot.result.map(RoundResultDto::from),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalloonPhaseDto {
    Stopped,
    Running,
    Over,
}

impl From<BalloonPhase> for BalloonPhaseDto {
    fn from(phase: BalloonPhase) -> Self {
        match phase {
            BalloonPhase::Stopped => BalloonPhaseDto::Stopped,
            BalloonPhase::Running => BalloonPhaseDto::Running,
            BalloonPhase::Over => BalloonPhaseDto::Over,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalloonKindDto {
    Beneficial,
    Harmful,
}

impl From<BalloonKind> for BalloonKindDto {
    fn from(kind: BalloonKind) -> Self {
        match kind {
            BalloonKind::Beneficial => BalloonKindDto::Beneficial,
            BalloonKind::Harmful => BalloonKindDto::Harmful,
        }
    }
}

/// Flattened balloon state for wire transmission.
#[derive(Debug, Clone, Serialize)]
pub struct BalloonDto {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub kind: BalloonKindDto,
}

impl From<&Balloon> for BalloonDto {
    fn from(balloon: &Balloon) -> Self {
        Self {
            id: balloon.id,
            x: balloon.x,
            y: balloon.y,
            radius: balloon.radius,
            kind: balloon.kind.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PointerDto {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalloonSnapshotDto {
    pub phase: BalloonPhaseDto,
    pub score: i32,
    pub level: u32,
    pub remaining_seconds: u32,
    /// Omitted while no hand is visible.
    pub pointer: Option<PointerDto>,
    pub balloons: Vec<BalloonDto>,
}

impl From<BalloonSnapshot> for BalloonSnapshotDto {
    fn from(snapshot: BalloonSnapshot) -> Self {
        let pointer = snapshot.pointer;
        Self {
            phase: snapshot.phase.into(),
            score: snapshot.score,
            level: snapshot.level,
            remaining_seconds: snapshot.remaining_seconds,
            pointer: pointer.visible.then_some(PointerDto {
                x: pointer.x,
                y: pointer.y,
            }),
            balloons: snapshot.balloons.iter().map(BalloonDto::from).collect(),
        }
    }
}

impl From<SessionSnapshot> for ServerMessage {
    fn from(snapshot: SessionSnapshot) -> Self {
        match snapshot {
            SessionSnapshot::Rps(s) => ServerMessage::Rps(s.into()),
            SessionSnapshot::Balloon(s) => ServerMessage::Balloon(s.into()),
        }
    }
}

impl ServerMessage {
    pub fn session(session_id: u64, mode: GameMode) -> Self {
        ServerMessage::Session {
            session_id: session_id.to_string(),
            mode: mode.as_str().to_string(),
        }
    }
}
