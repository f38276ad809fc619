// Hand skeleton produced by the external pose model, one hand per frame.

use std::fmt;
use std::ops::Index;

/// Number of landmarks the hand model emits per detected hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// A single normalized landmark. `x` and `y` are in `0..=1` relative to the
/// frame; `z` is the model's relative depth and is ignored by the classifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Landmark indices of one non-thumb finger, tip first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finger {
    pub tip: usize,
    pub dip: usize,
    pub pip: usize,
    pub mcp: usize,
}

pub const INDEX: Finger = Finger {
    tip: INDEX_TIP,
    dip: INDEX_DIP,
    pip: INDEX_PIP,
    mcp: INDEX_MCP,
};

pub const MIDDLE: Finger = Finger {
    tip: MIDDLE_TIP,
    dip: MIDDLE_DIP,
    pip: MIDDLE_PIP,
    mcp: MIDDLE_MCP,
};

pub const RING: Finger = Finger {
    tip: RING_TIP,
    dip: RING_DIP,
    pip: RING_PIP,
    mcp: RING_MCP,
};

pub const PINKY: Finger = Finger {
    tip: PINKY_TIP,
    dip: PINKY_DIP,
    pip: PINKY_PIP,
    mcp: PINKY_MCP,
};

/// Index, middle, ring, pinky.
pub const NON_THUMB_FINGERS: [Finger; 4] = [INDEX, MIDDLE, RING, PINKY];

/// Reasons a raw landmark list cannot become a `HandLandmarks`.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    LandmarkCount { found: usize },
    NonFinite { index: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::LandmarkCount { found } => {
                write!(f, "expected {LANDMARK_COUNT} landmarks, got {found}")
            }
            FrameError::NonFinite { index } => {
                write!(f, "landmark {index} has a non-finite coordinate")
            }
        }
    }
}

impl std::error::Error for FrameError {}

/// The 21 landmarks of one detected hand. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn wrist(&self) -> Landmark {
        self.points[WRIST]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }
}

impl Index<usize> for HandLandmarks {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.points[index]
    }
}

impl TryFrom<&[Landmark]> for HandLandmarks {
    type Error = FrameError;

    fn try_from(points: &[Landmark]) -> Result<Self, FrameError> {
        let points: [Landmark; LANDMARK_COUNT] =
            points.try_into().map_err(|_| FrameError::LandmarkCount {
                found: points.len(),
            })?;

        // z is unused downstream but a NaN there still signals a broken frame.
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(FrameError::NonFinite { index });
        }

        Ok(Self { points })
    }
}
