// Synthetic hand poses and scripted randomness for deterministic tests.

use crate::domain::landmarks::{
    Finger, HandLandmarks, LANDMARK_COUNT, Landmark, NON_THUMB_FINGERS, THUMB_CMC, THUMB_IP,
    THUMB_MCP, THUMB_TIP, WRIST,
};
use crate::domain::ports::RandomSource;

// Upright right hand: wrist at the bottom, fingertips toward smaller y.
const WRIST_POINT: (f32, f32) = (0.5, 0.9);
const FINGER_X: [f32; 4] = [0.42, 0.48, 0.54, 0.60];
const MCP_Y: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FingerPose {
    /// Straight up from the MCP.
    Extended,
    /// Curled back down past the PIP.
    Folded,
    /// Every joint on the MCP: no measurable angle or length.
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ThumbPose {
    Up,
    Tucked,
    Out,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct HandPose {
    thumb: ThumbPose,
    fingers: [FingerPose; 4],
}

impl HandPose {
    pub(crate) fn open() -> Self {
        Self {
            thumb: ThumbPose::Out,
            fingers: [FingerPose::Extended; 4],
        }
    }

    pub(crate) fn fist() -> Self {
        Self {
            thumb: ThumbPose::Tucked,
            fingers: [FingerPose::Folded; 4],
        }
    }

    pub(crate) fn scissors() -> Self {
        Self::fist()
            .with_finger(NON_THUMB_FINGERS[0], FingerPose::Extended)
            .with_finger(NON_THUMB_FINGERS[1], FingerPose::Extended)
    }

    pub(crate) fn thumbs_up() -> Self {
        Self::fist().with_thumb(ThumbPose::Up)
    }

    pub(crate) fn with_thumb(mut self, thumb: ThumbPose) -> Self {
        self.thumb = thumb;
        self
    }

    pub(crate) fn with_finger(mut self, finger: Finger, pose: FingerPose) -> Self {
        if let Some(slot) = NON_THUMB_FINGERS.iter().position(|f| *f == finger) {
            self.fingers[slot] = pose;
        }
        self
    }

    pub(crate) fn build(&self) -> HandLandmarks {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points[WRIST] = Landmark::new(WRIST_POINT.0, WRIST_POINT.1, 0.0);

        let (ip, tip) = match self.thumb {
            ThumbPose::Up => ((0.35, 0.55), (0.35, 0.45)),
            ThumbPose::Tucked => ((0.40, 0.65), (0.45, 0.68)),
            ThumbPose::Out => ((0.30, 0.66), (0.22, 0.64)),
        };
        points[THUMB_CMC] = Landmark::new(0.45, 0.8, 0.0);
        points[THUMB_MCP] = Landmark::new(0.40, 0.7, 0.0);
        points[THUMB_IP] = Landmark::new(ip.0, ip.1, 0.0);
        points[THUMB_TIP] = Landmark::new(tip.0, tip.1, 0.0);

        for ((finger, pose), x) in NON_THUMB_FINGERS.iter().zip(self.fingers).zip(FINGER_X) {
            let (pip, dip, tip) = match pose {
                FingerPose::Extended => (0.50, 0.43, 0.37),
                FingerPose::Folded => (0.52, 0.58, 0.66),
                FingerPose::Collapsed => (MCP_Y, MCP_Y, MCP_Y),
            };
            points[finger.mcp] = Landmark::new(x, MCP_Y, 0.0);
            points[finger.pip] = Landmark::new(x, pip, 0.0);
            points[finger.dip] = Landmark::new(x, dip, 0.0);
            points[finger.tip] = Landmark::new(x, tip, 0.0);
        }

        HandLandmarks::new(points)
    }
}

/// Replays a fixed list of unit draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedRng {
    values: Vec<f32>,
    next: usize,
}

impl ScriptedRng {
    pub(crate) fn new(values: Vec<f32>) -> Self {
        assert!(!values.is_empty(), "scripted rng needs at least one value");
        Self { values, next: 0 }
    }
}

impl RandomSource for ScriptedRng {
    fn next_unit(&mut self) -> f32 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}
