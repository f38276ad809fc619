// Per-frame geometric primitives over hand landmarks.
//
// Everything here works in the model's projected 2-D space; depth is ignored.

use crate::domain::landmarks::{
    Finger, HandLandmarks, INDEX_MCP, Landmark, MIDDLE_MCP, NON_THUMB_FINGERS, PINKY_MCP, RING_MCP,
    WRIST,
};
use crate::domain::tuning::GestureTuning;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn magnitude(self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// Vector pointing from `origin` to `point`.
pub fn offset(point: Landmark, origin: Landmark) -> Vec2 {
    Vec2 {
        x: point.x - origin.x,
        y: point.y - origin.y,
    }
}

pub fn distance(a: Landmark, b: Landmark) -> f32 {
    offset(a, b).magnitude()
}

/// Cosine of the angle between `u` and `v`.
///
/// Returns 1.0 when either vector is zero, which reads as "bent" and keeps a
/// degenerate finger from ever counting as extended.
pub fn cosine_between(u: Vec2, v: Vec2) -> f32 {
    let denom = u.magnitude() * v.magnitude();
    if denom == 0.0 {
        return 1.0;
    }
    u.dot(v) / denom
}

/// Cosine of the angle at the PIP joint between the tip and MCP directions.
/// Near -1 for a straight finger, positive once it curls back on itself.
pub fn pip_cosine(hand: &HandLandmarks, finger: Finger) -> f32 {
    let pip = hand[finger.pip];
    cosine_between(offset(hand[finger.tip], pip), offset(hand[finger.mcp], pip))
}

/// Permissive extension test: a straight PIP angle or a tip clearly farther
/// from the wrist than the MCP.
pub fn is_finger_extended(hand: &HandLandmarks, finger: Finger, tuning: &GestureTuning) -> bool {
    let wrist = hand.wrist();
    let angle_extended = pip_cosine(hand, finger) < tuning.extended_max_cos;
    let distance_extended = distance(wrist, hand[finger.tip])
        > distance(wrist, hand[finger.mcp]) + tuning.extended_distance_margin;

    angle_extended || distance_extended
}

/// Conservative fold test: any of a folded PIP angle, a tip closer to the
/// wrist than the MCP, or a tip hanging below the PIP.
pub fn is_finger_strongly_folded(
    hand: &HandLandmarks,
    finger: Finger,
    tuning: &GestureTuning,
) -> bool {
    let wrist = hand.wrist();
    let tip = hand[finger.tip];

    let angle_folded = pip_cosine(hand, finger) > tuning.folded_min_cos;
    let distance_folded = distance(wrist, tip) + tuning.folded_distance_margin
        < distance(wrist, hand[finger.mcp]);
    let below_pip = tip.y > hand[finger.pip].y + tuning.folded_vertical_margin;

    angle_folded || distance_folded || below_pip
}

/// Both finger signals for one frame. They are independent, so a finger can
/// be neither extended nor folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerSignals {
    pub extended: bool,
    pub folded: bool,
}

pub fn finger_signals(
    hand: &HandLandmarks,
    finger: Finger,
    tuning: &GestureTuning,
) -> FingerSignals {
    FingerSignals {
        extended: is_finger_extended(hand, finger, tuning),
        folded: is_finger_strongly_folded(hand, finger, tuning),
    }
}

/// Mean of the wrist and the four non-thumb MCP joints.
pub fn palm_center(hand: &HandLandmarks) -> Landmark {
    let anchors = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
    let (sx, sy) = anchors
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &i| (sx + hand[i].x, sy + hand[i].y));
    let n = anchors.len() as f32;
    Landmark::new(sx / n, sy / n, 0.0)
}

/// Mean fingertip-to-palm distance over mean MCP-to-palm distance.
/// Small values mean the tips are tucked into the palm.
pub fn fist_compactness(hand: &HandLandmarks) -> f32 {
    let center = palm_center(hand);
    let n = NON_THUMB_FINGERS.len() as f32;
    let mean_tip = NON_THUMB_FINGERS
        .iter()
        .map(|f| distance(hand[f.tip], center))
        .sum::<f32>()
        / n;
    let mean_mcp = NON_THUMB_FINGERS
        .iter()
        .map(|f| distance(hand[f.mcp], center))
        .sum::<f32>()
        / n;

    let denom = if mean_mcp == 0.0 { 1e-6 } else { mean_mcp };
    mean_tip / denom
}

pub fn is_compact_fist(hand: &HandLandmarks, tuning: &GestureTuning) -> bool {
    fist_compactness(hand) < tuning.fist_compactness_ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::landmarks::{INDEX, PINKY};
    use crate::domain::test_support::{FingerPose, HandPose};

    #[test]
    fn cosine_of_zero_vector_is_one() {
        let zero = Vec2::default();
        let up = Vec2 { x: 0.0, y: -1.0 };
        assert_eq!(cosine_between(zero, up), 1.0);
        assert_eq!(cosine_between(up, zero), 1.0);
    }

    #[test]
    fn cosine_of_opposite_vectors_is_minus_one() {
        let u = Vec2 { x: 0.0, y: -0.2 };
        let v = Vec2 { x: 0.0, y: 0.1 };
        assert!((cosine_between(u, v) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn straight_finger_is_extended_and_not_folded() {
        let tuning = GestureTuning::default();
        let hand = HandPose::open().build();
        let signals = finger_signals(&hand, INDEX, &tuning);
        assert!(signals.extended);
        assert!(!signals.folded);
    }

    #[test]
    fn curled_finger_is_folded_and_not_extended() {
        let tuning = GestureTuning::default();
        let hand = HandPose::fist().build();
        let signals = finger_signals(&hand, PINKY, &tuning);
        assert!(signals.folded);
        assert!(!signals.extended);
    }

    #[test]
    fn collapsed_finger_never_reads_as_extended_by_angle() {
        // Tip, PIP and MCP on the same point: degenerate angle, no distance gain.
        let tuning = GestureTuning::default();
        let hand = HandPose::open()
            .with_finger(INDEX, FingerPose::Collapsed)
            .build();
        assert!(pip_cosine(&hand, INDEX) == 1.0);
        assert!(!is_finger_extended(&hand, INDEX, &tuning));
        assert!(is_finger_strongly_folded(&hand, INDEX, &tuning));
    }

    #[test]
    fn fist_is_more_compact_than_open_hand() {
        let tuning = GestureTuning::default();
        let fist = HandPose::fist().build();
        let open = HandPose::open().build();
        assert!(fist_compactness(&fist) < fist_compactness(&open));
        assert!(is_compact_fist(&fist, &tuning));
        assert!(!is_compact_fist(&open, &tuning));
    }
}
