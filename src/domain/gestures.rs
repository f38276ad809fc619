// Stateless per-frame gesture classifiers and round scoring.

use crate::domain::features::{finger_signals, FingerSignals};
use crate::domain::landmarks::{HandLandmarks, NON_THUMB_FINGERS, THUMB_IP, THUMB_TIP};
use crate::domain::tuning::GestureTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Rock,
    Paper,
    Scissors,
}

impl Gesture {
    /// Draw order for the opponent's uniform pick.
    pub const ALL: [Gesture; 3] = [Gesture::Rock, Gesture::Paper, Gesture::Scissors];

    /// The gesture this one defeats.
    pub fn beats(self) -> Gesture {
        match self {
            Gesture::Rock => Gesture::Scissors,
            Gesture::Paper => Gesture::Rock,
            Gesture::Scissors => Gesture::Paper,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gesture::Rock => "rock",
            Gesture::Paper => "paper",
            Gesture::Scissors => "scissors",
        }
    }
}

/// Result of a round from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
    /// No player gesture could be read at decision time.
    Undetermined,
}

pub fn decide_winner(player: Gesture, opponent: Gesture) -> Outcome {
    if player == opponent {
        Outcome::Draw
    } else if player.beats() == opponent {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

/// Thumb tip above and roughly in line with its IP joint while the other four
/// fingertips hang at or below their PIP joints. Uses y-only folding on purpose.
pub fn classify_thumbs_up(hand: &HandLandmarks, tuning: &GestureTuning) -> bool {
    let tip = hand[THUMB_TIP];
    let ip = hand[THUMB_IP];
    let thumb_up = tip.y < ip.y - tuning.thumb_up_margin
        && (tip.x - ip.x).abs() < tuning.thumb_horizontal_tolerance;

    thumb_up
        && NON_THUMB_FINGERS
            .iter()
            .all(|f| hand[f.tip].y > hand[f.pip].y - tuning.thumb_fold_margin)
}

/// Rock / paper / scissors from the four non-thumb fingers, or `None` when
/// the pose is ambiguous. Rules are checked in order; rock wins ties.
pub fn classify_rock_paper_scissors(
    hand: &HandLandmarks,
    tuning: &GestureTuning,
) -> Option<Gesture> {
    let [index, middle, ring, pinky]: [FingerSignals; 4] =
        NON_THUMB_FINGERS.map(|f| finger_signals(hand, f, tuning));

    let all_extended = index.extended && middle.extended && ring.extended && pinky.extended;
    let scissors = index.extended && middle.extended && !ring.extended && !pinky.extended;
    let folded = [index, middle, ring, pinky]
        .iter()
        .filter(|s| s.folded)
        .count();

    if folded == 4 {
        return Some(Gesture::Rock);
    }
    if !all_extended && !scissors && folded >= 3 {
        return Some(Gesture::Rock);
    }
    if all_extended {
        return Some(Gesture::Paper);
    }
    if scissors {
        return Some(Gesture::Scissors);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::landmarks::{INDEX, MIDDLE, PINKY, RING};
    use crate::domain::test_support::{FingerPose, HandPose, ThumbPose};

    #[test]
    fn outcome_table_follows_the_standard_cycle() {
        use Gesture::*;
        use Outcome::*;
        let table = [
            (Rock, Rock, Draw),
            (Rock, Paper, Lose),
            (Rock, Scissors, Win),
            (Paper, Rock, Win),
            (Paper, Paper, Draw),
            (Paper, Scissors, Lose),
            (Scissors, Rock, Lose),
            (Scissors, Paper, Win),
            (Scissors, Scissors, Draw),
        ];
        for (player, opponent, expected) in table {
            assert_eq!(
                decide_winner(player, opponent),
                expected,
                "{player:?} vs {opponent:?}"
            );
        }
    }

    #[test]
    fn four_folded_fingers_are_rock_whatever_the_thumb_does() {
        let tuning = GestureTuning::default();
        for thumb in [ThumbPose::Up, ThumbPose::Tucked, ThumbPose::Out] {
            let hand = HandPose::fist().with_thumb(thumb).build();
            assert_eq!(
                classify_rock_paper_scissors(&hand, &tuning),
                Some(Gesture::Rock),
                "thumb {thumb:?}"
            );
        }
    }

    #[test]
    fn open_hand_is_paper() {
        let tuning = GestureTuning::default();
        let hand = HandPose::open().build();
        assert_eq!(
            classify_rock_paper_scissors(&hand, &tuning),
            Some(Gesture::Paper)
        );
    }

    #[test]
    fn index_and_middle_extended_is_scissors() {
        let tuning = GestureTuning::default();
        for thumb in [ThumbPose::Tucked, ThumbPose::Out] {
            let hand = HandPose::scissors().with_thumb(thumb).build();
            assert_eq!(
                classify_rock_paper_scissors(&hand, &tuning),
                Some(Gesture::Scissors)
            );
        }
    }

    #[test]
    fn three_folded_fingers_fall_back_to_rock() {
        let tuning = GestureTuning::default();
        let pointing = HandPose::fist()
            .with_finger(INDEX, FingerPose::Extended)
            .build();
        assert_eq!(
            classify_rock_paper_scissors(&pointing, &tuning),
            Some(Gesture::Rock)
        );
    }

    #[test]
    fn ambiguous_pose_is_unrecognized() {
        let tuning = GestureTuning::default();
        // Index and pinky up, middle and ring down.
        let horns = HandPose::open()
            .with_finger(MIDDLE, FingerPose::Folded)
            .with_finger(RING, FingerPose::Folded)
            .build();
        assert_eq!(classify_rock_paper_scissors(&horns, &tuning), None);

        let ring_only = HandPose::fist()
            .with_finger(RING, FingerPose::Extended)
            .with_finger(PINKY, FingerPose::Extended)
            .build();
        assert_eq!(classify_rock_paper_scissors(&ring_only, &tuning), None);
    }

    #[test]
    fn thumbs_up_needs_raised_thumb_and_curled_fingers() {
        let tuning = GestureTuning::default();
        assert!(classify_thumbs_up(&HandPose::thumbs_up().build(), &tuning));
        assert!(!classify_thumbs_up(
            &HandPose::fist().with_thumb(ThumbPose::Tucked).build(),
            &tuning
        ));
        assert!(!classify_thumbs_up(
            &HandPose::open().with_thumb(ThumbPose::Up).build(),
            &tuning
        ));
    }

    #[test]
    fn thumbs_up_rejects_a_thumb_pointing_sideways() {
        let tuning = GestureTuning::default();
        let hand = HandPose::fist().with_thumb(ThumbPose::Out).build();
        assert!(!classify_thumbs_up(&hand, &tuning));
    }
}
